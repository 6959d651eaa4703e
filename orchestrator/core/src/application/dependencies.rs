// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Upstream handles and settings shared by the lifecycle services.
//!
//! Built once at startup and handed to each service; tests substitute in-memory
//! repositories and a fake workflow engine.

use std::sync::Arc;

use crate::domain::cluster_config::ClusterDefaults;
use crate::domain::lcm_config::{AuxiliaryFailurePolicy, CreateClusterDedupPolicy, LcmConfigManifest};
use crate::domain::region::RegionTable;
use crate::domain::repository::{AppGroupRepository, ClusterRepository, ContractRepository, CspInfoRepository};
use crate::domain::workflow::{WorkflowCatalog, WorkflowEngine};

#[derive(Clone)]
pub struct LifecycleDependencies {
    pub contracts: Arc<dyn ContractRepository>,
    pub csp_infos: Arc<dyn CspInfoRepository>,
    pub clusters: Arc<dyn ClusterRepository>,
    pub app_groups: Arc<dyn AppGroupRepository>,
    pub workflow_engine: Arc<dyn WorkflowEngine>,
}

#[derive(Debug, Clone)]
pub struct LifecycleSettings {
    pub catalog: WorkflowCatalog,
    pub cluster_defaults: ClusterDefaults,
    pub regions: RegionTable,
    pub create_cluster_dedup: CreateClusterDedupPolicy,
    pub require_tenant_scope: bool,
    pub auxiliary_failure_policy: AuxiliaryFailurePolicy,
}

impl LifecycleSettings {
    pub fn from_config(config: &LcmConfigManifest) -> anyhow::Result<Self> {
        Ok(Self {
            catalog: config.workflow_catalog(),
            cluster_defaults: config.spec.cluster_defaults.clone(),
            regions: config.region_table()?,
            create_cluster_dedup: config.spec.policy.create_cluster_dedup,
            require_tenant_scope: config.spec.policy.require_tenant_scope,
            auxiliary_failure_policy: config.spec.workflow.auxiliary_failure_policy,
        })
    }
}
