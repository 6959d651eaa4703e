// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Cluster Lifecycle Use Cases
//!
//! # DDD Pattern: Application Service
//!
//! - **Layer:** Application
//! - **Responsibility:** CreateCluster, ScaleCluster and DeleteCluster
//! - **Collaborators:**
//!   - Domain: request validation, configuration derivation, workflow catalog
//!   - Ports: contract, CSP, cluster and app group repositories; workflow engine
//!
//! Both operations fail fast: the first failing step decides the result, and
//! side effects of earlier steps are left in place.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::dedup_guard::DedupGuard;
use crate::application::dependencies::{LifecycleDependencies, LifecycleSettings};
use crate::application::status_updater::StatusUpdater;
use crate::domain::cluster::{ClusterStatus, NewCluster};
use crate::domain::cluster_config::derive_cluster_config;
use crate::domain::errors::LifecycleError;
use crate::domain::identifiers::{ClusterId, ContractId, CspId};
use crate::domain::requests::{CreateClusterRequest, DeleteClusterRequest, ScaleClusterRequest};
use crate::domain::validation::{validate_create_cluster, validate_delete_cluster, TenantScope};

#[async_trait]
pub trait ClusterLifecycleService: Send + Sync {
    /// Register a cluster and submit its creation workflow.
    ///
    /// # Errors
    ///
    /// - `Validation`: malformed identifiers or missing name
    /// - `NotFound`: contract or CSP missing, or CSP owned by another contract
    /// - `Conflict`: a creation workflow is already running for the contract
    /// - `Derivation`: requested configuration violates region or replica rules
    /// - `Upstream`: record-of-truth or workflow engine failure
    async fn create_cluster(&self, request: CreateClusterRequest) -> Result<ClusterId, LifecycleError>;

    async fn scale_cluster(&self, request: ScaleClusterRequest) -> Result<(), LifecycleError>;

    /// Submit the removal workflow of a steady-state cluster with no live app groups
    async fn delete_cluster(&self, request: DeleteClusterRequest) -> Result<(), LifecycleError>;
}

pub struct StandardClusterLifecycleService {
    deps: LifecycleDependencies,
    settings: Arc<LifecycleSettings>,
    dedup: DedupGuard,
    status: StatusUpdater,
}

impl StandardClusterLifecycleService {
    pub fn new(deps: LifecycleDependencies, settings: Arc<LifecycleSettings>) -> Self {
        let dedup = DedupGuard::new(deps.workflow_engine.clone(), settings.catalog.namespace.clone());
        let status = StatusUpdater::new(deps.clusters.clone(), deps.app_groups.clone());
        Self {
            deps,
            settings,
            dedup,
            status,
        }
    }

    async fn resolve_scope(&self, scope: TenantScope) -> Result<(ContractId, CspId), LifecycleError> {
        match scope {
            TenantScope::Default => {
                let contract = self
                    .deps
                    .contracts
                    .find_default()
                    .await?
                    .ok_or_else(|| LifecycleError::NotFound("default contract not found".to_string()))?;

                let csp_id = self
                    .deps
                    .csp_infos
                    .find_ids_by_contract(contract.id)
                    .await?
                    .into_iter()
                    .next()
                    .ok_or_else(|| {
                        LifecycleError::NotFound(format!("no CSP registered under default contract {}", contract.id))
                    })?;

                Ok((contract.id, csp_id))
            }
            TenantScope::Explicit { contract_id, csp_id } => {
                self.deps
                    .contracts
                    .find_by_id(contract_id)
                    .await?
                    .ok_or_else(|| LifecycleError::NotFound(format!("contract {} not found", contract_id)))?;

                let csp = self
                    .deps
                    .csp_infos
                    .find_by_id(csp_id)
                    .await?
                    .ok_or_else(|| LifecycleError::NotFound(format!("CSP {} not found", csp_id)))?;

                if csp.contract_id != contract_id {
                    return Err(LifecycleError::NotFound(format!(
                        "CSP {} does not belong to contract {}",
                        csp_id, contract_id
                    )));
                }

                Ok((contract_id, csp_id))
            }
        }
    }
}

#[async_trait]
impl ClusterLifecycleService for StandardClusterLifecycleService {
    async fn create_cluster(&self, request: CreateClusterRequest) -> Result<ClusterId, LifecycleError> {
        // Step 1: Validate
        let validated = validate_create_cluster(&request, self.settings.require_tenant_scope)?;

        // Step 2: Resolve tenant scope
        let (contract_id, csp_id) = self.resolve_scope(validated.scope).await?;

        // Step 3: Reject duplicate in-flight creation
        self.dedup
            .check_create_cluster(self.settings.create_cluster_dedup, &contract_id.to_string())
            .await?;

        // Step 4: Derive configuration before anything is written
        let config = derive_cluster_config(
            request.config.as_ref(),
            &self.settings.cluster_defaults,
            &self.settings.regions,
        )?;

        // Step 5: Register
        let cluster_id = self
            .deps
            .clusters
            .register(NewCluster {
                contract_id,
                csp_id,
                name: validated.name,
                config,
            })
            .await?;
        info!(%cluster_id, %contract_id, "Cluster registered");

        // Step 6: Submit; the registered record stays if this fails
        let submission = self.settings.catalog.create_cluster(contract_id, cluster_id);
        let workflow_id = self
            .deps
            .workflow_engine
            .submit(&submission)
            .await
            .map_err(|e| LifecycleError::Upstream(format!("failed to submit workflow {}: {}", submission.template, e)))?;
        info!(%cluster_id, workflow = %workflow_id, "Cluster creation workflow submitted");

        // Step 7: Best-effort status update
        self.status
            .cluster(cluster_id, ClusterStatus::Installing, Some(&workflow_id))
            .await;

        Ok(cluster_id)
    }

    async fn scale_cluster(&self, request: ScaleClusterRequest) -> Result<(), LifecycleError> {
        warn!(cluster_id = %request.cluster_id, "ScaleCluster requested but not supported");
        Err(LifecycleError::Unimplemented("ScaleCluster is not implemented".to_string()))
    }

    async fn delete_cluster(&self, request: DeleteClusterRequest) -> Result<(), LifecycleError> {
        let cluster_id = validate_delete_cluster(&request)?;

        let cluster = self
            .deps
            .clusters
            .find_by_id(cluster_id)
            .await?
            .ok_or_else(|| LifecycleError::NotFound(format!("cluster {} not found", cluster_id)))?;

        if cluster.status.is_being_removed() {
            warn!(%cluster_id, status = %cluster.status, "Cluster is already being deleted");
            return Err(LifecycleError::Precondition(format!(
                "cluster {} is already being deleted (status {})",
                cluster_id, cluster.status
            )));
        }

        if !cluster.status.is_deletable() {
            warn!(%cluster_id, status = %cluster.status, "Cluster is not in a deletable state");
            return Err(LifecycleError::Precondition(format!(
                "cluster {} cannot be deleted in status {}",
                cluster_id, cluster.status
            )));
        }

        // A lookup failure is not proof the cluster has no app groups
        let app_groups = self.deps.app_groups.find_by_cluster(cluster_id).await?;
        if let Some(live) = app_groups.iter().find(|group| !group.is_deleted()) {
            warn!(%cluster_id, app_group_id = %live.id, "Cluster still has app groups");
            return Err(LifecycleError::Precondition(format!(
                "app group {} ({}) on cluster {} must be deleted first (status {})",
                live.id, live.name, cluster_id, live.status
            )));
        }

        let submission = self.settings.catalog.remove_cluster(cluster_id);
        let workflow_id = self
            .deps
            .workflow_engine
            .submit(&submission)
            .await
            .map_err(|e| LifecycleError::Upstream(format!("failed to submit workflow {}: {}", submission.template, e)))?;
        info!(%cluster_id, workflow = %workflow_id, "Cluster removal workflow submitted");

        self.status
            .cluster(cluster_id, ClusterStatus::Deleting, Some(&workflow_id))
            .await;

        Ok(())
    }
}
