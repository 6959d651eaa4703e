// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Shared fixtures: in-memory records plus a workflow engine that records
//! every submission and fails on demand.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use cluster_lcm_core::application::{
    LifecycleDependencies, LifecycleSettings, StandardAppGroupLifecycleService,
    StandardClusterLifecycleService,
};
use cluster_lcm_core::domain::app_group::{AppGroup, AppGroupStatus, AppGroupType, NewAppGroup};
use cluster_lcm_core::domain::cluster::{Cluster, ClusterConfig, ClusterStatus, NewCluster};
use cluster_lcm_core::domain::contract::{Contract, CspInfo};
use cluster_lcm_core::domain::identifiers::{AppGroupId, ClusterId, ContractId, CspId};
use cluster_lcm_core::domain::lcm_config::LcmConfigManifest;
use cluster_lcm_core::domain::repository::{AppGroupRepository, ClusterRepository, RepositoryError};
use cluster_lcm_core::domain::workflow::{
    WorkflowEngine, WorkflowEngineError, WorkflowPhase, WorkflowSubmission, WorkflowSummary,
    WorkflowTemplateSummary,
};
use cluster_lcm_core::infrastructure::repositories::{
    InMemoryAppGroupRepository, InMemoryClusterRepository, InMemoryContractRepository,
    InMemoryCspInfoRepository,
};

#[derive(Default)]
pub struct RecordingWorkflowEngine {
    submissions: Mutex<Vec<WorkflowSubmission>>,
    failing_templates: Mutex<HashSet<String>>,
    workflows: Mutex<Vec<WorkflowSummary>>,
    fail_listing: AtomicBool,
    counter: AtomicUsize,
}

impl RecordingWorkflowEngine {
    pub fn fail_template(&self, template: &str) {
        self.failing_templates.lock().unwrap().insert(template.to_string());
    }

    pub fn fail_listing(&self) {
        self.fail_listing.store(true, Ordering::SeqCst);
    }

    pub fn add_workflow(&self, name: &str, phase: WorkflowPhase, parameters: &[(&str, &str)]) {
        self.workflows.lock().unwrap().push(WorkflowSummary {
            name: name.to_string(),
            namespace: "argo".to_string(),
            phase,
            parameters: parameters
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
    }

    pub fn submissions(&self) -> Vec<WorkflowSubmission> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn templates(&self) -> Vec<String> {
        self.submissions().into_iter().map(|s| s.template).collect()
    }
}

#[async_trait]
impl WorkflowEngine for RecordingWorkflowEngine {
    async fn submit(&self, submission: &WorkflowSubmission) -> Result<String, WorkflowEngineError> {
        if self.failing_templates.lock().unwrap().contains(&submission.template) {
            return Err(WorkflowEngineError::Status {
                status: 500,
                body: format!("template {} rejected", submission.template),
            });
        }

        self.submissions.lock().unwrap().push(submission.clone());
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{}-{}", submission.template, n))
    }

    async fn list_workflows(&self, _namespace: &str) -> Result<Vec<WorkflowSummary>, WorkflowEngineError> {
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(WorkflowEngineError::Transport("connection refused".to_string()));
        }
        Ok(self.workflows.lock().unwrap().clone())
    }

    async fn list_workflow_templates(
        &self,
        _namespace: &str,
    ) -> Result<Vec<WorkflowTemplateSummary>, WorkflowEngineError> {
        Ok(Vec::new())
    }
}

/// App group repository whose listing by cluster always fails
pub struct UnlistableAppGroupRepository {
    pub inner: InMemoryAppGroupRepository,
}

#[async_trait]
impl AppGroupRepository for UnlistableAppGroupRepository {
    async fn find_by_id(&self, id: AppGroupId) -> Result<Option<AppGroup>, RepositoryError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_cluster(&self, _cluster_id: ClusterId) -> Result<Vec<AppGroup>, RepositoryError> {
        Err(RepositoryError::Upstream("tks-info unavailable".to_string()))
    }

    async fn register(&self, app_group: NewAppGroup) -> Result<AppGroupId, RepositoryError> {
        self.inner.register(app_group).await
    }

    async fn update_status(
        &self,
        id: AppGroupId,
        status: AppGroupStatus,
        workflow_id: Option<&str>,
    ) -> Result<(), RepositoryError> {
        self.inner.update_status(id, status, workflow_id).await
    }
}

/// Cluster repository whose status updates always fail
pub struct FrozenClusterRepository {
    pub inner: InMemoryClusterRepository,
}

#[async_trait]
impl ClusterRepository for FrozenClusterRepository {
    async fn find_by_id(&self, id: ClusterId) -> Result<Option<Cluster>, RepositoryError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_contract(&self, contract_id: ContractId) -> Result<Vec<Cluster>, RepositoryError> {
        self.inner.find_by_contract(contract_id).await
    }

    async fn register(&self, cluster: NewCluster) -> Result<ClusterId, RepositoryError> {
        self.inner.register(cluster).await
    }

    async fn update_status(
        &self,
        _id: ClusterId,
        _status: ClusterStatus,
        _workflow_id: Option<&str>,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Upstream("status update rejected".to_string()))
    }
}

pub struct Harness {
    pub contracts: InMemoryContractRepository,
    pub csp_infos: InMemoryCspInfoRepository,
    pub clusters: InMemoryClusterRepository,
    pub app_groups: InMemoryAppGroupRepository,
    pub engine: Arc<RecordingWorkflowEngine>,
    pub settings: LifecycleSettings,
}

impl Harness {
    pub fn new() -> Self {
        let settings = LifecycleSettings::from_config(&LcmConfigManifest::default()).unwrap();
        Self {
            contracts: InMemoryContractRepository::new(),
            csp_infos: InMemoryCspInfoRepository::new(),
            clusters: InMemoryClusterRepository::new(),
            app_groups: InMemoryAppGroupRepository::new(),
            engine: Arc::new(RecordingWorkflowEngine::default()),
            settings,
        }
    }

    pub fn deps(&self) -> LifecycleDependencies {
        LifecycleDependencies {
            contracts: Arc::new(self.contracts.clone()),
            csp_infos: Arc::new(self.csp_infos.clone()),
            clusters: Arc::new(self.clusters.clone()),
            app_groups: Arc::new(self.app_groups.clone()),
            workflow_engine: self.engine.clone(),
        }
    }

    pub fn cluster_service(&self) -> StandardClusterLifecycleService {
        StandardClusterLifecycleService::new(self.deps(), Arc::new(self.settings.clone()))
    }

    pub fn cluster_service_with(&self, deps: LifecycleDependencies) -> StandardClusterLifecycleService {
        StandardClusterLifecycleService::new(deps, Arc::new(self.settings.clone()))
    }

    pub fn app_group_service(&self) -> StandardAppGroupLifecycleService {
        StandardAppGroupLifecycleService::new(self.deps(), Arc::new(self.settings.clone()))
    }

    /// Contract with one CSP account; optionally the default contract
    pub async fn seed_scope(&self, default: bool) -> (ContractId, CspId) {
        let contract = Contract {
            id: ContractId::new(),
            contractor_name: "tester".to_string(),
        };
        let contract_id = contract.id;
        if default {
            self.contracts.insert_default(contract).await;
        } else {
            self.contracts.insert(contract).await;
        }

        let csp_id = CspId::new();
        self.csp_infos
            .insert(CspInfo {
                id: csp_id,
                contract_id,
                name: "aws".to_string(),
            })
            .await;

        (contract_id, csp_id)
    }

    pub async fn seed_cluster(&self, status: ClusterStatus) -> ClusterId {
        let id = ClusterId::new();
        self.clusters
            .insert(Cluster {
                id,
                contract_id: ContractId::new(),
                csp_id: CspId::new(),
                name: "seeded".to_string(),
                config: Some(ClusterConfig {
                    region: "ap-northeast-2".to_string(),
                    az_count: 3,
                    ssh_key_name: "tks-seoul".to_string(),
                    machine_type: "t3.large".to_string(),
                    machine_replicas: 3,
                    min_size_per_az: 1,
                    max_size_per_az: 5,
                }),
                status,
                workflow_id: None,
            })
            .await;
        id
    }

    pub async fn seed_app_group(
        &self,
        cluster_id: ClusterId,
        name: &str,
        group_type: AppGroupType,
        status: AppGroupStatus,
    ) -> AppGroupId {
        let id = AppGroupId::new();
        self.app_groups
            .insert(AppGroup {
                id,
                cluster_id,
                name: name.to_string(),
                group_type,
                external_label: "prod".to_string(),
                status,
                workflow_id: None,
            })
            .await;
        id
    }

    pub async fn cluster(&self, id: ClusterId) -> Option<Cluster> {
        self.clusters.find_by_id(id).await.unwrap()
    }

    pub async fn app_group(&self, id: AppGroupId) -> Option<AppGroup> {
        self.app_groups.find_by_id(id).await.unwrap()
    }
}
