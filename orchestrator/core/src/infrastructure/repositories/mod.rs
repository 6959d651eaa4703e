// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Repository Implementations
//!
//! In-memory implementations of the record-of-truth ports, used by
//! `serve --in-memory` for local development and by the test suites. The gRPC
//! implementations live in [`crate::infrastructure::info_client`].
//!
//! Records are kept in insertion order so list lookups are deterministic.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::app_group::{AppGroup, AppGroupStatus, NewAppGroup};
use crate::domain::cluster::{Cluster, ClusterStatus, NewCluster};
use crate::domain::contract::{Contract, CspInfo};
use crate::domain::identifiers::{AppGroupId, ClusterId, ContractId, CspId};
use crate::domain::repository::{
    AppGroupRepository, ClusterRepository, ContractRepository, CspInfoRepository, RepositoryError,
};

#[derive(Clone, Default)]
pub struct InMemoryContractRepository {
    contracts: Arc<RwLock<HashMap<ContractId, Contract>>>,
    default_contract: Arc<RwLock<Option<ContractId>>>,
}

impl InMemoryContractRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, contract: Contract) {
        self.contracts.write().await.insert(contract.id, contract);
    }

    /// Insert `contract` and make it the default
    pub async fn insert_default(&self, contract: Contract) {
        *self.default_contract.write().await = Some(contract.id);
        self.insert(contract).await;
    }
}

#[async_trait]
impl ContractRepository for InMemoryContractRepository {
    async fn find_by_id(&self, id: ContractId) -> Result<Option<Contract>, RepositoryError> {
        Ok(self.contracts.read().await.get(&id).cloned())
    }

    async fn find_default(&self) -> Result<Option<Contract>, RepositoryError> {
        let default_id = *self.default_contract.read().await;
        match default_id {
            Some(id) => self.find_by_id(id).await,
            None => Ok(None),
        }
    }
}

#[derive(Clone, Default)]
pub struct InMemoryCspInfoRepository {
    csp_infos: Arc<RwLock<Vec<CspInfo>>>,
}

impl InMemoryCspInfoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, csp_info: CspInfo) {
        let mut csp_infos = self.csp_infos.write().await;
        csp_infos.retain(|existing| existing.id != csp_info.id);
        csp_infos.push(csp_info);
    }
}

#[async_trait]
impl CspInfoRepository for InMemoryCspInfoRepository {
    async fn find_by_id(&self, id: CspId) -> Result<Option<CspInfo>, RepositoryError> {
        Ok(self.csp_infos.read().await.iter().find(|c| c.id == id).cloned())
    }

    async fn find_ids_by_contract(&self, contract_id: ContractId) -> Result<Vec<CspId>, RepositoryError> {
        Ok(self
            .csp_infos
            .read()
            .await
            .iter()
            .filter(|c| c.contract_id == contract_id)
            .map(|c| c.id)
            .collect())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryClusterRepository {
    clusters: Arc<RwLock<Vec<Cluster>>>,
}

impl InMemoryClusterRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, cluster: Cluster) {
        let mut clusters = self.clusters.write().await;
        clusters.retain(|existing| existing.id != cluster.id);
        clusters.push(cluster);
    }

    pub async fn list_all(&self) -> Vec<Cluster> {
        self.clusters.read().await.clone()
    }
}

#[async_trait]
impl ClusterRepository for InMemoryClusterRepository {
    async fn find_by_id(&self, id: ClusterId) -> Result<Option<Cluster>, RepositoryError> {
        Ok(self.clusters.read().await.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_contract(&self, contract_id: ContractId) -> Result<Vec<Cluster>, RepositoryError> {
        Ok(self
            .clusters
            .read()
            .await
            .iter()
            .filter(|c| c.contract_id == contract_id)
            .cloned()
            .collect())
    }

    async fn register(&self, cluster: NewCluster) -> Result<ClusterId, RepositoryError> {
        let id = ClusterId::new();
        self.clusters.write().await.push(Cluster {
            id,
            contract_id: cluster.contract_id,
            csp_id: cluster.csp_id,
            name: cluster.name,
            config: Some(cluster.config),
            status: ClusterStatus::Unspecified,
            workflow_id: None,
        });
        Ok(id)
    }

    async fn update_status(
        &self,
        id: ClusterId,
        status: ClusterStatus,
        workflow_id: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let mut clusters = self.clusters.write().await;
        let cluster = clusters
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| RepositoryError::NotFound(format!("cluster {}", id)))?;
        cluster.status = status;
        if let Some(workflow_id) = workflow_id {
            cluster.workflow_id = Some(workflow_id.to_string());
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryAppGroupRepository {
    app_groups: Arc<RwLock<Vec<AppGroup>>>,
}

impl InMemoryAppGroupRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, app_group: AppGroup) {
        let mut app_groups = self.app_groups.write().await;
        app_groups.retain(|existing| existing.id != app_group.id);
        app_groups.push(app_group);
    }

    pub async fn list_all(&self) -> Vec<AppGroup> {
        self.app_groups.read().await.clone()
    }
}

#[async_trait]
impl AppGroupRepository for InMemoryAppGroupRepository {
    async fn find_by_id(&self, id: AppGroupId) -> Result<Option<AppGroup>, RepositoryError> {
        Ok(self.app_groups.read().await.iter().find(|g| g.id == id).cloned())
    }

    async fn find_by_cluster(&self, cluster_id: ClusterId) -> Result<Vec<AppGroup>, RepositoryError> {
        Ok(self
            .app_groups
            .read()
            .await
            .iter()
            .filter(|g| g.cluster_id == cluster_id)
            .cloned()
            .collect())
    }

    async fn register(&self, app_group: NewAppGroup) -> Result<AppGroupId, RepositoryError> {
        let id = AppGroupId::new();
        self.app_groups.write().await.push(AppGroup {
            id,
            cluster_id: app_group.cluster_id,
            name: app_group.name,
            group_type: app_group.group_type,
            external_label: app_group.external_label,
            status: AppGroupStatus::Unspecified,
            workflow_id: None,
        });
        Ok(id)
    }

    async fn update_status(
        &self,
        id: AppGroupId,
        status: AppGroupStatus,
        workflow_id: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let mut app_groups = self.app_groups.write().await;
        let app_group = app_groups
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| RepositoryError::NotFound(format!("app group {}", id)))?;
        app_group.status = status;
        if let Some(workflow_id) = workflow_id {
            app_group.workflow_id = Some(workflow_id.to_string());
        }
        Ok(())
    }
}
