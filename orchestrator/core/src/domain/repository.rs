// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Repository Interfaces
//!
//! Contracts for the record-of-truth service. Every record this service reads
//! or mutates lives there; the orchestrator keeps no state of its own.
//!
//! | Trait | Record | Implementations |
//! |-------|--------|----------------|
//! | `ContractRepository` | `Contract` | `InMemoryContractRepository`, `GrpcContractRepository` |
//! | `CspInfoRepository` | `CspInfo` | `InMemoryCspInfoRepository`, `GrpcCspInfoRepository` |
//! | `ClusterRepository` | `Cluster` | `InMemoryClusterRepository`, `GrpcClusterRepository` |
//! | `AppGroupRepository` | `AppGroup` | `InMemoryAppGroupRepository`, `GrpcAppGroupRepository` |
//!
//! A missing record is `Ok(None)`, never an error. `RepositoryError` is reserved
//! for failures of the record-of-truth service itself.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::app_group::{AppGroup, AppGroupStatus, NewAppGroup};
use crate::domain::cluster::{Cluster, ClusterStatus, NewCluster};
use crate::domain::contract::{Contract, CspInfo};
use crate::domain::identifiers::{AppGroupId, ClusterId, ContractId, CspId};

#[async_trait]
pub trait ContractRepository: Send + Sync {
    async fn find_by_id(&self, id: ContractId) -> Result<Option<Contract>, RepositoryError>;

    /// The deployment's default contract, used when a request carries no scope
    async fn find_default(&self) -> Result<Option<Contract>, RepositoryError>;
}

#[async_trait]
pub trait CspInfoRepository: Send + Sync {
    async fn find_by_id(&self, id: CspId) -> Result<Option<CspInfo>, RepositoryError>;

    async fn find_ids_by_contract(&self, contract_id: ContractId) -> Result<Vec<CspId>, RepositoryError>;
}

#[async_trait]
pub trait ClusterRepository: Send + Sync {
    async fn find_by_id(&self, id: ClusterId) -> Result<Option<Cluster>, RepositoryError>;

    async fn find_by_contract(&self, contract_id: ContractId) -> Result<Vec<Cluster>, RepositoryError>;

    /// Register a new cluster record; the record-of-truth assigns the id
    async fn register(&self, cluster: NewCluster) -> Result<ClusterId, RepositoryError>;

    async fn update_status(
        &self,
        id: ClusterId,
        status: ClusterStatus,
        workflow_id: Option<&str>,
    ) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait AppGroupRepository: Send + Sync {
    async fn find_by_id(&self, id: AppGroupId) -> Result<Option<AppGroup>, RepositoryError>;

    async fn find_by_cluster(&self, cluster_id: ClusterId) -> Result<Vec<AppGroup>, RepositoryError>;

    /// Register a new app group record; the record-of-truth assigns the id
    async fn register(&self, app_group: NewAppGroup) -> Result<AppGroupId, RepositoryError>;

    async fn update_status(
        &self,
        id: AppGroupId,
        status: AppGroupStatus,
        workflow_id: Option<&str>,
    ) -> Result<(), RepositoryError>;
}

/// Repository errors
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Record service error: {0}")]
    Upstream(String),

    #[error("Malformed record: {0}")]
    Malformed(String),
}
