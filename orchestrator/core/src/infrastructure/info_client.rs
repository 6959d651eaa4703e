// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Record-of-truth gRPC Adapters
//!
//! Implements the repository ports over the contract service and the info
//! service (CSP, cluster and app group records).
//!
//! Every upstream response carries its own result code. `CODE_NOT_FOUND`, or a
//! `NOT_FOUND` transport status, is an empty lookup (`Ok(None)`); every other
//! non-OK outcome becomes [`RepositoryError::Upstream`] with the message kept.

use async_trait::async_trait;
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};

use crate::domain::app_group::{AppGroup, AppGroupStatus, NewAppGroup};
use crate::domain::cluster::{Cluster, ClusterStatus, NewCluster};
use crate::domain::contract::{Contract, CspInfo};
use crate::domain::identifiers::{AppGroupId, ClusterId, ContractId, CspId};
use crate::domain::repository::{
    AppGroupRepository, ClusterRepository, ContractRepository, CspInfoRepository, RepositoryError,
};
use crate::infrastructure::tks_proto::tks::v1 as pb;
use pb::app_info_service_client::AppInfoServiceClient;
use pb::cluster_info_service_client::ClusterInfoServiceClient;
use pb::contract_service_client::ContractServiceClient;
use pb::csp_info_service_client::CspInfoServiceClient;

/// Lazily connected channel; the first call dials the upstream
pub fn lazy_channel(uri: &str, timeout: Duration) -> Result<Channel, RepositoryError> {
    let endpoint = Endpoint::from_shared(uri.to_string())
        .map_err(|e| RepositoryError::Upstream(format!("invalid upstream address {}: {}", uri, e)))?
        .timeout(timeout)
        .connect_timeout(timeout);
    Ok(endpoint.connect_lazy())
}

/// Outcome of an upstream call before the payload is read
enum Answer {
    Found,
    Missing,
}

fn answer(code: i32, error: Option<pb::Error>, operation: &str) -> Result<Answer, RepositoryError> {
    match pb::Code::try_from(code) {
        Ok(pb::Code::Ok) => Ok(Answer::Found),
        Ok(pb::Code::NotFound) => Ok(Answer::Missing),
        other => {
            let code_name = other
                .map(|c| c.as_str_name().to_string())
                .unwrap_or_else(|_| code.to_string());
            let msg = error.map(|e| e.msg).unwrap_or_default();
            Err(RepositoryError::Upstream(format!("{} returned {}: {}", operation, code_name, msg)))
        }
    }
}

fn transport<T>(result: Result<tonic::Response<T>, tonic::Status>, operation: &str) -> Result<Option<T>, RepositoryError> {
    match result {
        Ok(response) => Ok(Some(response.into_inner())),
        Err(status) if status.code() == tonic::Code::NotFound => Ok(None),
        Err(status) => Err(RepositoryError::Upstream(format!(
            "{} failed: {}",
            operation,
            status.message()
        ))),
    }
}

fn malformed(operation: &str, reason: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::Malformed(format!("{}: {}", operation, reason))
}

// ============================================================================
// Contract Service
// ============================================================================

#[derive(Clone)]
pub struct GrpcContractRepository {
    client: ContractServiceClient<Channel>,
}

impl GrpcContractRepository {
    pub fn new(channel: Channel) -> Self {
        Self {
            client: ContractServiceClient::new(channel),
        }
    }

    fn contract(response: pb::GetContractResponse, operation: &str) -> Result<Option<Contract>, RepositoryError> {
        match answer(response.code, response.error, operation)? {
            Answer::Missing => Ok(None),
            Answer::Found => {
                let Some(contract) = response.contract else {
                    return Ok(None);
                };
                let id = ContractId::from_string(&contract.contract_id).map_err(|e| malformed(operation, e))?;
                Ok(Some(Contract {
                    id,
                    contractor_name: contract.contractor_name,
                }))
            }
        }
    }
}

#[async_trait]
impl ContractRepository for GrpcContractRepository {
    async fn find_by_id(&self, id: ContractId) -> Result<Option<Contract>, RepositoryError> {
        let mut client = self.client.clone();
        let request = pb::GetContractRequest {
            contract_id: id.to_string(),
        };
        match transport(client.get_contract(request).await, "GetContract")? {
            Some(response) => Self::contract(response, "GetContract"),
            None => Ok(None),
        }
    }

    async fn find_default(&self) -> Result<Option<Contract>, RepositoryError> {
        let mut client = self.client.clone();
        match transport(
            client.get_default_contract(pb::GetDefaultContractRequest {}).await,
            "GetDefaultContract",
        )? {
            Some(response) => Self::contract(response, "GetDefaultContract"),
            None => Ok(None),
        }
    }
}

// ============================================================================
// CSP Info
// ============================================================================

#[derive(Clone)]
pub struct GrpcCspInfoRepository {
    client: CspInfoServiceClient<Channel>,
}

impl GrpcCspInfoRepository {
    pub fn new(channel: Channel) -> Self {
        Self {
            client: CspInfoServiceClient::new(channel),
        }
    }
}

#[async_trait]
impl CspInfoRepository for GrpcCspInfoRepository {
    async fn find_by_id(&self, id: CspId) -> Result<Option<CspInfo>, RepositoryError> {
        let mut client = self.client.clone();
        let request = pb::IdRequest { id: id.to_string() };
        let Some(response) = transport(client.get_csp_info(request).await, "GetCspInfo")? else {
            return Ok(None);
        };

        match answer(response.code, response.error, "GetCspInfo")? {
            Answer::Missing => Ok(None),
            Answer::Found => {
                let contract_id =
                    ContractId::from_string(&response.contract_id).map_err(|e| malformed("GetCspInfo", e))?;
                Ok(Some(CspInfo {
                    id,
                    contract_id,
                    name: response.csp_name,
                }))
            }
        }
    }

    async fn find_ids_by_contract(&self, contract_id: ContractId) -> Result<Vec<CspId>, RepositoryError> {
        let mut client = self.client.clone();
        let request = pb::IdRequest {
            id: contract_id.to_string(),
        };
        let Some(response) = transport(
            client.get_csp_ids_by_contract_id(request).await,
            "GetCspIdsByContractId",
        )?
        else {
            return Ok(Vec::new());
        };

        match answer(response.code, response.error, "GetCspIdsByContractId")? {
            Answer::Missing => Ok(Vec::new()),
            Answer::Found => response
                .ids
                .iter()
                .map(|id| CspId::from_string(id).map_err(|e| malformed("GetCspIdsByContractId", e)))
                .collect(),
        }
    }
}

// ============================================================================
// Cluster Info
// ============================================================================

#[derive(Clone)]
pub struct GrpcClusterRepository {
    client: ClusterInfoServiceClient<Channel>,
}

impl GrpcClusterRepository {
    pub fn new(channel: Channel) -> Self {
        Self {
            client: ClusterInfoServiceClient::new(channel),
        }
    }
}

#[async_trait]
impl ClusterRepository for GrpcClusterRepository {
    async fn find_by_id(&self, id: ClusterId) -> Result<Option<Cluster>, RepositoryError> {
        let mut client = self.client.clone();
        let request = pb::GetClusterRequest {
            cluster_id: id.to_string(),
        };
        let Some(response) = transport(client.get_cluster(request).await, "GetCluster")? else {
            return Ok(None);
        };

        match answer(response.code, response.error, "GetCluster")? {
            Answer::Missing => Ok(None),
            Answer::Found => response
                .cluster
                .map(|c| Cluster::try_from(c).map_err(|e| malformed("GetCluster", e)))
                .transpose(),
        }
    }

    async fn find_by_contract(&self, contract_id: ContractId) -> Result<Vec<Cluster>, RepositoryError> {
        let mut client = self.client.clone();
        let request = pb::GetClustersRequest {
            contract_id: contract_id.to_string(),
        };
        let Some(response) = transport(client.get_clusters(request).await, "GetClusters")? else {
            return Ok(Vec::new());
        };

        match answer(response.code, response.error, "GetClusters")? {
            Answer::Missing => Ok(Vec::new()),
            Answer::Found => response
                .clusters
                .into_iter()
                .map(|c| Cluster::try_from(c).map_err(|e| malformed("GetClusters", e)))
                .collect(),
        }
    }

    async fn register(&self, cluster: NewCluster) -> Result<ClusterId, RepositoryError> {
        let mut client = self.client.clone();
        let request = pb::AddClusterInfoRequest {
            contract_id: cluster.contract_id.to_string(),
            csp_id: cluster.csp_id.to_string(),
            name: cluster.name,
            conf: Some(cluster.config.into()),
        };
        let response = transport(client.add_cluster_info(request).await, "AddClusterInfo")?
            .ok_or_else(|| RepositoryError::Upstream("AddClusterInfo failed: not found".to_string()))?;

        match answer(response.code, response.error, "AddClusterInfo")? {
            Answer::Missing => Err(RepositoryError::NotFound("AddClusterInfo returned NOT_FOUND".to_string())),
            Answer::Found => ClusterId::from_string(&response.id).map_err(|e| malformed("AddClusterInfo", e)),
        }
    }

    async fn update_status(
        &self,
        id: ClusterId,
        status: ClusterStatus,
        workflow_id: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let mut client = self.client.clone();
        let request = pb::UpdateClusterStatusRequest {
            cluster_id: id.to_string(),
            status: pb::ClusterStatus::from(status) as i32,
            workflow_id: workflow_id.unwrap_or_default().to_string(),
        };
        let response = transport(client.update_cluster_status(request).await, "UpdateClusterStatus")?
            .ok_or_else(|| RepositoryError::NotFound(format!("cluster {}", id)))?;

        match answer(response.code, response.error, "UpdateClusterStatus")? {
            Answer::Found => Ok(()),
            Answer::Missing => Err(RepositoryError::NotFound(format!("cluster {}", id))),
        }
    }
}

// ============================================================================
// App Info
// ============================================================================

#[derive(Clone)]
pub struct GrpcAppGroupRepository {
    client: AppInfoServiceClient<Channel>,
}

impl GrpcAppGroupRepository {
    pub fn new(channel: Channel) -> Self {
        Self {
            client: AppInfoServiceClient::new(channel),
        }
    }
}

#[async_trait]
impl AppGroupRepository for GrpcAppGroupRepository {
    async fn find_by_id(&self, id: AppGroupId) -> Result<Option<AppGroup>, RepositoryError> {
        let mut client = self.client.clone();
        let request = pb::GetAppGroupRequest {
            app_group_id: id.to_string(),
        };
        let Some(response) = transport(client.get_app_group(request).await, "GetAppGroup")? else {
            return Ok(None);
        };

        match answer(response.code, response.error, "GetAppGroup")? {
            Answer::Missing => Ok(None),
            Answer::Found => response
                .app_group
                .map(|g| AppGroup::try_from(g).map_err(|e| malformed("GetAppGroup", e)))
                .transpose(),
        }
    }

    async fn find_by_cluster(&self, cluster_id: ClusterId) -> Result<Vec<AppGroup>, RepositoryError> {
        let mut client = self.client.clone();
        let request = pb::IdRequest {
            id: cluster_id.to_string(),
        };
        let Some(response) = transport(
            client.get_app_groups_by_cluster_id(request).await,
            "GetAppGroupsByClusterId",
        )?
        else {
            return Ok(Vec::new());
        };

        match answer(response.code, response.error, "GetAppGroupsByClusterId")? {
            Answer::Missing => Ok(Vec::new()),
            Answer::Found => response
                .app_groups
                .into_iter()
                .map(|g| AppGroup::try_from(g).map_err(|e| malformed("GetAppGroupsByClusterId", e)))
                .collect(),
        }
    }

    async fn register(&self, app_group: NewAppGroup) -> Result<AppGroupId, RepositoryError> {
        let mut client = self.client.clone();
        let cluster_id = app_group.cluster_id.to_string();
        let request = pb::CreateAppGroupRequest {
            cluster_id: cluster_id.clone(),
            app_group: Some(pb::AppGroup {
                app_group_id: String::new(),
                app_group_name: app_group.name,
                r#type: pb::AppGroupType::from(app_group.group_type) as i32,
                cluster_id,
                status: pb::AppGroupStatus::Unspecified as i32,
                external_label: app_group.external_label,
                workflow_id: String::new(),
            }),
        };
        let response = transport(client.create_app_group(request).await, "CreateAppGroup")?
            .ok_or_else(|| RepositoryError::Upstream("CreateAppGroup failed: not found".to_string()))?;

        match answer(response.code, response.error, "CreateAppGroup")? {
            Answer::Missing => Err(RepositoryError::NotFound("CreateAppGroup returned NOT_FOUND".to_string())),
            Answer::Found => AppGroupId::from_string(&response.id).map_err(|e| malformed("CreateAppGroup", e)),
        }
    }

    async fn update_status(
        &self,
        id: AppGroupId,
        status: AppGroupStatus,
        workflow_id: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let mut client = self.client.clone();
        let request = pb::UpdateAppGroupStatusRequest {
            app_group_id: id.to_string(),
            status: pb::AppGroupStatus::from(status) as i32,
            workflow_id: workflow_id.unwrap_or_default().to_string(),
        };
        let response = transport(client.update_app_group_status(request).await, "UpdateAppGroupStatus")?
            .ok_or_else(|| RepositoryError::NotFound(format!("app group {}", id)))?;

        match answer(response.code, response.error, "UpdateAppGroupStatus")? {
            Answer::Found => Ok(()),
            Answer::Missing => Err(RepositoryError::NotFound(format!("app group {}", id))),
        }
    }
}
