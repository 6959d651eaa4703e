// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Generated protobuf code for tks.v1 plus conversions to and from domain types.
// Wire integers are signed; negative counts are read as zero ("use default").

pub mod tks {
    pub mod v1 {
        tonic::include_proto!("tks.v1");
    }
}

use tks::v1 as pb;

use crate::domain::app_group::{AppGroup, AppGroupStatus, AppGroupType};
use crate::domain::cluster::{Cluster, ClusterConfig, ClusterRawConfig, ClusterStatus};
use crate::domain::errors::ResultCode;
use crate::domain::identifiers::{AppGroupId, ClusterId, ContractId, CspId};
use crate::domain::requests::{AppGroupInstallRequest, CreateClusterRequest, InstallAppGroupsRequest};

fn count(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

fn wire_count(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

impl From<ResultCode> for pb::Code {
    fn from(code: ResultCode) -> Self {
        match code {
            ResultCode::Ok => pb::Code::Ok,
            ResultCode::InvalidArgument => pb::Code::InvalidArgument,
            ResultCode::NotFound => pb::Code::NotFound,
            ResultCode::AlreadyExists => pb::Code::AlreadyExists,
            ResultCode::Internal => pb::Code::Internal,
            ResultCode::Unimplemented => pb::Code::Unimplemented,
        }
    }
}

impl From<pb::ClusterStatus> for ClusterStatus {
    fn from(status: pb::ClusterStatus) -> Self {
        match status {
            pb::ClusterStatus::Unspecified => ClusterStatus::Unspecified,
            pb::ClusterStatus::Installing => ClusterStatus::Installing,
            pb::ClusterStatus::Running => ClusterStatus::Running,
            pb::ClusterStatus::Error => ClusterStatus::Error,
            pb::ClusterStatus::Deleting => ClusterStatus::Deleting,
            pb::ClusterStatus::Deleted => ClusterStatus::Deleted,
        }
    }
}

impl From<ClusterStatus> for pb::ClusterStatus {
    fn from(status: ClusterStatus) -> Self {
        match status {
            ClusterStatus::Unspecified => pb::ClusterStatus::Unspecified,
            ClusterStatus::Installing => pb::ClusterStatus::Installing,
            ClusterStatus::Running => pb::ClusterStatus::Running,
            ClusterStatus::Error => pb::ClusterStatus::Error,
            ClusterStatus::Deleting => pb::ClusterStatus::Deleting,
            ClusterStatus::Deleted => pb::ClusterStatus::Deleted,
        }
    }
}

impl From<pb::AppGroupType> for AppGroupType {
    fn from(group_type: pb::AppGroupType) -> Self {
        match group_type {
            pb::AppGroupType::Unspecified => AppGroupType::Unspecified,
            pb::AppGroupType::Lma => AppGroupType::Lma,
            pb::AppGroupType::LmaEfk => AppGroupType::LmaEfk,
            pb::AppGroupType::ServiceMesh => AppGroupType::ServiceMesh,
        }
    }
}

impl From<AppGroupType> for pb::AppGroupType {
    fn from(group_type: AppGroupType) -> Self {
        match group_type {
            AppGroupType::Unspecified => pb::AppGroupType::Unspecified,
            AppGroupType::Lma => pb::AppGroupType::Lma,
            AppGroupType::LmaEfk => pb::AppGroupType::LmaEfk,
            AppGroupType::ServiceMesh => pb::AppGroupType::ServiceMesh,
        }
    }
}

impl From<pb::AppGroupStatus> for AppGroupStatus {
    fn from(status: pb::AppGroupStatus) -> Self {
        match status {
            pb::AppGroupStatus::Unspecified => AppGroupStatus::Unspecified,
            pb::AppGroupStatus::Installing => AppGroupStatus::Installing,
            pb::AppGroupStatus::Running => AppGroupStatus::Running,
            pb::AppGroupStatus::Deleting => AppGroupStatus::Deleting,
            pb::AppGroupStatus::Deleted => AppGroupStatus::Deleted,
        }
    }
}

impl From<AppGroupStatus> for pb::AppGroupStatus {
    fn from(status: AppGroupStatus) -> Self {
        match status {
            AppGroupStatus::Unspecified => pb::AppGroupStatus::Unspecified,
            AppGroupStatus::Installing => pb::AppGroupStatus::Installing,
            AppGroupStatus::Running => pb::AppGroupStatus::Running,
            AppGroupStatus::Deleting => pb::AppGroupStatus::Deleting,
            AppGroupStatus::Deleted => pb::AppGroupStatus::Deleted,
        }
    }
}

/// Unknown enum values on the wire read as UNSPECIFIED
pub fn app_group_type_from_wire(value: i32) -> AppGroupType {
    pb::AppGroupType::try_from(value)
        .map(AppGroupType::from)
        .unwrap_or_default()
}

impl From<pb::ClusterRawConf> for ClusterRawConfig {
    fn from(conf: pb::ClusterRawConf) -> Self {
        ClusterRawConfig {
            region: conf.region,
            az_count: count(conf.num_of_az),
            ssh_key_name: conf.ssh_key_name,
            machine_type: conf.machine_type,
            machine_replicas: count(conf.machine_replicas),
        }
    }
}

impl From<ClusterConfig> for pb::ClusterConf {
    fn from(conf: ClusterConfig) -> Self {
        pb::ClusterConf {
            region: conf.region,
            num_of_az: wire_count(conf.az_count),
            ssh_key_name: conf.ssh_key_name,
            machine_type: conf.machine_type,
            machine_replicas: wire_count(conf.machine_replicas),
            min_size_per_az: wire_count(conf.min_size_per_az),
            max_size_per_az: wire_count(conf.max_size_per_az),
        }
    }
}

impl From<pb::ClusterConf> for ClusterConfig {
    fn from(conf: pb::ClusterConf) -> Self {
        ClusterConfig {
            region: conf.region,
            az_count: count(conf.num_of_az),
            ssh_key_name: conf.ssh_key_name,
            machine_type: conf.machine_type,
            machine_replicas: count(conf.machine_replicas),
            min_size_per_az: count(conf.min_size_per_az),
            max_size_per_az: count(conf.max_size_per_az),
        }
    }
}

impl TryFrom<pb::Cluster> for Cluster {
    type Error = String;

    fn try_from(cluster: pb::Cluster) -> Result<Self, Self::Error> {
        Ok(Cluster {
            id: ClusterId::from_string(&cluster.id).map_err(|e| format!("cluster id '{}': {}", cluster.id, e))?,
            contract_id: ContractId::from_string(&cluster.contract_id)
                .map_err(|e| format!("contract id '{}': {}", cluster.contract_id, e))?,
            csp_id: CspId::from_string(&cluster.csp_id).map_err(|e| format!("csp id '{}': {}", cluster.csp_id, e))?,
            name: cluster.name,
            config: cluster.conf.map(ClusterConfig::from),
            status: pb::ClusterStatus::try_from(cluster.status)
                .map(ClusterStatus::from)
                .unwrap_or_default(),
            workflow_id: non_empty(cluster.workflow_id),
        })
    }
}

impl TryFrom<pb::AppGroup> for AppGroup {
    type Error = String;

    fn try_from(group: pb::AppGroup) -> Result<Self, Self::Error> {
        Ok(AppGroup {
            id: AppGroupId::from_string(&group.app_group_id)
                .map_err(|e| format!("app group id '{}': {}", group.app_group_id, e))?,
            cluster_id: ClusterId::from_string(&group.cluster_id)
                .map_err(|e| format!("cluster id '{}': {}", group.cluster_id, e))?,
            name: group.app_group_name,
            group_type: app_group_type_from_wire(group.r#type),
            external_label: group.external_label,
            status: pb::AppGroupStatus::try_from(group.status)
                .map(AppGroupStatus::from)
                .unwrap_or_default(),
            workflow_id: non_empty(group.workflow_id),
        })
    }
}

impl From<pb::CreateClusterRequest> for CreateClusterRequest {
    fn from(request: pb::CreateClusterRequest) -> Self {
        CreateClusterRequest {
            contract_id: request.contract_id,
            csp_id: request.csp_id,
            name: request.name,
            config: request.conf.map(ClusterRawConfig::from),
        }
    }
}

impl From<pb::AppGroup> for AppGroupInstallRequest {
    fn from(group: pb::AppGroup) -> Self {
        AppGroupInstallRequest {
            cluster_id: group.cluster_id,
            name: group.app_group_name,
            group_type: app_group_type_from_wire(group.r#type),
            external_label: group.external_label,
        }
    }
}

impl From<pb::InstallAppGroupsRequest> for InstallAppGroupsRequest {
    fn from(request: pb::InstallAppGroupsRequest) -> Self {
        InstallAppGroupsRequest {
            app_groups: request.app_groups.into_iter().map(AppGroupInstallRequest::from).collect(),
        }
    }
}
