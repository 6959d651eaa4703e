// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Inbound lifecycle requests, as received from the RPC surface before validation.
//!
//! Identifiers are kept as raw strings here; [`crate::domain::validation`] turns
//! them into typed values or rejects the request.

use crate::domain::app_group::AppGroupType;
use crate::domain::cluster::ClusterRawConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateClusterRequest {
    /// Empty means "use the caller's default contract"
    pub contract_id: String,
    pub csp_id: String,
    pub name: String,
    pub config: Option<ClusterRawConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaleClusterRequest {
    pub cluster_id: String,
    pub machine_replicas: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteClusterRequest {
    pub cluster_id: String,
}

/// One entry of an InstallAppGroups batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppGroupInstallRequest {
    pub cluster_id: String,
    pub name: String,
    pub group_type: AppGroupType,
    pub external_label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallAppGroupsRequest {
    pub app_groups: Vec<AppGroupInstallRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UninstallAppGroupsRequest {
    pub app_group_ids: Vec<String>,
}
