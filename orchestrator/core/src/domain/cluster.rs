// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Cluster Domain Model
//!
//! The cluster record itself is owned by the record-of-truth service; this crate
//! only registers new records and mutates their status field.
//!
//! # Lifecycle
//!
//! ```text
//! UNSPECIFIED ──CreateCluster──▶ INSTALLING ──(workflow callback)──▶ RUNNING | ERROR
//! RUNNING | ERROR ──DeleteCluster──▶ DELETING ──(workflow callback)──▶ DELETED
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::identifiers::{ClusterId, ContractId, CspId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClusterStatus {
    #[default]
    Unspecified,
    Installing,
    Running,
    Error,
    Deleting,
    Deleted,
}

impl ClusterStatus {
    /// Only steady-state clusters may be torn down.
    pub fn is_deletable(&self) -> bool {
        matches!(self, ClusterStatus::Running | ClusterStatus::Error)
    }

    /// Removal already requested or finished.
    pub fn is_being_removed(&self) -> bool {
        matches!(self, ClusterStatus::Deleting | ClusterStatus::Deleted)
    }
}

impl std::fmt::Display for ClusterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ClusterStatus::Unspecified => "UNSPECIFIED",
            ClusterStatus::Installing => "INSTALLING",
            ClusterStatus::Running => "RUNNING",
            ClusterStatus::Error => "ERROR",
            ClusterStatus::Deleting => "DELETING",
            ClusterStatus::Deleted => "DELETED",
        };
        write!(f, "{}", s)
    }
}

/// Sparse, user-supplied infrastructure configuration.
///
/// Every field may carry its zero value, meaning "use the default".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClusterRawConfig {
    pub region: String,
    pub az_count: u32,
    pub ssh_key_name: String,
    pub machine_type: String,
    pub machine_replicas: u32,
}

/// Concrete, bounds-checked configuration produced by
/// [`derive_cluster_config`](crate::domain::cluster_config::derive_cluster_config).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterConfig {
    pub region: String,
    pub az_count: u32,
    pub ssh_key_name: String,
    pub machine_type: String,
    /// 0 means the per-AZ defaults were applied
    pub machine_replicas: u32,
    pub min_size_per_az: u32,
    pub max_size_per_az: u32,
}

/// Cluster as held by the record-of-truth service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: ClusterId,
    pub contract_id: ContractId,
    pub csp_id: CspId,
    pub name: String,
    pub config: Option<ClusterConfig>,
    pub status: ClusterStatus,
    pub workflow_id: Option<String>,
}

/// Payload used to register a brand new cluster record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCluster {
    pub contract_id: ContractId,
    pub csp_id: CspId,
    pub name: String,
    pub config: ClusterConfig,
}
