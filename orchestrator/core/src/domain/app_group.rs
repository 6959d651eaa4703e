// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! App Group Domain Model
//!
//! An app group is a typed bundle of platform add-ons installed onto a cluster.
//! Two app groups are the same logical install when their [`AppGroupIdentity`]
//! matches; InstallAppGroups reuses the existing record in that case.

use serde::{Deserialize, Serialize};

use crate::domain::identifiers::{AppGroupId, ClusterId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppGroupType {
    /// Unknown or missing type on the wire; never installable
    #[default]
    Unspecified,
    Lma,
    LmaEfk,
    ServiceMesh,
}

impl std::fmt::Display for AppGroupType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AppGroupType::Unspecified => "UNSPECIFIED",
            AppGroupType::Lma => "LMA",
            AppGroupType::LmaEfk => "LMA_EFK",
            AppGroupType::ServiceMesh => "SERVICE_MESH",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppGroupStatus {
    #[default]
    Unspecified,
    Installing,
    Running,
    Deleting,
    Deleted,
}

impl std::fmt::Display for AppGroupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AppGroupStatus::Unspecified => "UNSPECIFIED",
            AppGroupStatus::Installing => "INSTALLING",
            AppGroupStatus::Running => "RUNNING",
            AppGroupStatus::Deleting => "DELETING",
            AppGroupStatus::Deleted => "DELETED",
        };
        write!(f, "{}", s)
    }
}

/// Deduplication key: (cluster id, name, type, external label)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppGroupIdentity {
    pub cluster_id: ClusterId,
    pub name: String,
    pub group_type: AppGroupType,
    pub external_label: String,
}

/// App group as held by the record-of-truth service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppGroup {
    pub id: AppGroupId,
    pub cluster_id: ClusterId,
    pub name: String,
    pub group_type: AppGroupType,
    pub external_label: String,
    pub status: AppGroupStatus,
    pub workflow_id: Option<String>,
}

impl AppGroup {
    pub fn identity(&self) -> AppGroupIdentity {
        AppGroupIdentity {
            cluster_id: self.cluster_id,
            name: self.name.clone(),
            group_type: self.group_type,
            external_label: self.external_label.clone(),
        }
    }

    pub fn matches(&self, identity: &AppGroupIdentity) -> bool {
        self.cluster_id == identity.cluster_id
            && self.name == identity.name
            && self.group_type == identity.group_type
            && self.external_label == identity.external_label
    }

    pub fn is_deleted(&self) -> bool {
        self.status == AppGroupStatus::Deleted
    }
}

/// Payload used to register a new app group record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppGroup {
    pub cluster_id: ClusterId,
    pub name: String,
    pub group_type: AppGroupType,
    pub external_label: String,
}

impl NewAppGroup {
    pub fn identity(&self) -> AppGroupIdentity {
        AppGroupIdentity {
            cluster_id: self.cluster_id,
            name: self.name.clone(),
            group_type: self.group_type,
            external_label: self.external_label.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_group(name: &str, group_type: AppGroupType, label: &str) -> AppGroup {
        AppGroup {
            id: AppGroupId::new(),
            cluster_id: ClusterId::from_string("550e8400-e29b-41d4-a716-446655440000").unwrap(),
            name: name.to_string(),
            group_type,
            external_label: label.to_string(),
            status: AppGroupStatus::Running,
            workflow_id: None,
        }
    }

    #[test]
    fn test_identity_matching() {
        let existing = app_group("lma", AppGroupType::Lma, "prod");
        let identity = existing.identity();
        assert!(existing.matches(&identity));

        let mut other_type = identity.clone();
        other_type.group_type = AppGroupType::LmaEfk;
        assert!(!existing.matches(&other_type));

        let mut other_label = identity.clone();
        other_label.external_label = "dev".to_string();
        assert!(!existing.matches(&other_label));

        let mut other_cluster = identity;
        other_cluster.cluster_id = ClusterId::new();
        assert!(!existing.matches(&other_cluster));
    }
}
