// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Request Validation
//!
//! Syntactic and cross-field checks for every lifecycle request. Validators are
//! pure: they never call upstream services. Each returns the typed form of the
//! request on success so later stages never re-parse identifiers.
//!
//! Batch requests are validated all-or-nothing: the first invalid entry rejects
//! the whole batch before any entry is processed.

use thiserror::Error;

use crate::domain::app_group::NewAppGroup;
use crate::domain::identifiers::{AppGroupId, ClusterId, ContractId, CspId};
use crate::domain::requests::{
    CreateClusterRequest, DeleteClusterRequest, InstallAppGroupsRequest, UninstallAppGroupsRequest,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid contract ID {0}")]
    InvalidContractId(String),

    #[error("invalid CSP ID {0}")]
    InvalidCspId(String),

    #[error("invalid cluster ID {0}")]
    InvalidClusterId(String),

    #[error("invalid app group ID {0}")]
    InvalidAppGroupId(String),

    #[error("Name must have value")]
    MissingName,

    #[error("ExternalLabel must have value")]
    MissingExternalLabel,

    #[error("contract ID and CSP ID must both be supplied")]
    MissingTenantScope,
}

/// Tenant scope named by a CreateCluster request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantScope {
    /// Resolve the caller's default contract and its first cloud account
    Default,
    Explicit { contract_id: ContractId, csp_id: CspId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCreateCluster {
    pub scope: TenantScope,
    pub name: String,
}

/// Validate a CreateCluster request.
///
/// With `require_tenant_scope` both identifiers are mandatory; otherwise an empty
/// contract ID selects the default tenant scope and the CSP ID is ignored.
pub fn validate_create_cluster(
    request: &CreateClusterRequest,
    require_tenant_scope: bool,
) -> Result<ValidatedCreateCluster, ValidationError> {
    if require_tenant_scope && (request.contract_id.is_empty() || request.csp_id.is_empty()) {
        return Err(ValidationError::MissingTenantScope);
    }

    let scope = if request.contract_id.is_empty() {
        TenantScope::Default
    } else {
        let contract_id = ContractId::from_string(&request.contract_id)
            .map_err(|_| ValidationError::InvalidContractId(request.contract_id.clone()))?;
        let csp_id = CspId::from_string(&request.csp_id)
            .map_err(|_| ValidationError::InvalidCspId(request.csp_id.clone()))?;
        TenantScope::Explicit { contract_id, csp_id }
    };

    if request.name.is_empty() {
        return Err(ValidationError::MissingName);
    }

    Ok(ValidatedCreateCluster {
        scope,
        name: request.name.clone(),
    })
}

pub fn validate_cluster_id(cluster_id: &str) -> Result<ClusterId, ValidationError> {
    ClusterId::from_string(cluster_id).map_err(|_| ValidationError::InvalidClusterId(cluster_id.to_string()))
}

pub fn validate_delete_cluster(request: &DeleteClusterRequest) -> Result<ClusterId, ValidationError> {
    validate_cluster_id(&request.cluster_id)
}

/// Validate every InstallAppGroups entry, in request order.
///
/// Entries with an unknown app group type pass validation; they are skipped
/// individually when a workflow template is selected.
pub fn validate_install_app_groups(request: &InstallAppGroupsRequest) -> Result<Vec<NewAppGroup>, ValidationError> {
    request
        .app_groups
        .iter()
        .map(|entry| {
            let cluster_id = validate_cluster_id(&entry.cluster_id)?;
            if entry.name.is_empty() {
                return Err(ValidationError::MissingName);
            }
            if entry.external_label.is_empty() {
                return Err(ValidationError::MissingExternalLabel);
            }
            Ok(NewAppGroup {
                cluster_id,
                name: entry.name.clone(),
                group_type: entry.group_type,
                external_label: entry.external_label.clone(),
            })
        })
        .collect()
}

pub fn validate_uninstall_app_groups(request: &UninstallAppGroupsRequest) -> Result<Vec<AppGroupId>, ValidationError> {
    request
        .app_group_ids
        .iter()
        .map(|id| AppGroupId::from_string(id).map_err(|_| ValidationError::InvalidAppGroupId(id.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::app_group::AppGroupType;
    use crate::domain::requests::AppGroupInstallRequest;

    const CONTRACT: &str = "2b4a1c0e-6a55-4b7e-9a0a-6f1f3e2d9c11";
    const CSP: &str = "7d3f2a10-1c2b-4e5f-8a9b-0c1d2e3f4a5b";
    const CLUSTER: &str = "550e8400-e29b-41d4-a716-446655440000";

    fn create_request(contract_id: &str, csp_id: &str, name: &str) -> CreateClusterRequest {
        CreateClusterRequest {
            contract_id: contract_id.to_string(),
            csp_id: csp_id.to_string(),
            name: name.to_string(),
            config: None,
        }
    }

    fn install_entry(cluster_id: &str, name: &str, label: &str) -> AppGroupInstallRequest {
        AppGroupInstallRequest {
            cluster_id: cluster_id.to_string(),
            name: name.to_string(),
            group_type: AppGroupType::Lma,
            external_label: label.to_string(),
        }
    }

    #[test]
    fn test_create_cluster_default_scope() {
        let validated = validate_create_cluster(&create_request("", "", "demo"), false).unwrap();
        assert_eq!(validated.scope, TenantScope::Default);
        assert_eq!(validated.name, "demo");
    }

    #[test]
    fn test_create_cluster_explicit_scope() {
        let validated = validate_create_cluster(&create_request(CONTRACT, CSP, "demo"), false).unwrap();
        assert_eq!(
            validated.scope,
            TenantScope::Explicit {
                contract_id: ContractId::from_string(CONTRACT).unwrap(),
                csp_id: CspId::from_string(CSP).unwrap(),
            }
        );
    }

    #[test]
    fn test_create_cluster_rejections() {
        assert_eq!(
            validate_create_cluster(&create_request("THIS_IS_NOT_UUID", CSP, "demo"), false),
            Err(ValidationError::InvalidContractId("THIS_IS_NOT_UUID".to_string()))
        );
        assert_eq!(
            validate_create_cluster(&create_request(CONTRACT, "THIS_IS_NOT_UUID", "demo"), false),
            Err(ValidationError::InvalidCspId("THIS_IS_NOT_UUID".to_string()))
        );
        assert_eq!(
            validate_create_cluster(&create_request(CONTRACT, "", "demo"), false),
            Err(ValidationError::InvalidCspId(String::new()))
        );
        assert_eq!(
            validate_create_cluster(&create_request(CONTRACT, CSP, ""), false),
            Err(ValidationError::MissingName)
        );
    }

    #[test]
    fn test_create_cluster_strict_scope() {
        assert_eq!(
            validate_create_cluster(&create_request("", "", "demo"), true),
            Err(ValidationError::MissingTenantScope)
        );
        assert!(validate_create_cluster(&create_request(CONTRACT, CSP, "demo"), true).is_ok());
    }

    #[test]
    fn test_delete_cluster() {
        let request = DeleteClusterRequest { cluster_id: CLUSTER.to_string() };
        assert_eq!(validate_delete_cluster(&request).unwrap().to_string(), CLUSTER);

        let request = DeleteClusterRequest { cluster_id: "cluster-1".to_string() };
        assert_eq!(
            validate_delete_cluster(&request),
            Err(ValidationError::InvalidClusterId("cluster-1".to_string()))
        );
    }

    #[test]
    fn test_install_is_all_or_nothing() {
        let valid = InstallAppGroupsRequest {
            app_groups: vec![install_entry(CLUSTER, "lma", "prod"), install_entry(CLUSTER, "mesh", "prod")],
        };
        assert_eq!(validate_install_app_groups(&valid).unwrap().len(), 2);

        let request = InstallAppGroupsRequest {
            app_groups: vec![install_entry(CLUSTER, "lma", "prod"), install_entry("bad", "lma", "prod")],
        };
        assert_eq!(
            validate_install_app_groups(&request),
            Err(ValidationError::InvalidClusterId("bad".to_string()))
        );

        let request = InstallAppGroupsRequest {
            app_groups: vec![install_entry(CLUSTER, "", "prod")],
        };
        assert_eq!(validate_install_app_groups(&request), Err(ValidationError::MissingName));

        let request = InstallAppGroupsRequest {
            app_groups: vec![install_entry(CLUSTER, "lma", "")],
        };
        assert_eq!(validate_install_app_groups(&request), Err(ValidationError::MissingExternalLabel));
    }

    #[test]
    fn test_uninstall_is_all_or_nothing() {
        let request = UninstallAppGroupsRequest {
            app_group_ids: vec![CLUSTER.to_string()],
        };
        assert_eq!(validate_uninstall_app_groups(&request).unwrap().len(), 1);

        let request = UninstallAppGroupsRequest {
            app_group_ids: vec![CLUSTER.to_string(), "nope".to_string()],
        };
        assert_eq!(
            validate_uninstall_app_groups(&request),
            Err(ValidationError::InvalidAppGroupId("nope".to_string()))
        );
    }
}
