// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Workflow Submission Model
//!
//! Lifecycle operations never run provisioning steps themselves; they submit
//! instances of named workflow templates to the external workflow engine. This
//! module defines:
//!
//! - [`WorkflowParameters`]: typed `name=value` parameter builder, so template
//!   parameter contracts cannot drift through key typos
//! - [`WorkflowCatalog`]: one constructor per template kind with its exact
//!   parameter set
//! - [`WorkflowEngine`]: the port implemented by the workflow engine adapter

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::app_group::AppGroupType;
use crate::domain::identifiers::{AppGroupId, ClusterId, ContractId};

// ============================================================================
// Parameters
// ============================================================================

/// Parameter names understood by the workflow templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKey {
    ContractId,
    ClusterId,
    SiteName,
    TemplateName,
    /// Cluster templates name the git account `git_account`
    GitAccount,
    /// App group templates name the git account `github_account`
    GithubAccount,
    ManifestRepoUrl,
    Revision,
    AppGroupId,
    TksInfoHost,
    AppGroup,
    LoggingComponent,
}

impl ParameterKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterKey::ContractId => "contract_id",
            ParameterKey::ClusterId => "cluster_id",
            ParameterKey::SiteName => "site_name",
            ParameterKey::TemplateName => "template_name",
            ParameterKey::GitAccount => "git_account",
            ParameterKey::GithubAccount => "github_account",
            ParameterKey::ManifestRepoUrl => "manifest_repo_url",
            ParameterKey::Revision => "revision",
            ParameterKey::AppGroupId => "app_group_id",
            ParameterKey::TksInfoHost => "tks_info_host",
            ParameterKey::AppGroup => "app_group",
            ParameterKey::LoggingComponent => "logging_component",
        }
    }
}

impl std::fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered parameter list for one workflow submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowParameters {
    entries: Vec<(ParameterKey, String)>,
}

impl WorkflowParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: ParameterKey, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: ParameterKey, value: impl Into<String>) {
        self.entries.push((key, value.into()));
    }

    pub fn get(&self, key: ParameterKey) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> Vec<ParameterKey> {
        self.entries.iter().map(|(k, _)| *k).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `name=value` strings, in insertion order
    pub fn to_wire(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(key, value)| format!("{}={}", key.as_str(), value))
            .collect()
    }
}

/// A workflow template instance to be created in `namespace`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSubmission {
    pub template: String,
    pub namespace: String,
    pub parameters: WorkflowParameters,
}

// ============================================================================
// Template Catalog
// ============================================================================

/// Logging stack deployed by the LMA federation template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingComponent {
    Loki,
    Efk,
}

impl LoggingComponent {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoggingComponent::Loki => "loki",
            LoggingComponent::Efk => "efk",
        }
    }
}

pub const CREATE_CLUSTER_TEMPLATE: &str = "create-tks-usercluster";
pub const REMOVE_CLUSTER_TEMPLATE: &str = "tks-remove-usercluster";
pub const LMA_FEDERATION_TEMPLATE: &str = "tks-lma-federation";
pub const SERVICE_MESH_TEMPLATE: &str = "tks-service-mesh";
pub const REMOVE_LMA_FEDERATION_TEMPLATE: &str = "tks-remove-lma-federation";
pub const REMOVE_SERVICE_MESH_TEMPLATE: &str = "tks-remove-servicemesh";

/// Deployment-specific values woven into every submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowCatalog {
    pub namespace: String,
    pub git_account: String,
    pub git_base_url: String,
    pub revision: String,
    /// Record-of-truth service host handed to workflows for status callbacks
    pub info_host: String,
    /// Cluster manifest template name (`template_name` parameter)
    pub cluster_template_name: String,
    /// `app_group` literal for cluster removal
    pub cluster_app_group: String,
    /// Extra templates submitted after an LMA install, in order
    pub lma_auxiliary_templates: Vec<String>,
}

impl WorkflowCatalog {
    pub fn manifest_repo_url(&self, cluster_id: ClusterId) -> String {
        format!(
            "{}/{}/{}-manifests",
            self.git_base_url.trim_end_matches('/'),
            self.git_account,
            cluster_id
        )
    }

    fn submission(&self, template: &str, parameters: WorkflowParameters) -> WorkflowSubmission {
        WorkflowSubmission {
            template: template.to_string(),
            namespace: self.namespace.clone(),
            parameters,
        }
    }

    pub fn create_cluster(&self, contract_id: ContractId, cluster_id: ClusterId) -> WorkflowSubmission {
        let parameters = WorkflowParameters::new()
            .with(ParameterKey::ContractId, contract_id.to_string())
            .with(ParameterKey::ClusterId, cluster_id.to_string())
            .with(ParameterKey::SiteName, cluster_id.to_string())
            .with(ParameterKey::TemplateName, self.cluster_template_name.clone())
            .with(ParameterKey::GitAccount, self.git_account.clone())
            .with(ParameterKey::ManifestRepoUrl, self.manifest_repo_url(cluster_id))
            .with(ParameterKey::Revision, self.revision.clone());

        self.submission(CREATE_CLUSTER_TEMPLATE, parameters)
    }

    pub fn remove_cluster(&self, cluster_id: ClusterId) -> WorkflowSubmission {
        let parameters = WorkflowParameters::new()
            .with(ParameterKey::AppGroup, self.cluster_app_group.clone())
            .with(ParameterKey::TksInfoHost, self.info_host.clone())
            .with(ParameterKey::ClusterId, cluster_id.to_string());

        self.submission(REMOVE_CLUSTER_TEMPLATE, parameters)
    }

    fn app_group_parameters(&self, cluster_id: ClusterId, app_group_id: AppGroupId) -> WorkflowParameters {
        WorkflowParameters::new()
            .with(ParameterKey::SiteName, cluster_id.to_string())
            .with(ParameterKey::ClusterId, cluster_id.to_string())
            .with(ParameterKey::GithubAccount, self.git_account.clone())
            .with(ParameterKey::ManifestRepoUrl, self.manifest_repo_url(cluster_id))
            .with(ParameterKey::Revision, self.revision.clone())
            .with(ParameterKey::AppGroupId, app_group_id.to_string())
            .with(ParameterKey::TksInfoHost, self.info_host.clone())
    }

    /// Installation workflow for an app group, `None` for an unknown type
    pub fn install_app_group(
        &self,
        cluster_id: ClusterId,
        app_group_id: AppGroupId,
        group_type: AppGroupType,
    ) -> Option<WorkflowSubmission> {
        let mut parameters = self.app_group_parameters(cluster_id, app_group_id);

        let template = match group_type {
            AppGroupType::Lma => {
                parameters.push(ParameterKey::LoggingComponent, LoggingComponent::Loki.as_str());
                LMA_FEDERATION_TEMPLATE
            }
            AppGroupType::LmaEfk => {
                parameters.push(ParameterKey::LoggingComponent, LoggingComponent::Efk.as_str());
                LMA_FEDERATION_TEMPLATE
            }
            AppGroupType::ServiceMesh => SERVICE_MESH_TEMPLATE,
            AppGroupType::Unspecified => return None,
        };

        Some(self.submission(template, parameters))
    }

    /// Auxiliary templates following an LMA install; empty for other types
    pub fn lma_auxiliary(
        &self,
        cluster_id: ClusterId,
        app_group_id: AppGroupId,
        group_type: AppGroupType,
    ) -> Vec<WorkflowSubmission> {
        if group_type != AppGroupType::Lma {
            return Vec::new();
        }

        self.lma_auxiliary_templates
            .iter()
            .map(|template| self.submission(template, self.app_group_parameters(cluster_id, app_group_id)))
            .collect()
    }

    /// Removal workflow for an app group, `None` for an unknown type
    pub fn uninstall_app_group(
        &self,
        cluster_id: ClusterId,
        app_group_id: AppGroupId,
        group_type: AppGroupType,
    ) -> Option<WorkflowSubmission> {
        let (template, component) = match group_type {
            AppGroupType::Lma | AppGroupType::LmaEfk => (REMOVE_LMA_FEDERATION_TEMPLATE, "lma"),
            AppGroupType::ServiceMesh => (REMOVE_SERVICE_MESH_TEMPLATE, "service-mesh"),
            AppGroupType::Unspecified => return None,
        };

        let parameters = WorkflowParameters::new()
            .with(ParameterKey::AppGroup, component)
            .with(ParameterKey::GithubAccount, self.git_account.clone())
            .with(ParameterKey::TksInfoHost, self.info_host.clone())
            .with(ParameterKey::ClusterId, cluster_id.to_string())
            .with(ParameterKey::AppGroupId, app_group_id.to_string());

        Some(self.submission(template, parameters))
    }
}

// ============================================================================
// Workflow Engine Port
// ============================================================================

/// Phase reported by the workflow engine for a workflow instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    Error,
    Unknown(String),
}

impl WorkflowPhase {
    pub fn parse(phase: &str) -> Self {
        match phase {
            "Pending" => WorkflowPhase::Pending,
            "Running" => WorkflowPhase::Running,
            "Succeeded" => WorkflowPhase::Succeeded,
            "Failed" => WorkflowPhase::Failed,
            "Error" => WorkflowPhase::Error,
            other => WorkflowPhase::Unknown(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSummary {
    pub name: String,
    pub namespace: String,
    pub phase: WorkflowPhase,
    /// Declared `(name, value)` arguments
    pub parameters: Vec<(String, String)>,
}

impl WorkflowSummary {
    pub fn has_parameter(&self, key: ParameterKey, value: &str) -> bool {
        self.parameters
            .iter()
            .any(|(name, v)| name == key.as_str() && v == value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowTemplateSummary {
    pub name: String,
    pub namespace: String,
    pub parameters: Vec<(String, String)>,
}

#[derive(Debug, Error)]
pub enum WorkflowEngineError {
    #[error("workflow engine request failed: {0}")]
    Transport(String),

    #[error("workflow engine returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode workflow engine response: {0}")]
    Decode(String),

    #[error("invalid workflow engine configuration: {0}")]
    Configuration(String),
}

/// Port to the external workflow engine
#[async_trait]
pub trait WorkflowEngine: Send + Sync {
    /// Submit a template instance; returns the generated workflow name, used as
    /// the correlation token for status updates
    async fn submit(&self, submission: &WorkflowSubmission) -> Result<String, WorkflowEngineError>;

    async fn list_workflows(&self, namespace: &str) -> Result<Vec<WorkflowSummary>, WorkflowEngineError>;

    async fn list_workflow_templates(&self, namespace: &str) -> Result<Vec<WorkflowTemplateSummary>, WorkflowEngineError>;
}
