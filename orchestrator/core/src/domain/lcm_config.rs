// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Service Configuration Types
//
// Defines the configuration schema for the cluster lifecycle service:
// - Kubernetes-style manifest format (apiVersion/kind/metadata/spec)
// - Listen port and upstream endpoints (contract, info, workflow engine)
// - Git settings used to build manifest repository URLs
// - Workflow template settings and batch policies
// - Cluster defaults and the region → max AZ table

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::cluster_config::ClusterDefaults;
use crate::domain::region::RegionTable;
use crate::domain::workflow::WorkflowCatalog;

pub const API_VERSION: &str = "tks.openinfradev.github.io/v1";
pub const KIND: &str = "ClusterLcmConfig";
pub const CONFIG_PATH_ENV: &str = "CLUSTER_LCM_CONFIG_PATH";
pub const GIT_TOKEN_ENV: &str = "TOKEN";
pub const WORKFLOW_ENGINE_TOKEN_ENV: &str = "ARGO_TOKEN";

/// Top-level Kubernetes-style service configuration manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LcmConfigManifest {
    /// API version (must be "tks.openinfradev.github.io/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "ClusterLcmConfig")
    pub kind: String,

    pub metadata: ManifestMetadata,

    pub spec: LcmConfigSpec,
}

/// Manifest metadata (Kubernetes-style)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

/// Configuration specification (content under spec:)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LcmConfigSpec {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub upstreams: UpstreamsConfig,

    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub workflow: WorkflowSettings,

    #[serde(default)]
    pub cluster_defaults: ClusterDefaults,

    /// Region → maximum AZ count. The built-in table applies when absent.
    #[serde(default)]
    pub regions: RegionTable,

    /// Flat `region: max_az` file replacing `regions` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regions_file: Option<PathBuf>,

    #[serde(default)]
    pub policy: PolicyConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

/// Host and port of a plaintext gRPC upstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamEndpoint {
    pub address: String,
    pub port: u16,
}

impl UpstreamEndpoint {
    pub fn uri(&self) -> String {
        format!("http://{}:{}", self.address, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowEngineEndpoint {
    pub address: String,
    pub port: u16,

    /// Use https; requires `token`
    #[serde(default)]
    pub ssl: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamsConfig {
    #[serde(default = "default_contract_endpoint")]
    pub contract: UpstreamEndpoint,

    #[serde(default = "default_info_endpoint")]
    pub info: UpstreamEndpoint,

    #[serde(default = "default_workflow_engine_endpoint")]
    pub workflow_engine: WorkflowEngineEndpoint,

    /// Client-side timeout for every upstream call
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for UpstreamsConfig {
    fn default() -> Self {
        Self {
            contract: default_contract_endpoint(),
            info: default_info_endpoint(),
            workflow_engine: default_workflow_engine_endpoint(),
            timeout: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitConfig {
    /// Account owning the manifest repositories (`--repo-name`)
    #[serde(default = "default_git_account")]
    pub account: String,

    #[serde(default = "default_revision")]
    pub revision: String,

    #[serde(default = "default_git_base_url")]
    pub base_url: String,

    /// Usually supplied through the `TOKEN` environment variable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            account: default_git_account(),
            revision: default_revision(),
            base_url: default_git_base_url(),
            token: None,
        }
    }
}

/// What happens to an InstallAppGroups call when an LMA auxiliary workflow fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AuxiliaryFailurePolicy {
    /// Drop the entry from the result and continue with the batch
    #[default]
    SkipEntry,
    /// Stop the batch and return the error with the ids queued so far
    AbortBatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowSettings {
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Record-of-truth host handed to workflows
    #[serde(default = "default_info_host")]
    pub info_host: String,

    #[serde(default = "default_cluster_template_name")]
    pub cluster_template_name: String,

    #[serde(default = "default_cluster_app_group")]
    pub cluster_app_group: String,

    #[serde(default)]
    pub lma_auxiliary_templates: Vec<String>,

    #[serde(default)]
    pub auxiliary_failure_policy: AuxiliaryFailurePolicy,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            info_host: default_info_host(),
            cluster_template_name: default_cluster_template_name(),
            cluster_app_group: default_cluster_app_group(),
            lma_auxiliary_templates: Vec::new(),
            auxiliary_failure_policy: AuxiliaryFailurePolicy::default(),
        }
    }
}

/// Result of a CreateCluster call that collides with a running creation workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CreateClusterDedupPolicy {
    /// Skip the running-workflow check
    Disabled,
    #[default]
    AlreadyExists,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PolicyConfig {
    #[serde(default)]
    pub create_cluster_dedup: CreateClusterDedupPolicy,

    /// Reject CreateCluster requests without contract and CSP ids
    #[serde(default)]
    pub require_tenant_scope: bool,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9112
}

fn default_contract_endpoint() -> UpstreamEndpoint {
    UpstreamEndpoint {
        address: "localhost".to_string(),
        port: 9110,
    }
}

fn default_info_endpoint() -> UpstreamEndpoint {
    UpstreamEndpoint {
        address: "localhost".to_string(),
        port: 9111,
    }
}

fn default_workflow_engine_endpoint() -> WorkflowEngineEndpoint {
    WorkflowEngineEndpoint {
        address: "192.168.70.10".to_string(),
        port: 2746,
        ssl: false,
        token: None,
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_git_account() -> String {
    "tks-management".to_string()
}

fn default_revision() -> String {
    "main".to_string()
}

fn default_git_base_url() -> String {
    "https://github.com".to_string()
}

fn default_namespace() -> String {
    "argo".to_string()
}

fn default_info_host() -> String {
    "tks-info.tks.svc".to_string()
}

fn default_cluster_template_name() -> String {
    "template-std".to_string()
}

fn default_cluster_app_group() -> String {
    "tks-cluster-aws".to_string()
}

impl Default for LcmConfigManifest {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: "tks-cluster-lcm".to_string(),
                version: Some("1.0.0".to_string()),
                labels: None,
            },
            spec: LcmConfigSpec::default(),
        }
    }
}

impl LcmConfigManifest {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Serialize with secrets masked
    pub fn to_redacted_yaml(&self) -> anyhow::Result<String> {
        let mut redacted = self.clone();
        if redacted.spec.git.token.is_some() {
            redacted.spec.git.token = Some("********".to_string());
        }
        if redacted.spec.upstreams.workflow_engine.token.is_some() {
            redacted.spec.upstreams.workflow_engine.token = Some("********".to_string());
        }
        Ok(serde_yaml::to_string(&redacted)?)
    }

    /// Discover configuration file using precedence order
    /// 1. CLUSTER_LCM_CONFIG_PATH environment variable
    /// 2. ./cluster-lcm.yaml (working directory)
    /// 3. /etc/cluster-lcm/config.yaml
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./cluster-lcm.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        let system_config = PathBuf::from("/etc/cluster-lcm/config.yaml");
        if system_config.exists() {
            return Some(system_config);
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit CLI path fails if missing or invalid
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path)
                .map_err(|e| anyhow::anyhow!("Failed to load config at {:?}: {}", path, e))?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::warn!("No configuration file found in standard locations. Using defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var(GIT_TOKEN_ENV) {
            if !token.is_empty() {
                tracing::info!("Environment override: {} set", GIT_TOKEN_ENV);
                self.spec.git.token = Some(token);
            }
        }

        if let Ok(token) = std::env::var(WORKFLOW_ENGINE_TOKEN_ENV) {
            if !token.is_empty() {
                tracing::info!("Environment override: {} set", WORKFLOW_ENGINE_TOKEN_ENV);
                self.spec.upstreams.workflow_engine.token = Some(token);
            }
        }
    }

    /// Region table from `regions_file` when set, otherwise the inline table
    pub fn region_table(&self) -> anyhow::Result<RegionTable> {
        match &self.spec.regions_file {
            Some(path) => RegionTable::from_flat_file(path)
                .map_err(|e| anyhow::anyhow!("Failed to load region table {:?}: {}", path, e)),
            None => Ok(self.spec.regions.clone()),
        }
    }

    pub fn workflow_catalog(&self) -> WorkflowCatalog {
        WorkflowCatalog {
            namespace: self.spec.workflow.namespace.clone(),
            git_account: self.spec.git.account.clone(),
            git_base_url: self.spec.git.base_url.clone(),
            revision: self.spec.git.revision.clone(),
            info_host: self.spec.workflow.info_host.clone(),
            cluster_template_name: self.spec.workflow.cluster_template_name.clone(),
            cluster_app_group: self.spec.workflow.cluster_app_group.clone(),
            lma_auxiliary_templates: self.spec.workflow.lma_auxiliary_templates.clone(),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            anyhow::bail!("Invalid apiVersion: '{}'. Must be '{}'", self.api_version, API_VERSION);
        }

        if self.kind != KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        let git = &self.spec.git;
        if git.account.is_empty() {
            anyhow::bail!("spec.git.account cannot be empty");
        }
        if git.revision.is_empty() {
            anyhow::bail!("spec.git.revision cannot be empty");
        }
        if git.token.as_deref().map_or(true, str::is_empty) {
            anyhow::bail!("spec.git.token is required (set the {} environment variable)", GIT_TOKEN_ENV);
        }
        url::Url::parse(&git.base_url)
            .map_err(|e| anyhow::anyhow!("spec.git.base_url '{}' is not a valid URL: {}", git.base_url, e))?;

        let engine = &self.spec.upstreams.workflow_engine;
        if engine.ssl && engine.token.as_deref().map_or(true, str::is_empty) {
            anyhow::bail!("spec.upstreams.workflow_engine.token is required when ssl is enabled");
        }
        if self.spec.upstreams.timeout.is_zero() {
            anyhow::bail!("spec.upstreams.timeout must be greater than zero");
        }

        let workflow = &self.spec.workflow;
        if workflow.namespace.is_empty() {
            anyhow::bail!("spec.workflow.namespace cannot be empty");
        }
        if workflow.lma_auxiliary_templates.iter().any(String::is_empty) {
            anyhow::bail!("spec.workflow.lma_auxiliary_templates cannot contain empty names");
        }

        let defaults = &self.spec.cluster_defaults;
        self.region_table()?
            .validate(&defaults.region, defaults.az_count)
            .map_err(|e| anyhow::anyhow!("Invalid region table: {}", e))?;

        Ok(())
    }
}
