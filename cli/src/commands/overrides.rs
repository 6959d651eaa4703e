// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command-line overrides for individual manifest values.
//!
//! Flag names follow the long-standing service flags so existing deployment
//! scripts keep working.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use cluster_lcm_core::domain::lcm_config::LcmConfigManifest;

#[derive(Args, Debug, Default, Clone)]
pub struct ConfigOverrides {
    /// Service port
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Service address for tks-contract
    #[arg(long, global = true)]
    pub contract_address: Option<String>,

    /// Service port for tks-contract
    #[arg(long, global = true)]
    pub contract_port: Option<u16>,

    /// Service address for tks-info
    #[arg(long, global = true)]
    pub info_address: Option<String>,

    /// Service port for tks-info
    #[arg(long, global = true)]
    pub info_port: Option<u16>,

    /// Server address for the Argo workflow server
    #[arg(long, global = true)]
    pub argo_address: Option<String>,

    /// Server port for the Argo workflow server
    #[arg(long, global = true)]
    pub argo_port: Option<u16>,

    /// Git revision passed to workflows
    #[arg(long, global = true)]
    pub revision: Option<String>,

    /// Git account holding the manifest repositories
    #[arg(long, global = true)]
    pub repo_name: Option<String>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut LcmConfigManifest) {
        let spec = &mut config.spec;

        if let Some(port) = self.port {
            spec.server.port = port;
        }
        if let Some(address) = &self.contract_address {
            spec.upstreams.contract.address = address.clone();
        }
        if let Some(port) = self.contract_port {
            spec.upstreams.contract.port = port;
        }
        if let Some(address) = &self.info_address {
            spec.upstreams.info.address = address.clone();
        }
        if let Some(port) = self.info_port {
            spec.upstreams.info.port = port;
        }
        if let Some(address) = &self.argo_address {
            spec.upstreams.workflow_engine.address = address.clone();
        }
        if let Some(port) = self.argo_port {
            spec.upstreams.workflow_engine.port = port;
        }
        if let Some(revision) = &self.revision {
            spec.git.revision = revision.clone();
        }
        if let Some(account) = &self.repo_name {
            spec.git.account = account.clone();
        }
    }
}

/// Load the manifest (explicit path or discovery) and apply flag overrides
pub fn load_config(path: Option<PathBuf>, overrides: &ConfigOverrides) -> Result<LcmConfigManifest> {
    let mut config = LcmConfigManifest::load_or_default(path).context("Failed to load configuration")?;
    overrides.apply(&mut config);
    info!(
        port = config.spec.server.port,
        contract = %config.spec.upstreams.contract.uri(),
        info = %config.spec.upstreams.info.uri(),
        workflow_engine = %format!(
            "{}:{}",
            config.spec.upstreams.workflow_engine.address, config.spec.upstreams.workflow_engine.port
        ),
        revision = %config.spec.git.revision,
        "Effective configuration"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        overrides: ConfigOverrides,
    }

    #[test]
    fn test_flags_override_manifest() {
        let cli = TestCli::try_parse_from([
            "cluster-lcm",
            "--port",
            "9200",
            "--contract-address",
            "tks-contract.tks.svc",
            "--info-port",
            "9300",
            "--argo-address",
            "argo-server.argo.svc",
            "--argo-port",
            "443",
            "--revision",
            "release-v2",
            "--repo-name",
            "tks-dev",
        ])
        .unwrap();

        let mut config = LcmConfigManifest::default();
        cli.overrides.apply(&mut config);

        assert_eq!(config.spec.server.port, 9200);
        assert_eq!(config.spec.upstreams.contract.uri(), "http://tks-contract.tks.svc:9110");
        assert_eq!(config.spec.upstreams.info.uri(), "http://localhost:9300");
        assert_eq!(config.spec.upstreams.workflow_engine.address, "argo-server.argo.svc");
        assert_eq!(config.spec.upstreams.workflow_engine.port, 443);
        assert_eq!(config.spec.git.revision, "release-v2");
        assert_eq!(config.spec.git.account, "tks-dev");
    }

    #[test]
    fn test_no_flags_keep_manifest_values() {
        let cli = TestCli::try_parse_from(["cluster-lcm"]).unwrap();
        let mut config = LcmConfigManifest::default();
        cli.overrides.apply(&mut config);

        let defaults = LcmConfigManifest::default();
        assert_eq!(config.spec.server.port, defaults.spec.server.port);
        assert_eq!(config.spec.git.account, defaults.spec.git.account);
        assert_eq!(config.spec.upstreams.info.uri(), defaults.spec.upstreams.info.uri());
    }

    #[test]
    fn test_load_config_applies_overrides_to_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
apiVersion: tks.openinfradev.github.io/v1
kind: ClusterLcmConfig
metadata:
  name: test
spec:
  server:
    port: 9500
  git:
    account: from-file
"#
        )
        .unwrap();

        let overrides = ConfigOverrides {
            repo_name: Some("from-flag".to_string()),
            ..Default::default()
        };
        let config = load_config(Some(file.path().to_path_buf()), &overrides).unwrap();

        assert_eq!(config.spec.server.port, 9500);
        assert_eq!(config.spec.git.account, "from-flag");
    }
}
