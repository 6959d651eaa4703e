// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `serve` command: wire upstream clients into the lifecycle services and run
//! the gRPC server until Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use clap::Args;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use cluster_lcm_core::application::{
    LifecycleDependencies, LifecycleSettings, StandardAppGroupLifecycleService,
    StandardClusterLifecycleService,
};
use cluster_lcm_core::domain::contract::{Contract, CspInfo};
use cluster_lcm_core::domain::identifiers::{ContractId, CspId};
use cluster_lcm_core::domain::lcm_config::LcmConfigManifest;
use cluster_lcm_core::infrastructure::info_client::lazy_channel;
use cluster_lcm_core::infrastructure::repositories::{
    InMemoryAppGroupRepository, InMemoryClusterRepository, InMemoryContractRepository,
    InMemoryCspInfoRepository,
};
use cluster_lcm_core::infrastructure::{
    ArgoWorkflowClient, GrpcAppGroupRepository, GrpcClusterRepository, GrpcContractRepository,
    GrpcCspInfoRepository,
};
use cluster_lcm_core::presentation::grpc::{start_grpc_server, ClusterLcmGrpcService};

use super::overrides::{load_config, ConfigOverrides};

#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Keep contract, CSP, cluster and app-group records in process memory
    /// instead of calling tks-contract and tks-info
    #[arg(long)]
    pub in_memory: bool,
}

pub async fn run(args: ServeArgs, config_path: Option<PathBuf>, overrides: &ConfigOverrides) -> Result<()> {
    let config = load_config(config_path, overrides)?;
    config.validate().context("Configuration validation failed")?;

    let settings = Arc::new(LifecycleSettings::from_config(&config)?);
    let deps = if args.in_memory {
        in_memory_dependencies(&config).await?
    } else {
        upstream_dependencies(&config)?
    };

    let clusters = Arc::new(StandardClusterLifecycleService::new(deps.clone(), settings.clone()));
    let app_groups = Arc::new(StandardAppGroupLifecycleService::new(deps, settings));
    let service = ClusterLcmGrpcService::new(clusters, app_groups);

    let server = &config.spec.server;
    let addr: SocketAddr = format!("{}:{}", server.bind_address, server.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", server.bind_address, server.port))?;

    start_grpc_server(addr, service, shutdown_signal())
        .await
        .context("gRPC server failed")?;

    info!("cluster-lcm stopped");
    Ok(())
}

fn workflow_engine(config: &LcmConfigManifest) -> Result<Arc<ArgoWorkflowClient>> {
    let client = ArgoWorkflowClient::from_endpoint(
        &config.spec.upstreams.workflow_engine,
        config.spec.upstreams.timeout,
    )
    .context("Failed to build workflow engine client")?;
    info!("Workflow engine at {}", client.base_url());
    Ok(Arc::new(client))
}

fn upstream_dependencies(config: &LcmConfigManifest) -> Result<LifecycleDependencies> {
    let upstreams = &config.spec.upstreams;

    let contract_channel = lazy_channel(&upstreams.contract.uri(), upstreams.timeout)
        .context("Invalid tks-contract endpoint")?;
    let info_channel =
        lazy_channel(&upstreams.info.uri(), upstreams.timeout).context("Invalid tks-info endpoint")?;

    info!(
        contract = %upstreams.contract.uri(),
        info = %upstreams.info.uri(),
        "Using record-of-truth services"
    );

    Ok(LifecycleDependencies {
        contracts: Arc::new(GrpcContractRepository::new(contract_channel)),
        csp_infos: Arc::new(GrpcCspInfoRepository::new(info_channel.clone())),
        clusters: Arc::new(GrpcClusterRepository::new(info_channel.clone())),
        app_groups: Arc::new(GrpcAppGroupRepository::new(info_channel)),
        workflow_engine: workflow_engine(config)?,
    })
}

/// In-memory records seeded with a default contract owning one CSP account,
/// enough to exercise CreateCluster without tenant-scope ids.
async fn in_memory_dependencies(config: &LcmConfigManifest) -> Result<LifecycleDependencies> {
    warn!("Running with in-memory records; nothing is persisted");

    let contracts = InMemoryContractRepository::new();
    let csp_infos = InMemoryCspInfoRepository::new();

    let contract_id = ContractId::new();
    let csp_id = CspId::new();
    contracts
        .insert_default(Contract {
            id: contract_id,
            contractor_name: "local".to_string(),
        })
        .await;
    csp_infos
        .insert(CspInfo {
            id: csp_id,
            contract_id,
            name: "local-aws".to_string(),
        })
        .await;
    info!(contract_id = %contract_id, csp_id = %csp_id, "Seeded default contract");

    Ok(LifecycleDependencies {
        contracts: Arc::new(contracts),
        csp_infos: Arc::new(csp_infos),
        clusters: Arc::new(InMemoryClusterRepository::new()),
        app_groups: Arc::new(InMemoryAppGroupRepository::new()),
        workflow_engine: workflow_engine(config)?,
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
