// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! gRPC Server Implementation for the cluster lifecycle service
//! Exposes CreateCluster, ScaleCluster, DeleteCluster, InstallAppGroups, UninstallAppGroups
//!
//! Every RPC answers with a successful gRPC status; the outcome travels in the
//! response's result code and error message.

use std::future::Future;
use std::sync::Arc;
use tonic::{Request, Response, Status};

use crate::application::app_group_lifecycle::{AppGroupLifecycleService, BatchOutcome};
use crate::application::cluster_lifecycle::ClusterLifecycleService;
use crate::domain::errors::{LifecycleError, ResultCode};
use crate::domain::requests::{
    CreateClusterRequest, DeleteClusterRequest, InstallAppGroupsRequest, ScaleClusterRequest,
    UninstallAppGroupsRequest,
};
use crate::infrastructure::tks_proto::tks::v1 as pb;
use pb::cluster_lcm_service_server::{ClusterLcmService, ClusterLcmServiceServer};

/// Implementation of the ClusterLcmService gRPC service
pub struct ClusterLcmGrpcService {
    clusters: Arc<dyn ClusterLifecycleService>,
    app_groups: Arc<dyn AppGroupLifecycleService>,
}

impl ClusterLcmGrpcService {
    pub fn new(clusters: Arc<dyn ClusterLifecycleService>, app_groups: Arc<dyn AppGroupLifecycleService>) -> Self {
        Self { clusters, app_groups }
    }

    /// Create a gRPC server instance
    pub fn into_server(self) -> ClusterLcmServiceServer<Self> {
        ClusterLcmServiceServer::new(self)
    }
}

fn code(code: ResultCode) -> i32 {
    pb::Code::from(code) as i32
}

fn error(err: &LifecycleError) -> Option<pb::Error> {
    Some(pb::Error { msg: err.to_string() })
}

fn ids_response(result: Result<BatchOutcome, LifecycleError>) -> pb::IdsResponse {
    match result {
        Ok(BatchOutcome { ids, aborted: None }) => pb::IdsResponse {
            code: code(ResultCode::Ok),
            error: None,
            ids: ids.iter().map(ToString::to_string).collect(),
        },
        Ok(BatchOutcome { ids, aborted: Some(err) }) => pb::IdsResponse {
            code: code(err.code()),
            error: error(&err),
            ids: ids.iter().map(ToString::to_string).collect(),
        },
        Err(err) => pb::IdsResponse {
            code: code(err.code()),
            error: error(&err),
            ids: Vec::new(),
        },
    }
}

fn simple_response(result: Result<(), LifecycleError>) -> pb::SimpleResponse {
    match result {
        Ok(()) => pb::SimpleResponse {
            code: code(ResultCode::Ok),
            error: None,
        },
        Err(err) => pb::SimpleResponse {
            code: code(err.code()),
            error: error(&err),
        },
    }
}

#[tonic::async_trait]
impl ClusterLcmService for ClusterLcmGrpcService {
    async fn create_cluster(
        &self,
        request: Request<pb::CreateClusterRequest>,
    ) -> Result<Response<pb::IdResponse>, Status> {
        let req = CreateClusterRequest::from(request.into_inner());
        tracing::info!(contract_id = %req.contract_id, name = %req.name, "CreateCluster");

        let response = match self.clusters.create_cluster(req).await {
            Ok(cluster_id) => pb::IdResponse {
                code: code(ResultCode::Ok),
                error: None,
                id: cluster_id.to_string(),
            },
            Err(err) => {
                tracing::warn!(code = %err.code(), "CreateCluster failed: {}", err);
                pb::IdResponse {
                    code: code(err.code()),
                    error: error(&err),
                    id: String::new(),
                }
            }
        };

        Ok(Response::new(response))
    }

    async fn scale_cluster(
        &self,
        request: Request<pb::ScaleClusterRequest>,
    ) -> Result<Response<pb::SimpleResponse>, Status> {
        let req = request.into_inner();
        let req = ScaleClusterRequest {
            cluster_id: req.cluster_id,
            machine_replicas: u32::try_from(req.machine_replicas).unwrap_or(0),
        };

        Ok(Response::new(simple_response(self.clusters.scale_cluster(req).await)))
    }

    async fn delete_cluster(
        &self,
        request: Request<pb::IdRequest>,
    ) -> Result<Response<pb::SimpleResponse>, Status> {
        let req = DeleteClusterRequest {
            cluster_id: request.into_inner().id,
        };
        tracing::info!(cluster_id = %req.cluster_id, "DeleteCluster");

        let result = self.clusters.delete_cluster(req).await;
        if let Err(err) = &result {
            tracing::warn!(code = %err.code(), "DeleteCluster failed: {}", err);
        }

        Ok(Response::new(simple_response(result)))
    }

    async fn install_app_groups(
        &self,
        request: Request<pb::InstallAppGroupsRequest>,
    ) -> Result<Response<pb::IdsResponse>, Status> {
        let req = InstallAppGroupsRequest::from(request.into_inner());
        tracing::info!(entries = req.app_groups.len(), "InstallAppGroups");

        Ok(Response::new(ids_response(self.app_groups.install_app_groups(req).await)))
    }

    async fn uninstall_app_groups(
        &self,
        request: Request<pb::UninstallAppGroupsRequest>,
    ) -> Result<Response<pb::IdsResponse>, Status> {
        let req = UninstallAppGroupsRequest {
            app_group_ids: request.into_inner().app_group_ids,
        };
        tracing::info!(entries = req.app_group_ids.len(), "UninstallAppGroups");

        Ok(Response::new(ids_response(self.app_groups.uninstall_app_groups(req).await)))
    }
}

/// Serve the lifecycle service on `addr` until `shutdown` resolves
pub async fn start_grpc_server<F>(
    addr: std::net::SocketAddr,
    service: ClusterLcmGrpcService,
    shutdown: F,
) -> Result<(), tonic::transport::Error>
where
    F: Future<Output = ()> + Send,
{
    tracing::info!("Starting cluster lifecycle gRPC server on {}", addr);

    tonic::transport::Server::builder()
        .add_service(service.into_server())
        .serve_with_shutdown(addr, shutdown)
        .await?;

    tracing::info!("gRPC server stopped");
    Ok(())
}
