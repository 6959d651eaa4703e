// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod argo_client;
pub mod argo_types;
pub mod info_client;
pub mod repositories;
pub mod tks_proto;

pub use argo_client::ArgoWorkflowClient;
pub use info_client::{GrpcAppGroupRepository, GrpcClusterRepository, GrpcContractRepository, GrpcCspInfoRepository};
