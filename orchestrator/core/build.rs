// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Build Script for cluster-lcm-core
//!
//! Compiles the protobuf contract shared by the exposed `ClusterLcmService` and the
//! record-of-truth services this crate consumes (`ContractService`, `CspInfoService`,
//! `ClusterInfoService`, `AppInfoService`).
//!
//! Generated code is placed in `OUT_DIR` and included via `tonic::include_proto!`
//! in `src/infrastructure/tks_proto.rs`.
//!
//! # Dependencies
//!
//! - **protoc**: Protocol buffer compiler (vendored via `protoc-bin-vendored`)
//! - **tonic-prost-build**: Code generator for Rust gRPC stubs

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Point PROTOC at the vendored binary so builds do not need a system protoc
    std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);

    let protos = ["../../proto/tks_lcm.proto"];

    tonic_prost_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&protos, &["../../proto"])?;

    for proto in protos {
        println!("cargo:rerun-if-changed={}", proto);
    }

    Ok(())
}
