// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Presentation Layer (`cluster-lcm-core`)
//!
//! gRPC surface that translates external requests into application service
//! calls. No business logic lives here.

pub mod grpc;
