// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Cluster lifecycle orchestration core.
//!
//! Validates lifecycle requests against the record-of-truth services, derives
//! cluster configuration, and dispatches provisioning work as workflow-template
//! submissions.
//!
//! # Architecture
//!
//! - **domain:** records, validation and derivation rules, ports
//! - **application:** lifecycle use cases
//! - **infrastructure:** workflow engine and record-of-truth adapters
//! - **presentation:** gRPC service

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
