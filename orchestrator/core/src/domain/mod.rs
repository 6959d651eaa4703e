// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain Layer
//!
//! Records, request shapes, pure validation and derivation rules, and the
//! ports to the record-of-truth service and the workflow engine.

pub mod app_group;
pub mod cluster;
pub mod cluster_config;
pub mod contract;
pub mod errors;
pub mod identifiers;
pub mod lcm_config;
pub mod region;
pub mod repository;
pub mod requests;
pub mod validation;
pub mod workflow;
