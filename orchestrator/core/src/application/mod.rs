// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod app_group_lifecycle;
pub mod cluster_lifecycle;
pub mod dedup_guard;
pub mod dependencies;
pub mod status_updater;

// Re-export use cases for convenience
pub use app_group_lifecycle::{AppGroupLifecycleService, BatchOutcome, StandardAppGroupLifecycleService};
pub use cluster_lifecycle::{ClusterLifecycleService, StandardClusterLifecycleService};
pub use dependencies::{LifecycleDependencies, LifecycleSettings};
