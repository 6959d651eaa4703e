// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the cluster-lcm CLI

pub mod config;
pub mod overrides;
pub mod serve;

pub use self::config::ConfigCommand;
pub use self::overrides::ConfigOverrides;
pub use self::serve::ServeArgs;
