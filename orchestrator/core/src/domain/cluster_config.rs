// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Cluster Configuration Derivation
//!
//! Turns the sparse [`ClusterRawConfig`] supplied with a CreateCluster request into
//! a concrete [`ClusterConfig`]. Derivation is pure: the only input besides the
//! request is the region table loaded at startup.
//!
//! # Rules
//!
//! 1. Zero-valued fields take the configured defaults.
//! 2. The AZ count may not exceed the region's registered maximum.
//! 3. Without a replica count the per-AZ node group is `1..=5`.
//! 4. Otherwise replicas must split evenly across AZs; `min = replicas / azs`,
//!    `max = min * 5`, clamped to [`MAX_SIZE_PER_AZ`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::cluster::{ClusterConfig, ClusterRawConfig};
use crate::domain::region::RegionTable;

/// Hard ceiling for the per-AZ node group size
pub const MAX_SIZE_PER_AZ: u32 = 99;

/// Headroom factor between the minimum and maximum per-AZ node count
pub const MAX_SIZE_MULTIPLIER: u32 = 5;

pub const DEFAULT_MIN_SIZE_PER_AZ: u32 = 1;
pub const DEFAULT_MAX_SIZE_PER_AZ: u32 = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidConfiguration {
    #[error("Invalid numOfAz: region {region} is not registered in the region table")]
    UnknownRegion { region: String },

    #[error("Invalid numOfAz: {requested} exceeded the number of Az ({max_az}) in region {region}")]
    TooManyZones {
        region: String,
        requested: u32,
        max_az: u32,
    },

    #[error("Invalid numOfAz: at least one availability zone is required")]
    NoZones,

    #[error("Invalid machineReplicas: {replicas} should be a multiple of numOfAz {az_count}")]
    UnevenReplicas { replicas: u32, az_count: u32 },
}

/// Values applied to zero-valued raw configuration fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterDefaults {
    #[serde(default = "default_region")]
    pub region: String,

    #[serde(default = "default_az_count")]
    pub az_count: u32,

    #[serde(default = "default_ssh_key_name")]
    pub ssh_key_name: String,

    #[serde(default = "default_machine_type")]
    pub machine_type: String,
}

impl Default for ClusterDefaults {
    fn default() -> Self {
        Self {
            region: default_region(),
            az_count: default_az_count(),
            ssh_key_name: default_ssh_key_name(),
            machine_type: default_machine_type(),
        }
    }
}

fn default_region() -> String {
    "ap-northeast-2".to_string()
}

fn default_az_count() -> u32 {
    3
}

fn default_ssh_key_name() -> String {
    "tks-seoul".to_string()
}

fn default_machine_type() -> String {
    "t3.large".to_string()
}

fn or_default(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

/// Derive the concrete cluster configuration.
///
/// A missing raw configuration behaves like one with every field zero-valued.
pub fn derive_cluster_config(
    raw: Option<&ClusterRawConfig>,
    defaults: &ClusterDefaults,
    regions: &RegionTable,
) -> Result<ClusterConfig, InvalidConfiguration> {
    let empty = ClusterRawConfig::default();
    let raw = raw.unwrap_or(&empty);

    let region = or_default(&raw.region, &defaults.region);
    let az_count = if raw.az_count == 0 { defaults.az_count } else { raw.az_count };
    let ssh_key_name = or_default(&raw.ssh_key_name, &defaults.ssh_key_name);
    let machine_type = or_default(&raw.machine_type, &defaults.machine_type);

    if az_count == 0 {
        return Err(InvalidConfiguration::NoZones);
    }

    let max_az = regions
        .max_az(&region)
        .ok_or_else(|| InvalidConfiguration::UnknownRegion { region: region.clone() })?;

    if az_count > max_az {
        return Err(InvalidConfiguration::TooManyZones {
            region,
            requested: az_count,
            max_az,
        });
    }

    let replicas = raw.machine_replicas;
    let (min_size_per_az, max_size_per_az) = if replicas == 0 {
        tracing::debug!("No machine replicas requested, using default node group sizes");
        (DEFAULT_MIN_SIZE_PER_AZ, DEFAULT_MAX_SIZE_PER_AZ)
    } else {
        if replicas % az_count != 0 {
            return Err(InvalidConfiguration::UnevenReplicas { replicas, az_count });
        }

        let min = replicas / az_count;
        let max = min.saturating_mul(MAX_SIZE_MULTIPLIER);
        if max > MAX_SIZE_PER_AZ {
            tracing::debug!(
                "maxSizePerAz {} exceeded the ceiling, clamped to {}",
                max,
                MAX_SIZE_PER_AZ
            );
        }
        (min, max.min(MAX_SIZE_PER_AZ))
    };

    Ok(ClusterConfig {
        region,
        az_count,
        ssh_key_name,
        machine_type,
        machine_replicas: replicas,
        min_size_per_az,
        max_size_per_az,
    })
}
