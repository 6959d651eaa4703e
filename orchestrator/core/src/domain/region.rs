// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Region → maximum availability-zone table.
//!
//! Loaded once at startup, either from the `regions` section of the service
//! configuration or from a flat `region: max_az` file, and validated for
//! completeness before any request is served.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegionTableError {
    #[error("region table is empty")]
    Empty,

    #[error("region '{0}' must allow at least one availability zone")]
    NoZones(String),

    #[error("default region '{0}' is not registered in the region table")]
    MissingDefaultRegion(String),

    #[error("default az count {az_count} exceeds the maximum {max_az} of region '{region}'")]
    DefaultAzCountTooLarge {
        region: String,
        az_count: u32,
        max_az: u32,
    },

    #[error("invalid region table entry at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("failed to read region table: {0}")]
    Io(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionTable {
    regions: BTreeMap<String, u32>,
}

impl RegionTable {
    pub fn new(regions: BTreeMap<String, u32>) -> Self {
        Self { regions }
    }

    /// AZ counts for the AWS regions the platform provisions into.
    pub fn builtin() -> Self {
        let regions = [
            ("ap-northeast-1", 3),
            ("ap-northeast-2", 3),
            ("ap-northeast-3", 3),
            ("ap-southeast-1", 3),
            ("eu-central-1", 3),
            ("us-east-1", 6),
            ("us-east-2", 3),
            ("us-west-1", 2),
            ("us-west-2", 4),
        ]
        .into_iter()
        .map(|(region, max_az)| (region.to_string(), max_az))
        .collect();

        Self { regions }
    }

    /// Parse the flat `region: max_az` format, one entry per line.
    /// Blank lines and `#` comments are ignored.
    pub fn from_flat_str(content: &str) -> Result<Self, RegionTableError> {
        let mut regions = BTreeMap::new();

        for (index, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (region, max_az) = line.split_once(':').ok_or_else(|| RegionTableError::Parse {
                line: index + 1,
                reason: format!("expected 'region: max_az', got '{}'", line),
            })?;

            let region = region.trim();
            if region.is_empty() {
                return Err(RegionTableError::Parse {
                    line: index + 1,
                    reason: "region name is empty".to_string(),
                });
            }

            let max_az = max_az.trim().parse::<u32>().map_err(|e| RegionTableError::Parse {
                line: index + 1,
                reason: format!("invalid az count '{}': {}", max_az.trim(), e),
            })?;

            regions.insert(region.to_string(), max_az);
        }

        Ok(Self { regions })
    }

    pub fn from_flat_file(path: impl AsRef<Path>) -> Result<Self, RegionTableError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| RegionTableError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_flat_str(&content)
    }

    /// Maximum AZ count for `region`, `None` when the region is not registered.
    pub fn max_az(&self, region: &str) -> Option<u32> {
        self.regions.get(region).copied()
    }

    pub fn regions(&self) -> impl Iterator<Item = (&str, u32)> {
        self.regions.iter().map(|(region, max_az)| (region.as_str(), *max_az))
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Startup completeness check: every entry usable, and the default
    /// region/az count derivable without user input.
    pub fn validate(&self, default_region: &str, default_az_count: u32) -> Result<(), RegionTableError> {
        if self.regions.is_empty() {
            return Err(RegionTableError::Empty);
        }

        if let Some((region, _)) = self.regions.iter().find(|(_, max_az)| **max_az == 0) {
            return Err(RegionTableError::NoZones(region.clone()));
        }

        let max_az = self
            .max_az(default_region)
            .ok_or_else(|| RegionTableError::MissingDefaultRegion(default_region.to_string()))?;

        if default_az_count > max_az {
            return Err(RegionTableError::DefaultAzCountTooLarge {
                region: default_region.to_string(),
                az_count: default_az_count,
                max_az,
            });
        }

        Ok(())
    }
}

impl Default for RegionTable {
    fn default() -> Self {
        Self::builtin()
    }
}
