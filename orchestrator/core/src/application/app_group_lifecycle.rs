// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! App Group Lifecycle Use Cases
//!
//! InstallAppGroups and UninstallAppGroups are best-effort batches. Input is
//! validated all-or-nothing up front; afterwards each entry is processed in
//! request order and a failing entry is logged and left out of the result.
//!
//! The one exception is the LMA auxiliary workflow sequence: with
//! [`AuxiliaryFailurePolicy::AbortBatch`] a failing auxiliary submission stops
//! the batch and the error is returned together with the ids queued so far.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

use crate::application::dedup_guard::find_existing_app_group;
use crate::application::dependencies::{LifecycleDependencies, LifecycleSettings};
use crate::application::status_updater::StatusUpdater;
use crate::domain::app_group::{AppGroupStatus, NewAppGroup};
use crate::domain::errors::LifecycleError;
use crate::domain::identifiers::AppGroupId;
use crate::domain::lcm_config::AuxiliaryFailurePolicy;
use crate::domain::requests::{InstallAppGroupsRequest, UninstallAppGroupsRequest};
use crate::domain::validation::{validate_install_app_groups, validate_uninstall_app_groups};

/// Result of a batch operation
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Ids of processed entries, in request order
    pub ids: Vec<AppGroupId>,
    /// Set when the batch stopped early
    pub aborted: Option<LifecycleError>,
}

/// Why a single entry did not make it into the result
enum EntryFailure {
    Skipped(String),
    AbortBatch(LifecycleError),
}

impl From<String> for EntryFailure {
    fn from(reason: String) -> Self {
        EntryFailure::Skipped(reason)
    }
}

#[async_trait]
pub trait AppGroupLifecycleService: Send + Sync {
    async fn install_app_groups(&self, request: InstallAppGroupsRequest) -> Result<BatchOutcome, LifecycleError>;

    async fn uninstall_app_groups(&self, request: UninstallAppGroupsRequest) -> Result<BatchOutcome, LifecycleError>;
}

pub struct StandardAppGroupLifecycleService {
    deps: LifecycleDependencies,
    settings: Arc<LifecycleSettings>,
    status: StatusUpdater,
}

impl StandardAppGroupLifecycleService {
    pub fn new(deps: LifecycleDependencies, settings: Arc<LifecycleSettings>) -> Self {
        let status = StatusUpdater::new(deps.clusters.clone(), deps.app_groups.clone());
        Self { deps, settings, status }
    }

    async fn install_entry(&self, entry: NewAppGroup) -> Result<AppGroupId, EntryFailure> {
        let cluster_id = entry.cluster_id;

        self.deps
            .clusters
            .find_by_id(cluster_id)
            .await
            .map_err(|e| format!("failed to look up cluster {}: {}", cluster_id, e))?
            .ok_or_else(|| format!("cluster {} not found", cluster_id))?;

        let existing = self
            .deps
            .app_groups
            .find_by_cluster(cluster_id)
            .await
            .map_err(|e| format!("failed to list app groups of cluster {}: {}", cluster_id, e))?;

        let identity = entry.identity();
        let group_type = entry.group_type;
        let app_group_id = match find_existing_app_group(&existing, &identity) {
            Some(found) => {
                info!(app_group_id = %found.id, %cluster_id, "Reusing existing app group");
                found.id
            }
            None => self
                .deps
                .app_groups
                .register(entry)
                .await
                .map_err(|e| format!("failed to register app group on cluster {}: {}", cluster_id, e))?,
        };

        let catalog = &self.settings.catalog;
        let submission = catalog
            .install_app_group(cluster_id, app_group_id, group_type)
            .ok_or_else(|| format!("invalid app group type {} for app group {}", group_type, app_group_id))?;

        let workflow_id = self
            .deps
            .workflow_engine
            .submit(&submission)
            .await
            .map_err(|e| format!("failed to submit workflow {}: {}", submission.template, e))?;
        info!(%app_group_id, workflow = %workflow_id, "App group installation workflow submitted");

        // The installation workflow is running whatever the auxiliaries do
        self.status
            .app_group(app_group_id, AppGroupStatus::Installing, Some(&workflow_id))
            .await;

        for auxiliary in catalog.lma_auxiliary(cluster_id, app_group_id, group_type) {
            if let Err(e) = self.deps.workflow_engine.submit(&auxiliary).await {
                let message = format!(
                    "failed to submit auxiliary workflow {} for app group {}: {}",
                    auxiliary.template, app_group_id, e
                );
                return Err(match self.settings.auxiliary_failure_policy {
                    AuxiliaryFailurePolicy::SkipEntry => EntryFailure::Skipped(message),
                    AuxiliaryFailurePolicy::AbortBatch => EntryFailure::AbortBatch(LifecycleError::Upstream(message)),
                });
            }
            info!(%app_group_id, template = %auxiliary.template, "Auxiliary workflow submitted");
        }

        Ok(app_group_id)
    }

    async fn uninstall_entry(&self, app_group_id: AppGroupId) -> Result<AppGroupId, String> {
        let app_group = self
            .deps
            .app_groups
            .find_by_id(app_group_id)
            .await
            .map_err(|e| format!("failed to look up app group {}: {}", app_group_id, e))?
            .ok_or_else(|| format!("app group {} not found", app_group_id))?;

        let submission = self
            .settings
            .catalog
            .uninstall_app_group(app_group.cluster_id, app_group_id, app_group.group_type)
            .ok_or_else(|| format!("invalid app group type {} for app group {}", app_group.group_type, app_group_id))?;

        let workflow_id = self
            .deps
            .workflow_engine
            .submit(&submission)
            .await
            .map_err(|e| format!("failed to submit workflow {}: {}", submission.template, e))?;
        info!(%app_group_id, workflow = %workflow_id, "App group removal workflow submitted");

        self.status
            .app_group(app_group_id, AppGroupStatus::Deleting, Some(&workflow_id))
            .await;

        Ok(app_group_id)
    }
}

#[async_trait]
impl AppGroupLifecycleService for StandardAppGroupLifecycleService {
    async fn install_app_groups(&self, request: InstallAppGroupsRequest) -> Result<BatchOutcome, LifecycleError> {
        let entries = validate_install_app_groups(&request)?;
        let mut outcome = BatchOutcome::default();

        for entry in entries {
            match self.install_entry(entry).await {
                Ok(id) => outcome.ids.push(id),
                Err(EntryFailure::Skipped(reason)) => {
                    error!("Skipping app group installation: {}", reason);
                }
                Err(EntryFailure::AbortBatch(err)) => {
                    error!(queued = outcome.ids.len(), "Aborting app group installation batch: {}", err);
                    outcome.aborted = Some(err);
                    break;
                }
            }
        }

        Ok(outcome)
    }

    async fn uninstall_app_groups(&self, request: UninstallAppGroupsRequest) -> Result<BatchOutcome, LifecycleError> {
        let ids = validate_uninstall_app_groups(&request)?;
        let mut outcome = BatchOutcome::default();

        for id in ids {
            match self.uninstall_entry(id).await {
                Ok(id) => outcome.ids.push(id),
                Err(reason) => error!("Skipping app group removal: {}", reason),
            }
        }

        Ok(outcome)
    }
}
