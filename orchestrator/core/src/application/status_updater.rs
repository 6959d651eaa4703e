// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Best-effort status propagation to the record-of-truth service.
//!
//! A status update always follows a successful workflow submission, so a failure
//! here is logged and swallowed: the workflow is already running and the caller
//! still receives its result.

use std::sync::Arc;

use tracing::{debug, error};

use crate::domain::app_group::AppGroupStatus;
use crate::domain::cluster::ClusterStatus;
use crate::domain::identifiers::{AppGroupId, ClusterId};
use crate::domain::repository::{AppGroupRepository, ClusterRepository};

pub struct StatusUpdater {
    clusters: Arc<dyn ClusterRepository>,
    app_groups: Arc<dyn AppGroupRepository>,
}

impl StatusUpdater {
    pub fn new(clusters: Arc<dyn ClusterRepository>, app_groups: Arc<dyn AppGroupRepository>) -> Self {
        Self { clusters, app_groups }
    }

    /// Returns whether the update was recorded
    pub async fn cluster(&self, id: ClusterId, status: ClusterStatus, workflow_id: Option<&str>) -> bool {
        match self.clusters.update_status(id, status, workflow_id).await {
            Ok(()) => {
                debug!(cluster_id = %id, %status, "Cluster status updated");
                true
            }
            Err(e) => {
                error!(cluster_id = %id, %status, "Failed to update cluster status: {}", e);
                false
            }
        }
    }

    /// Returns whether the update was recorded
    pub async fn app_group(&self, id: AppGroupId, status: AppGroupStatus, workflow_id: Option<&str>) -> bool {
        match self.app_groups.update_status(id, status, workflow_id).await {
            Ok(()) => {
                debug!(app_group_id = %id, %status, "App group status updated");
                true
            }
            Err(e) => {
                error!(app_group_id = %id, %status, "Failed to update app group status: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::app_group::{AppGroup, NewAppGroup};
    use crate::domain::cluster::{Cluster, NewCluster};
    use crate::domain::identifiers::ContractId;
    use crate::domain::repository::RepositoryError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingClusters {
        updates: Mutex<Vec<(ClusterId, ClusterStatus, Option<String>)>>,
        fail: bool,
    }

    #[async_trait]
    impl ClusterRepository for RecordingClusters {
        async fn find_by_id(&self, _id: ClusterId) -> Result<Option<Cluster>, RepositoryError> {
            Ok(None)
        }

        async fn find_by_contract(&self, _contract_id: ContractId) -> Result<Vec<Cluster>, RepositoryError> {
            Ok(vec![])
        }

        async fn register(&self, _cluster: NewCluster) -> Result<ClusterId, RepositoryError> {
            Ok(ClusterId::new())
        }

        async fn update_status(
            &self,
            id: ClusterId,
            status: ClusterStatus,
            workflow_id: Option<&str>,
        ) -> Result<(), RepositoryError> {
            if self.fail {
                return Err(RepositoryError::Upstream("info service unavailable".to_string()));
            }
            self.updates
                .lock()
                .unwrap()
                .push((id, status, workflow_id.map(str::to_string)));
            Ok(())
        }
    }

    struct FailingAppGroups;

    #[async_trait]
    impl AppGroupRepository for FailingAppGroups {
        async fn find_by_id(&self, _id: AppGroupId) -> Result<Option<AppGroup>, RepositoryError> {
            Ok(None)
        }

        async fn find_by_cluster(&self, _cluster_id: ClusterId) -> Result<Vec<AppGroup>, RepositoryError> {
            Ok(vec![])
        }

        async fn register(&self, _app_group: NewAppGroup) -> Result<AppGroupId, RepositoryError> {
            Ok(AppGroupId::new())
        }

        async fn update_status(
            &self,
            _id: AppGroupId,
            _status: AppGroupStatus,
            _workflow_id: Option<&str>,
        ) -> Result<(), RepositoryError> {
            Err(RepositoryError::Upstream("timeout".to_string()))
        }
    }

    #[tokio::test]
    async fn test_cluster_update_records_workflow_id() {
        let clusters = Arc::new(RecordingClusters::default());
        let updater = StatusUpdater::new(clusters.clone(), Arc::new(FailingAppGroups));
        let id = ClusterId::new();

        assert!(updater.cluster(id, ClusterStatus::Installing, Some("create-tks-usercluster-x1")).await);

        let updates = clusters.updates.lock().unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].1, ClusterStatus::Installing);
        assert_eq!(updates[0].2.as_deref(), Some("create-tks-usercluster-x1"));
    }

    #[tokio::test]
    async fn test_failures_are_swallowed() {
        let clusters = Arc::new(RecordingClusters {
            fail: true,
            ..Default::default()
        });
        let updater = StatusUpdater::new(clusters, Arc::new(FailingAppGroups));

        assert!(!updater.cluster(ClusterId::new(), ClusterStatus::Deleting, None).await);
        assert!(!updater.app_group(AppGroupId::new(), AppGroupStatus::Installing, None).await);
    }
}
