// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Duplicate Work Detection
//!
//! Two checks keep a request from starting work that is already in flight:
//!
//! - a workflow in the `Running` phase whose declared parameters carry the same
//!   correlation value (CreateCluster, keyed on `contract_id`)
//! - an app group already registered on the cluster with the same identity
//!   tuple (InstallAppGroups reuses its id)

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::app_group::{AppGroup, AppGroupIdentity};
use crate::domain::errors::{LifecycleError, ResultCode};
use crate::domain::lcm_config::CreateClusterDedupPolicy;
use crate::domain::workflow::{ParameterKey, WorkflowEngine, WorkflowEngineError, WorkflowPhase, WorkflowSummary};

pub struct DedupGuard {
    workflow_engine: Arc<dyn WorkflowEngine>,
    namespace: String,
}

impl DedupGuard {
    pub fn new(workflow_engine: Arc<dyn WorkflowEngine>, namespace: impl Into<String>) -> Self {
        Self {
            workflow_engine,
            namespace: namespace.into(),
        }
    }

    /// First running workflow in the namespace declaring `key=value`
    pub async fn find_running_workflow(
        &self,
        key: ParameterKey,
        value: &str,
    ) -> Result<Option<WorkflowSummary>, WorkflowEngineError> {
        let workflows = self.workflow_engine.list_workflows(&self.namespace).await?;
        debug!(count = workflows.len(), namespace = %self.namespace, "Scanning workflows for {}={}", key, value);

        Ok(workflows
            .into_iter()
            .find(|wf| wf.phase == WorkflowPhase::Running && wf.has_parameter(key, value)))
    }

    pub async fn is_running_workflow_by_correlation(
        &self,
        key: ParameterKey,
        value: &str,
    ) -> Result<bool, WorkflowEngineError> {
        Ok(self.find_running_workflow(key, value).await?.is_some())
    }

    /// Reject cluster creation while a creation workflow for the contract runs.
    ///
    /// A failure to list workflows fails the request: without the listing the
    /// guard cannot tell whether work is in flight.
    pub async fn check_create_cluster(
        &self,
        policy: CreateClusterDedupPolicy,
        contract_id: &str,
    ) -> Result<(), LifecycleError> {
        let code = match policy {
            CreateClusterDedupPolicy::Disabled => return Ok(()),
            CreateClusterDedupPolicy::AlreadyExists => ResultCode::AlreadyExists,
            CreateClusterDedupPolicy::Internal => ResultCode::Internal,
        };

        match self.find_running_workflow(ParameterKey::ContractId, contract_id).await? {
            Some(workflow) => {
                warn!(contract_id, workflow = %workflow.name, "Cluster creation already in progress");
                Err(LifecycleError::Conflict {
                    message: format!(
                        "existing workflow {} is running for contract {}",
                        workflow.name, contract_id
                    ),
                    code,
                })
            }
            None => Ok(()),
        }
    }
}

/// Existing app group with the same identity tuple
pub fn find_existing_app_group<'a>(existing: &'a [AppGroup], identity: &AppGroupIdentity) -> Option<&'a AppGroup> {
    existing.iter().find(|group| group.matches(identity))
}
