// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Wire types of the Argo Workflows server REST API (the subset this service uses).

use serde::{Deserialize, Serialize};

use crate::domain::workflow::{WorkflowPhase, WorkflowSummary, WorkflowTemplateSummary};

pub const RESOURCE_KIND_WORKFLOW_TEMPLATE: &str = "WorkflowTemplate";

/// Body of `POST /api/v1/workflows/{namespace}/submit`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitWorkflowRequest {
    pub namespace: String,
    pub resource_kind: String,
    pub resource_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<String>,
    pub submit_options: SubmitOptions,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOptions {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_point: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generate_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Argo server reads parameters from here
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitWorkflowResponse {
    pub metadata: ObjectMeta,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Arguments {
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkflowSpec {
    #[serde(default)]
    pub arguments: Arguments,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkflowStatus {
    #[serde(default)]
    pub phase: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Workflow {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: WorkflowSpec,
    #[serde(default)]
    pub status: WorkflowStatus,
}

/// `GET /api/v1/workflows/{namespace}`; `items` is `null` when empty
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowList {
    #[serde(default)]
    pub items: Option<Vec<Workflow>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowTemplate {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: WorkflowSpec,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowTemplateList {
    #[serde(default)]
    pub items: Option<Vec<WorkflowTemplate>>,
}

fn parameter_pairs(arguments: Arguments) -> Vec<(String, String)> {
    arguments
        .parameters
        .into_iter()
        .map(|p| (p.name, p.value.unwrap_or_default()))
        .collect()
}

impl From<Workflow> for WorkflowSummary {
    fn from(wf: Workflow) -> Self {
        WorkflowSummary {
            name: wf.metadata.name,
            namespace: wf.metadata.namespace,
            phase: WorkflowPhase::parse(&wf.status.phase),
            parameters: parameter_pairs(wf.spec.arguments),
        }
    }
}

impl From<WorkflowTemplate> for WorkflowTemplateSummary {
    fn from(tpl: WorkflowTemplate) -> Self {
        WorkflowTemplateSummary {
            name: tpl.metadata.name,
            namespace: tpl.metadata.namespace,
            parameters: parameter_pairs(tpl.spec.arguments),
        }
    }
}
