// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Argo Workflows HTTP Client
//!
//! Implements the [`WorkflowEngine`] port against the Argo server REST API.
//!
//! # Endpoints
//!
//! - `POST /api/v1/workflows/{namespace}/submit`: instantiate a WorkflowTemplate
//! - `GET /api/v1/workflows/{namespace}`: list workflows with their arguments
//! - `GET /api/v1/workflow-templates/{namespace}`: list templates
//!
//! Every request carries the configured timeout; there is no retry. Any non-200
//! response is surfaced as [`WorkflowEngineError::Status`] with the body text.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::domain::lcm_config::WorkflowEngineEndpoint;
use crate::domain::workflow::{
    WorkflowEngine, WorkflowEngineError, WorkflowSubmission, WorkflowSummary, WorkflowTemplateSummary,
};
use crate::infrastructure::argo_types::{
    SubmitOptions, SubmitWorkflowRequest, SubmitWorkflowResponse, WorkflowList, WorkflowTemplateList,
    RESOURCE_KIND_WORKFLOW_TEMPLATE,
};

#[derive(Clone)]
pub struct ArgoWorkflowClient {
    http_client: HttpClient,
    base_url: String,
    token: Option<String>,
}

impl ArgoWorkflowClient {
    /// Build a client for `host:port`. SSL requires a bearer token.
    pub fn new(
        host: &str,
        port: u16,
        ssl: bool,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, WorkflowEngineError> {
        let token = token.filter(|t| !t.is_empty());
        let base_url = if ssl {
            if token.is_none() {
                return Err(WorkflowEngineError::Configuration(
                    "argo ssl enabled but token is empty".to_string(),
                ));
            }
            format!("https://{}:{}", host, port)
        } else {
            format!("http://{}:{}", host, port)
        };

        Self::with_base_url(base_url, token, timeout)
    }

    pub fn from_endpoint(endpoint: &WorkflowEngineEndpoint, timeout: Duration) -> Result<Self, WorkflowEngineError> {
        Self::new(
            &endpoint.address,
            endpoint.port,
            endpoint.ssl,
            endpoint.token.clone(),
            timeout,
        )
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, WorkflowEngineError> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WorkflowEngineError::Configuration(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, WorkflowEngineError> {
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "(no body)".to_string());
            return Err(WorkflowEngineError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| WorkflowEngineError::Transport(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| WorkflowEngineError::Decode(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, WorkflowEngineError> {
        let response = self
            .authorize(self.http_client.get(url))
            .send()
            .await
            .map_err(|e| WorkflowEngineError::Transport(e.to_string()))?;
        Self::read_json(response).await
    }
}

#[async_trait]
impl WorkflowEngine for ArgoWorkflowClient {
    async fn submit(&self, submission: &WorkflowSubmission) -> Result<String, WorkflowEngineError> {
        let parameters = submission.parameters.to_wire();
        let body = SubmitWorkflowRequest {
            namespace: submission.namespace.clone(),
            resource_kind: RESOURCE_KIND_WORKFLOW_TEMPLATE.to_string(),
            resource_name: submission.template.clone(),
            parameters: parameters.clone(),
            submit_options: SubmitOptions {
                parameters,
                ..Default::default()
            },
        };
        debug!(template = %submission.template, namespace = %submission.namespace, "Submitting workflow");

        let url = format!("{}/api/v1/workflows/{}/submit", self.base_url, submission.namespace);
        let response = self
            .authorize(self.http_client.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| WorkflowEngineError::Transport(e.to_string()))?;

        let submitted: SubmitWorkflowResponse = Self::read_json(response).await?;
        if submitted.metadata.name.is_empty() {
            return Err(WorkflowEngineError::Decode(
                "submit response carries no workflow name".to_string(),
            ));
        }
        Ok(submitted.metadata.name)
    }

    async fn list_workflows(&self, namespace: &str) -> Result<Vec<WorkflowSummary>, WorkflowEngineError> {
        let url = format!("{}/api/v1/workflows/{}", self.base_url, namespace);
        let list: WorkflowList = self.get_json(&url).await?;
        Ok(list.items.unwrap_or_default().into_iter().map(Into::into).collect())
    }

    async fn list_workflow_templates(&self, namespace: &str) -> Result<Vec<WorkflowTemplateSummary>, WorkflowEngineError> {
        let url = format!("{}/api/v1/workflow-templates/{}", self.base_url, namespace);
        let list: WorkflowTemplateList = self.get_json(&url).await?;
        Ok(list.items.unwrap_or_default().into_iter().map(Into::into).collect())
    }
}
