// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Lifecycle error taxonomy and the result codes it is surfaced as.

use thiserror::Error;

use crate::domain::cluster_config::InvalidConfiguration;
use crate::domain::repository::RepositoryError;
use crate::domain::validation::ValidationError;
use crate::domain::workflow::WorkflowEngineError;

/// Structured result code carried by every lifecycle response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultCode {
    Ok,
    InvalidArgument,
    NotFound,
    AlreadyExists,
    Internal,
    Unimplemented,
}

impl std::fmt::Display for ResultCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResultCode::Ok => "OK",
            ResultCode::InvalidArgument => "INVALID_ARGUMENT",
            ResultCode::NotFound => "NOT_FOUND",
            ResultCode::AlreadyExists => "ALREADY_EXISTS",
            ResultCode::Internal => "INTERNAL",
            ResultCode::Unimplemented => "UNIMPLEMENTED",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Request is well-formed but the target is in the wrong state
    #[error("{0}")]
    Precondition(String),

    /// Referenced entity missing or cross-reference mismatch
    #[error("{0}")]
    NotFound(String),

    /// Equivalent work already in flight; `code` follows the deployment policy
    #[error("{message}")]
    Conflict { message: String, code: ResultCode },

    #[error("{0}")]
    Upstream(String),

    #[error(transparent)]
    Derivation(#[from] InvalidConfiguration),

    #[error("{0}")]
    Unimplemented(String),
}

impl LifecycleError {
    pub fn code(&self) -> ResultCode {
        match self {
            LifecycleError::Validation(_) | LifecycleError::Precondition(_) => ResultCode::InvalidArgument,
            LifecycleError::NotFound(_) => ResultCode::NotFound,
            LifecycleError::Conflict { code, .. } => *code,
            LifecycleError::Upstream(_) | LifecycleError::Derivation(_) => ResultCode::Internal,
            LifecycleError::Unimplemented(_) => ResultCode::Unimplemented,
        }
    }
}

impl From<RepositoryError> for LifecycleError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => LifecycleError::NotFound(msg),
            other => LifecycleError::Upstream(other.to_string()),
        }
    }
}

impl From<WorkflowEngineError> for LifecycleError {
    fn from(err: WorkflowEngineError) -> Self {
        LifecycleError::Upstream(err.to_string())
    }
}
