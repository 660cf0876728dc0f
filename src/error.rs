// SPDX-License-Identifier: MIT

//! Application error taxonomy.
//!
//! Each variant maps to one recovery strategy:
//! - `Initialization` / `Identity`: fatal at startup, no retry.
//! - `Store`: a single failed store call; the retryable unit.
//! - `Subscription`: a live listener died; fatal to that collection only.
//! - `OperationFailed`: a write exhausted its retry budget; surfaced inline.
//! - `Validation`: rejected before any network call.

use serde::Serialize;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Initialization failed: {0}")]
    Initialization(String),

    #[error("Identity provider error: {0}")]
    Identity(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Subscription to '{collection}' failed: {message}")]
    Subscription {
        collection: &'static str,
        message: String,
    },

    #[error("Operation failed after {attempts} attempts")]
    OperationFailed {
        attempts: u32,
        #[source]
        cause: Box<AppError>,
    },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// True for errors a form should surface inline rather than escalate.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_) | AppError::OperationFailed { .. }
        )
    }

    /// Stable machine-readable tag, used in structured log events.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Initialization(_) => "initialization",
            AppError::Identity(_) => "identity",
            AppError::Store(_) => "store",
            AppError::Subscription { .. } => "subscription",
            AppError::OperationFailed { .. } => "operation_failed",
            AppError::Validation(_) => "validation",
            AppError::Internal(_) => "internal",
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Error body for surfacing to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessage {
    pub kind: &'static str,
    pub message: String,
}

impl From<&AppError> for ErrorMessage {
    fn from(err: &AppError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;
