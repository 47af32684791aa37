//! Engine error types.
//!
//! # Purpose
//! Centralizes the error taxonomy every lifecycle operation reports, so the
//! embedding service can translate outcomes into transport codes uniformly.
//!
//! # Key invariants
//! - Each variant carries a stable machine-readable code via [`EngineError::kind`].
//! - Internal errors log their cause server-side and expose only a generic
//!   message plus a correlation id; storage details never reach callers.
use crate::store::StoreError;
use thiserror::Error;
use uuid::Uuid;

/// Error returned by lifecycle operations.
///
/// Validation, not-found, authorization, and conflict failures carry a
/// human-readable message that is safe to show to callers. `Internal` hides
/// the underlying cause behind a correlation id; the cause is logged when the
/// error is constructed.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error("internal error (correlation id {correlation_id})")]
    Internal {
        correlation_id: Uuid,
        #[source]
        source: anyhow::Error,
    },
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Stable code for client-side handling, independent of message text.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Validation(_) => "validation_error",
            EngineError::NotFound(_) => "not_found",
            EngineError::Unauthorized(_) => "unauthorized",
            EngineError::Forbidden(_) => "forbidden",
            EngineError::Conflict(_) => "conflict",
            EngineError::Internal { .. } => "internal",
        }
    }

    /// Wrap an unexpected failure, logging the cause server-side.
    ///
    /// The returned error exposes only the correlation id, which also appears
    /// in the log line so operators can join the two.
    pub fn internal(source: anyhow::Error) -> Self {
        let correlation_id = Uuid::new_v4();
        tracing::error!(error = ?source, %correlation_id, "mealsync internal error");
        EngineError::Internal {
            correlation_id,
            source,
        }
    }
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => EngineError::NotFound(format!("{what} not found")),
            StoreError::Conflict(message) => EngineError::Conflict(message),
            StoreError::Unexpected(source) => EngineError::internal(source),
        }
    }
}
