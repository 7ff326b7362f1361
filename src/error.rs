//! Error types for keepcore.
//!
//! This module defines all error types used throughout the library.
//!
//! The taxonomy follows the reconciliation engine's propagation policy:
//! collaborator-boundary failures (note source unreachable, authentication
//! rejected) are fatal and abort the run before any local mutation, while
//! local read/rename/delete failures are handled at the call site (logged
//! and counted) and never propagate.

use thiserror::Error;

/// Result type alias for keepcore operations
pub type KeepResult<T> = Result<T, KeepError>;

/// Main error type for keepcore operations
#[derive(Error, Debug)]
pub enum KeepError {
    #[error("Note source error: {0}")]
    Source(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Other(String),
}

impl KeepError {
    /// Create a new note source error
    pub fn source(message: impl Into<String>) -> Self {
        KeepError::Source(message.into())
    }

    /// Create a new authentication error
    pub fn auth(message: impl Into<String>) -> Self {
        KeepError::Auth(message.into())
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        KeepError::Config(message.into())
    }

    /// True if this error must abort the run (collaborator boundary failure)
    pub fn is_fatal(&self) -> bool {
        matches!(self, KeepError::Source(_) | KeepError::Auth(_))
    }
}
