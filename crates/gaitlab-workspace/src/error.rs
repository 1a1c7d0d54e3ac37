//! Error types for workspace sampling.

use thiserror::Error;

/// Errors that can occur while sampling a workspace.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkspaceError {
    /// Invalid sampling settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

/// Result type for workspace operations.
pub type Result<T> = std::result::Result<T, WorkspaceError>;
