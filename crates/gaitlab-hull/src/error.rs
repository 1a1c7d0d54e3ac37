//! Error types for hull extraction.

use thiserror::Error;

/// Reasons a point cloud yields no boundary.
///
/// Both are expected outcomes of degenerate input, not failures of the
/// extractor.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HullError {
    /// Fewer than three distinct points.
    #[error("need at least 3 distinct points, got {points}")]
    InsufficientData {
        /// Distinct points available.
        points: usize,
    },

    /// Points do not span any area at the chosen alpha radius.
    #[error("degenerate point cloud: {0}")]
    Degenerate(String),

    /// Invalid hull settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

/// Result type for hull operations.
pub type Result<T> = std::result::Result<T, HullError>;
