//! Error types for gait ellipse scanning.

use thiserror::Error;

/// Reasons no gait ellipse is produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GaitError {
    /// The region never straddles the gravity axis wide enough.
    #[error("region too narrow on the gravity axis: widest half-width {widest}, need {required}")]
    InsufficientWidth {
        /// Widest half-width found at any candidate centre.
        widest: f64,
        /// Minimum viable half-width.
        required: f64,
    },

    /// The boundary has no area.
    #[error("boundary has no area")]
    EmptyBoundary,

    /// Invalid scan settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

/// Result type for gait operations.
pub type Result<T> = std::result::Result<T, GaitError>;
