//! Pipeline-level errors.

use gaitlab_gait::GaitError;
use gaitlab_hull::HullError;
use gaitlab_leg::LegError;
use gaitlab_workspace::WorkspaceError;
use thiserror::Error;

/// Errors surfaced by the analysis facade.
///
/// Hull and gait outcomes that merely mean "no shape" are carried inside
/// [`Analysis`](crate::Analysis) instead; these variants appear here only
/// when a caller asks for a stage result directly.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Invalid leg parameters.
    #[error("invalid leg configuration: {0}")]
    Leg(#[from] LegError),

    /// Invalid sampling settings.
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// Hull extraction failed.
    #[error("hull: {0}")]
    Hull(#[from] HullError),

    /// Gait scan failed.
    #[error("gait: {0}")]
    Gait(#[from] GaitError),

    /// No architecture of that name in the catalog.
    #[error("unknown architecture: {0}")]
    UnknownArchitecture(String),

    /// Malformed configuration document.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
