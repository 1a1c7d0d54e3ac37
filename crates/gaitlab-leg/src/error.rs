//! Error types for leg geometry construction.

use thiserror::Error;

use crate::params::Topology;

/// Errors raised while building a [`LegGeometry`](crate::LegGeometry).
///
/// These are configuration errors: they reject a parameter set as a whole.
/// A single unreachable angle pair is never an error, see
/// [`FootPose::Unreachable`](crate::FootPose::Unreachable).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LegError {
    /// Wrong number of link lengths for the topology.
    #[error("{topology:?} expects {expected} link lengths, got {got}")]
    LinkCount {
        /// Topology being built.
        topology: Topology,
        /// Number of links the topology needs.
        expected: usize,
        /// Number of links supplied.
        got: usize,
    },

    /// Wrong number of mounting offsets for the topology.
    #[error("{topology:?} expects {expected} mounting offsets, got {got}")]
    MountCount {
        /// Topology being built.
        topology: Topology,
        /// Number of mounts the topology needs.
        expected: usize,
        /// Number of mounts supplied.
        got: usize,
    },

    /// A link length is zero or negative.
    #[error("link '{name}' must be positive, got {value}")]
    NonPositiveLink {
        /// Link name.
        name: &'static str,
        /// Offending length.
        value: f64,
    },

    /// A parameter is NaN or infinite.
    #[error("parameter '{0}' is not finite")]
    NonFinite(&'static str),

    /// Actuator bounds are out of order.
    #[error("actuator {actuator} bounds are out of order: min {min} > max {max}")]
    InvalidBounds {
        /// Actuator index (1 or 2).
        actuator: u8,
        /// Lower bound in degrees.
        min: f64,
        /// Upper bound in degrees.
        max: f64,
    },

    /// Collision threshold is negative.
    #[error("collision threshold must be non-negative, got {0}")]
    InvalidThreshold(f64),

    /// Link lengths can never satisfy the mechanism's loop constraint.
    #[error("infeasible {topology:?} geometry: {reason}")]
    Infeasible {
        /// Topology being built.
        topology: Topology,
        /// What cannot be satisfied.
        reason: String,
    },
}

/// Result type for leg geometry operations.
pub type Result<T> = std::result::Result<T, LegError>;
