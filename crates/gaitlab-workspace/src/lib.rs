#![warn(missing_docs)]

//! Workspace sampling for two-DOF legs.
//!
//! Sweeps both actuator ranges on an N×N grid, runs forward kinematics at
//! every cell, and keeps the reachable foot positions as a point cloud.
//! Grid order is row-major (actuator 1 outer, actuator 2 inner) and is
//! preserved, so the same geometry and resolution always yield the same
//! cloud.

pub mod error;

pub use error::{Result, WorkspaceError};

use gaitlab_leg::{ActuatorAngles, FootPose, LegGeometry};
use gaitlab_math::Point2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Largest accepted samples-per-axis.
pub const MAX_RESOLUTION: usize = 2000;

/// Sampling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceSettings {
    /// Samples per actuator axis.
    pub resolution: usize,
    /// Keep the foot positions of self-colliding poses for diagnostics.
    pub keep_colliding: bool,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            resolution: 45,
            keep_colliding: false,
        }
    }
}

impl WorkspaceSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.resolution == 0 || self.resolution > MAX_RESOLUTION {
            return Err(WorkspaceError::InvalidSettings(format!(
                "resolution must be between 1 and {MAX_RESOLUTION}, got {}",
                self.resolution
            )));
        }
        Ok(())
    }
}

/// Reachable foot positions of one leg at one resolution.
#[derive(Debug, Clone)]
pub struct WorkspaceCloud {
    /// Geometry that produced the cloud.
    pub geometry: LegGeometry,
    /// Samples per actuator axis.
    pub resolution: usize,
    /// Reachable foot positions, in grid order.
    pub points: Vec<Point2>,
    /// Self-colliding foot positions, if requested.
    pub colliding: Vec<Point2>,
    /// Number of grid cells where the mechanism could not close.
    pub unreachable: usize,
}

impl WorkspaceCloud {
    fn empty(geometry: &LegGeometry, resolution: usize) -> Self {
        Self {
            geometry: geometry.clone(),
            resolution,
            points: Vec::new(),
            colliding: Vec::new(),
            unreachable: 0,
        }
    }

    /// Number of reachable points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if no point is reachable.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Axis-aligned bounds of the reachable points as `(min, max)`.
    pub fn bounds(&self) -> Option<(Point2, Point2)> {
        let first = self.points.first()?;
        Some(self.points.iter().fold((*first, *first), |(lo, hi), p| {
            (
                Point2::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point2::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        }))
    }
}

/// Sample a leg's workspace on an N×N actuator grid.
pub fn sample_workspace(
    geometry: &LegGeometry,
    settings: &WorkspaceSettings,
) -> Result<WorkspaceCloud> {
    settings.validate()?;

    let [b1, b2] = geometry.bounds();
    if (b1.span() == 0.0 || b2.span() == 0.0) && settings.resolution > 1 {
        warn!(
            topology = ?geometry.topology(),
            "actuator range has zero span, workspace is empty"
        );
        return Ok(WorkspaceCloud::empty(geometry, settings.resolution));
    }

    let theta1s = b1.samples(settings.resolution);
    let theta2s = b2.samples(settings.resolution);

    // Parallel over rows; collect keeps row order
    let rows: Vec<Vec<FootPose>> = theta1s
        .par_iter()
        .map(|&theta1| {
            theta2s
                .iter()
                .map(|&theta2| geometry.forward_kinematics(ActuatorAngles::new(theta1, theta2)))
                .collect()
        })
        .collect();

    let mut cloud = WorkspaceCloud::empty(geometry, settings.resolution);
    for pose in rows.into_iter().flatten() {
        match pose {
            FootPose::Reachable(p) => cloud.points.push(p),
            FootPose::SelfColliding(p) => {
                if settings.keep_colliding {
                    cloud.colliding.push(p);
                }
            }
            FootPose::Unreachable => cloud.unreachable += 1,
        }
    }

    debug!(
        topology = ?geometry.topology(),
        resolution = settings.resolution,
        reachable = cloud.points.len(),
        unreachable = cloud.unreachable,
        "Sampled workspace"
    );

    Ok(cloud)
}
