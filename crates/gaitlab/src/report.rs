//! Serializable view of an analysis for rendering layers.

use gaitlab_gait::GaitEllipse;
use gaitlab_hull::{HullRegion, Polygon};
use gaitlab_leg::Topology;
use gaitlab_math::Point2;
use serde::Serialize;

use crate::pipeline::Analysis;

/// Everything a presentation layer may draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Leg topology.
    pub topology: Topology,
    /// Samples per actuator axis.
    pub resolution: usize,
    /// Reachable foot positions; empty unless requested.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<[f64; 2]>,
    /// Number of reachable samples.
    pub reachable: usize,
    /// Boundary polygons.
    pub boundary: BoundaryReport,
    /// Gait ellipse.
    pub ellipse: EllipseReport,
}

/// Boundary stage outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BoundaryReport {
    /// One or more regions.
    Valid {
        /// Regions, largest first.
        regions: Vec<RegionReport>,
        /// Index of the primary region, absent when there are no regions.
        primary: Option<usize>,
        /// Total enclosed area.
        area: f64,
        /// Alpha radius used.
        alpha_radius: f64,
    },
    /// No boundary.
    Invalid {
        /// Why.
        reason: String,
    },
}

/// One region as plain coordinate lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionReport {
    /// Outer ring, counter-clockwise.
    pub outer: Vec<[f64; 2]>,
    /// Holes, clockwise.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub holes: Vec<Vec<[f64; 2]>>,
    /// Enclosed area.
    pub area: f64,
}

/// Gait stage outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EllipseReport {
    /// An ellipse fits.
    Valid(GaitEllipse),
    /// No ellipse fits.
    Invalid {
        /// Why.
        reason: String,
    },
}

fn coords(points: &[Point2]) -> Vec<[f64; 2]> {
    points.iter().map(|p| [p.x, p.y]).collect()
}

fn ring(polygon: &Polygon) -> Vec<[f64; 2]> {
    coords(&polygon.points)
}

impl From<&HullRegion> for RegionReport {
    fn from(region: &HullRegion) -> Self {
        Self {
            outer: ring(&region.outer),
            holes: region.holes.iter().map(ring).collect(),
            area: region.area,
        }
    }
}

impl Analysis {
    /// Build the presentation view, optionally with the raw point cloud.
    pub fn report(&self, include_points: bool) -> AnalysisReport {
        let boundary = match &self.hull {
            Ok(hull) => BoundaryReport::Valid {
                regions: hull.regions.iter().map(RegionReport::from).collect(),
                primary: hull.primary().map(|_| 0),
                area: hull.area(),
                alpha_radius: hull.alpha_radius,
            },
            Err(e) => BoundaryReport::Invalid {
                reason: e.to_string(),
            },
        };
        let ellipse = match &self.gait {
            Ok(e) => EllipseReport::Valid(*e),
            Err(e) => EllipseReport::Invalid {
                reason: e.to_string(),
            },
        };
        AnalysisReport {
            topology: self.cloud.geometry.topology(),
            resolution: self.cloud.resolution,
            points: if include_points {
                coords(&self.cloud.points)
            } else {
                Vec::new()
            },
            reachable: self.cloud.len(),
            boundary,
            ellipse,
        }
    }
}
