//! The full analysis pipeline.

use gaitlab_gait::{scan_gait_ellipse, GaitEllipse, GaitError, GaitSettings};
use gaitlab_hull::{extract_concave_hull, ConcaveHull, HullError, HullRegion, HullSettings};
use gaitlab_leg::LegGeometry;
use gaitlab_workspace::{sample_workspace, WorkspaceCloud, WorkspaceSettings};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;

/// Settings for every pipeline stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Workspace sampling.
    pub workspace: WorkspaceSettings,
    /// Hull extraction.
    pub hull: HullSettings,
    /// Gait ellipse scan.
    pub gait: GaitSettings,
}

impl AnalysisSettings {
    /// Settings at a given sampling resolution, defaults elsewhere.
    pub fn with_resolution(resolution: usize) -> Self {
        Self {
            workspace: WorkspaceSettings {
                resolution,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Validate every stage's settings.
    pub fn validate(&self) -> Result<()> {
        self.workspace.validate()?;
        self.hull.validate()?;
        self.gait.validate()?;
        Ok(())
    }
}

/// Output of one pipeline run.
///
/// Stage outcomes that mean "no shape" (too few points, degenerate cloud,
/// region too narrow) are kept as values so the caller still gets the
/// upstream artifacts.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Reachable foot positions.
    pub cloud: WorkspaceCloud,
    /// Concave boundary of the cloud.
    pub hull: std::result::Result<ConcaveHull, HullError>,
    /// Largest gait ellipse in the primary region.
    pub gait: std::result::Result<GaitEllipse, GaitError>,
}

impl Analysis {
    /// Primary boundary region, if the hull stage succeeded.
    pub fn primary_region(&self) -> Option<&HullRegion> {
        self.hull.as_ref().ok().and_then(ConcaveHull::primary)
    }

    /// Gait ellipse, if one fits.
    pub fn ellipse(&self) -> Option<&GaitEllipse> {
        self.gait.as_ref().ok()
    }

    /// Enclosed workspace area; zero when there is no boundary.
    pub fn area(&self) -> f64 {
        self.hull.as_ref().map_or(0.0, ConcaveHull::area)
    }
}

/// Run every stage for one geometry.
///
/// Only invalid settings are errors.
pub fn analyze(geometry: &LegGeometry, settings: &AnalysisSettings) -> Result<Analysis> {
    settings.validate()?;
    let cloud = sample_workspace(geometry, &settings.workspace)?;
    let hull = extract_concave_hull(&cloud.points, &settings.hull);
    let gait = fit_gait(&hull, &settings.gait);
    Ok(finish(cloud, hull, gait))
}

/// Gait stage; a missing boundary has no area to fit into.
pub(crate) fn fit_gait(
    hull: &std::result::Result<ConcaveHull, HullError>,
    settings: &GaitSettings,
) -> std::result::Result<GaitEllipse, GaitError> {
    match hull {
        Ok(hull) => match hull.primary() {
            Some(region) => scan_gait_ellipse(region, settings),
            None => Err(GaitError::EmptyBoundary),
        },
        Err(_) => Err(GaitError::EmptyBoundary),
    }
}

pub(crate) fn finish(
    cloud: WorkspaceCloud,
    hull: std::result::Result<ConcaveHull, HullError>,
    gait: std::result::Result<GaitEllipse, GaitError>,
) -> Analysis {
    let analysis = Analysis { cloud, hull, gait };
    info!(
        topology = ?analysis.cloud.geometry.topology(),
        resolution = analysis.cloud.resolution,
        points = analysis.cloud.len(),
        regions = analysis.hull.as_ref().map_or(0, |h| h.regions.len()),
        area = analysis.area(),
        ellipse = analysis.ellipse().is_some(),
        "Analysis complete"
    );
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaitlab_leg::{ActuatorBounds, LegParams, Topology};
    use gaitlab_math::Point2;

    /// Serial leg whose workspace is mirror-symmetric about X = 0.
    fn symmetric_leg() -> LegGeometry {
        LegGeometry::from_params(&LegParams {
            topology: Topology::Serial,
            links: vec![0.10, 0.10],
            mounts: Vec::new(),
            theta1: ActuatorBounds::new(-150.0, -30.0),
            theta2: ActuatorBounds::new(-120.0, 120.0),
            angle_offsets: [0.0, 0.0],
            collision_threshold: 0.0,
        })
        .unwrap()
    }

    #[test]
    fn test_symmetric_geometry_gives_symmetric_boundary() {
        let analysis = analyze(&symmetric_leg(), &AnalysisSettings::with_resolution(41)).unwrap();
        let region = analysis.primary_region().unwrap();
        let (lo, hi) = region.bounds().unwrap();
        assert!((lo.x + hi.x).abs() < 1e-6, "bounds {lo:?} {hi:?}");
        let tol = 1e-6 * (hi.x - lo.x);
        for p in &region.outer.points {
            let mirrored = Point2::new(-p.x, p.y);
            assert!(
                region.contains(&mirrored) || region.distance_to_boundary(&mirrored) < tol,
                "{mirrored:?} has no mirror image in the region"
            );
        }
    }

    #[test]
    fn test_ellipse_stays_inside_boundary() {
        let settings = AnalysisSettings::with_resolution(41);
        let analysis = analyze(&symmetric_leg(), &settings).unwrap();
        let region = analysis.primary_region().unwrap();
        let ellipse = analysis.ellipse().unwrap();
        assert_eq!(ellipse.center().x, 0.0);
        for p in ellipse.boundary_points(720) {
            assert!(
                region.contains(&p) || region.distance_to_boundary(&p) < 1e-9,
                "{p:?} outside"
            );
        }
        // Below the hip, clear of the folded-leg hole around the base
        assert!(ellipse.center_y < -0.1 && ellipse.center_y > -0.2);
    }

    #[test]
    fn test_area_grows_with_resolution() {
        let leg = LegGeometry::from_params(&LegParams::preset(Topology::FiveBarRear)).unwrap();
        // 23 = 2 * 12 - 1, so the fine grid contains every coarse sample
        let coarse = analyze(&leg, &AnalysisSettings::with_resolution(12)).unwrap();
        let fine = analyze(&leg, &AnalysisSettings::with_resolution(23)).unwrap();
        assert!(coarse
            .cloud
            .points
            .iter()
            .all(|p| fine.cloud.points.contains(p)));
        assert!(coarse.area() > 0.0);
        assert!(
            fine.area() >= coarse.area(),
            "coarse {} fine {}",
            coarse.area(),
            fine.area()
        );
    }

    #[test]
    fn test_presets_run_end_to_end() {
        for topology in Topology::ALL {
            let leg = LegGeometry::from_params(&LegParams::preset(topology)).unwrap();
            let analysis = analyze(&leg, &AnalysisSettings::with_resolution(30)).unwrap();
            assert_eq!(analysis.cloud.resolution, 30);
            assert!(analysis.hull.is_ok(), "{topology:?}: {:?}", analysis.hull);
            assert!(analysis.area() > 0.0);
        }
        let serial = LegGeometry::from_params(&LegParams::preset(Topology::Serial)).unwrap();
        let analysis = analyze(&serial, &AnalysisSettings::with_resolution(30)).unwrap();
        assert!(analysis.ellipse().is_some(), "{:?}", analysis.gait);
    }

    #[test]
    fn test_single_sample_is_insufficient() {
        let analysis = analyze(&symmetric_leg(), &AnalysisSettings::with_resolution(1)).unwrap();
        assert_eq!(analysis.cloud.len(), 1);
        assert_eq!(
            analysis.hull.clone().unwrap_err(),
            HullError::InsufficientData { points: 1 }
        );
        assert_eq!(analysis.gait.clone().unwrap_err(), GaitError::EmptyBoundary);
        assert_eq!(analysis.area(), 0.0);
    }

    #[test]
    fn test_invalid_settings_are_errors() {
        let mut settings = AnalysisSettings::default();
        settings.hull.alpha_fraction = -1.0;
        assert!(analyze(&symmetric_leg(), &settings).is_err());
    }

    #[test]
    fn test_settings_from_partial_json() {
        let settings: AnalysisSettings =
            serde_json::from_str(r#"{ "workspace": { "resolution": 60 } }"#).unwrap();
        assert_eq!(settings.workspace.resolution, 60);
        assert_eq!(settings.hull, HullSettings::default());
        assert_eq!(settings.gait, GaitSettings::default());
    }
}
