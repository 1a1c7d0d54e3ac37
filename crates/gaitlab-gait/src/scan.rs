//! Profile scan for the largest gait ellipse.

use std::f64::consts::PI;

use gaitlab_hull::HullRegion;
use gaitlab_math::{distance_point_segment, segments_cross, Point2, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::ellipse::GaitEllipse;
use crate::error::{GaitError, Result};

/// Relative area difference below which two fits count as equal.
const AREA_TIE_TOLERANCE: f64 = 1e-9;

/// Scan parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaitSettings {
    /// Candidate centre heights spread over the region's vertical extent.
    pub center_samples: usize,
    /// Scan only this centre height instead.
    pub fixed_center: Option<f64>,
    /// Minimum half-width on the gravity axis, as a fraction of region width.
    pub min_width_fraction: f64,
    /// First growth step, as a fraction of the larger admissible semi-axis.
    pub initial_step_fraction: f64,
    /// Growth stops once the step falls below this fraction of the region
    /// extent.
    pub min_step_fraction: f64,
}

impl Default for GaitSettings {
    fn default() -> Self {
        Self {
            center_samples: 65,
            fixed_center: None,
            min_width_fraction: 0.01,
            initial_step_fraction: 0.25,
            min_step_fraction: 1e-4,
        }
    }
}

impl GaitSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.center_samples == 0 {
            return Err(GaitError::InvalidSettings(
                "center_samples must be at least 1".into(),
            ));
        }
        if let Some(y) = self.fixed_center {
            if !y.is_finite() {
                return Err(GaitError::InvalidSettings("fixed_center must be finite".into()));
            }
        }
        for (name, value) in [
            ("min_width_fraction", self.min_width_fraction),
            ("initial_step_fraction", self.initial_step_fraction),
            ("min_step_fraction", self.min_step_fraction),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(GaitError::InvalidSettings(format!(
                    "{name} must be in (0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// One fitted (or bounding) ellipse during the scan.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    center_y: f64,
    half_width: f64,
    half_height: f64,
}

impl Candidate {
    fn area(&self) -> f64 {
        PI * self.half_width * self.half_height
    }

    fn minor(&self) -> f64 {
        self.half_width.min(self.half_height)
    }

    /// Larger area wins; equal areas prefer the smaller |y0|, then the
    /// larger minor axis.
    fn beats(&self, other: &Candidate) -> bool {
        let (mine, theirs) = (self.area(), other.area());
        let tol = AREA_TIE_TOLERANCE * mine.max(theirs);
        if mine > theirs + tol {
            return true;
        }
        if mine < theirs - tol {
            return false;
        }
        let (y_mine, y_theirs) = (self.center_y.abs(), other.center_y.abs());
        if y_mine != y_theirs {
            return y_mine < y_theirs;
        }
        self.minor() > other.minor()
    }
}

/// Find the largest ellipse centred on X = 0 inside `region`.
///
/// For each candidate centre height the chord through the gravity axis
/// bounds both semi-axes; the axes are then grown alternately with a
/// halving step for as long as the whole ellipse stays inside the region. Centres whose bounding box cannot beat the best fit so far
/// are skipped.
pub fn scan_gait_ellipse(region: &HullRegion, settings: &GaitSettings) -> Result<GaitEllipse> {
    settings.validate()?;

    let (lo, hi) = match region.bounds() {
        Some(b) if region.area > 0.0 => b,
        _ => return Err(GaitError::EmptyBoundary),
    };
    let (width, height) = (hi.x - lo.x, hi.y - lo.y);
    if !(width > 0.0 && height > 0.0) {
        return Err(GaitError::EmptyBoundary);
    }

    let required = settings.min_width_fraction * width;
    let min_step = settings.min_step_fraction * width.max(height);

    let mut widest = 0.0_f64;
    let mut best: Option<Candidate> = None;
    for center_y in candidate_centers(lo.y, hi.y, settings) {
        let Some((left, right)) = region.chord_at_y(center_y, 0.0) else {
            continue;
        };
        let half_width = (-left).min(right);
        widest = widest.max(half_width);
        if half_width < required {
            continue;
        }
        let Some((bottom, top)) = region.chord_at_x(0.0, center_y) else {
            continue;
        };
        let half_height = (center_y - bottom).min(top - center_y);
        if half_height <= 0.0 {
            continue;
        }

        let bound = Candidate {
            center_y,
            half_width,
            half_height,
        };
        if best.is_some_and(|b| !bound.beats(&b)) {
            continue;
        }

        let fit = grow(region, bound, settings, min_step);
        trace!(
            center_y,
            half_width = fit.half_width,
            half_height = fit.half_height,
            "Grew candidate ellipse"
        );
        if fit.half_width > 0.0
            && fit.half_height > 0.0
            && best.map_or(true, |b| fit.beats(&b))
        {
            best = Some(fit);
        }
    }

    match best {
        Some(fit) => {
            let ellipse = GaitEllipse::axis_aligned(fit.center_y, fit.half_width, fit.half_height);
            debug!(
                center_y = ellipse.center_y,
                semi_major = ellipse.semi_major,
                semi_minor = ellipse.semi_minor,
                "Found gait ellipse"
            );
            Ok(ellipse)
        }
        None => {
            warn!(widest, required, "No gait ellipse fits on the gravity axis");
            Err(GaitError::InsufficientWidth { widest, required })
        }
    }
}

/// Candidate centre heights, most centred first.
fn candidate_centers(lo: f64, hi: f64, settings: &GaitSettings) -> Vec<f64> {
    if let Some(y) = settings.fixed_center {
        return vec![y];
    }
    let n = settings.center_samples;
    let mut ys: Vec<f64> = if n == 1 {
        vec![(lo + hi) / 2.0]
    } else {
        (0..n)
            .map(|i| lo + (hi - lo) * i as f64 / (n - 1) as f64)
            .collect()
    };
    ys.sort_by(|a, b| a.abs().total_cmp(&b.abs()).then(a.total_cmp(b)));
    ys
}

/// Whether the closed ellipse lies inside `region`.
///
/// The centre must be inside and no ring edge may enter the ellipse's
/// interior. Edges are mapped into the frame where the ellipse is the unit
/// circle, so the test is exact between boundary samples too. A zero axis
/// degenerates the ellipse to a segment, which only has to avoid crossing
/// the rings.
fn ellipse_fits(region: &HullRegion, center_y: f64, half_width: f64, half_height: f64) -> bool {
    let center = Point2::new(0.0, center_y);
    if !region.contains(&center) {
        return false;
    }
    let edges = || region.rings().flat_map(|ring| ring.edges());
    if half_width > 0.0 && half_height > 0.0 {
        let to_unit =
            |p: &Point2| Point2::new(p.x / half_width, (p.y - center_y) / half_height);
        let origin = Point2::origin();
        return edges()
            .all(|(p, q)| distance_point_segment(&origin, &to_unit(p), &to_unit(q)) >= 1.0);
    }
    let axis = Vec2::new(half_width, half_height);
    let (start, end) = (center - axis, center + axis);
    !edges().any(|(p, q)| segments_cross(p, q, &start, &end))
}

/// Grow both semi-axes from zero within `bound`, coarse to fine.
fn grow(region: &HullRegion, bound: Candidate, settings: &GaitSettings, min_step: f64) -> Candidate {
    let fits = |half_width: f64, half_height: f64| {
        ellipse_fits(region, bound.center_y, half_width, half_height)
    };

    let (mut a, mut b) = (0.0, 0.0);
    let mut step = settings.initial_step_fraction * bound.half_width.max(bound.half_height);
    while step >= min_step {
        let mut grew = false;
        if a + step <= bound.half_width && fits(a + step, b) {
            a += step;
            grew = true;
        }
        if b + step <= bound.half_height && fits(a, b + step) {
            b += step;
            grew = true;
        }
        if !grew {
            step *= 0.5;
        }
    }

    Candidate {
        center_y: bound.center_y,
        half_width: a,
        half_height: b,
    }
}
