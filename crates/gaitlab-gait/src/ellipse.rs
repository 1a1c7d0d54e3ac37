//! Gait ellipse value type.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use gaitlab_math::Point2;
use serde::{Deserialize, Serialize};

/// An ellipse centred on the gravity axis (X = 0).
///
/// Only the centre height is stored, so the X = 0 constraint holds by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaitEllipse {
    /// Centre height `y0`.
    pub center_y: f64,
    /// Semi-major axis length.
    pub semi_major: f64,
    /// Semi-minor axis length.
    pub semi_minor: f64,
    /// Angle of the major axis from +X, radians (0 or π/2 for scan results).
    pub rotation: f64,
}

impl GaitEllipse {
    /// Ellipse with semi-axis `half_width` along X and `half_height` along Y.
    pub fn axis_aligned(center_y: f64, half_width: f64, half_height: f64) -> Self {
        if half_width >= half_height {
            Self {
                center_y,
                semi_major: half_width,
                semi_minor: half_height,
                rotation: 0.0,
            }
        } else {
            Self {
                center_y,
                semi_major: half_height,
                semi_minor: half_width,
                rotation: FRAC_PI_2,
            }
        }
    }

    /// Centre point `(0, y0)`.
    pub fn center(&self) -> Point2 {
        Point2::new(0.0, self.center_y)
    }

    /// Horizontal semi-axis of an axis-aligned ellipse (stride half-length).
    pub fn half_width(&self) -> f64 {
        if self.rotation == 0.0 {
            self.semi_major
        } else {
            self.semi_minor
        }
    }

    /// Vertical semi-axis of an axis-aligned ellipse (step height half-length).
    pub fn half_height(&self) -> f64 {
        if self.rotation == 0.0 {
            self.semi_minor
        } else {
            self.semi_major
        }
    }

    /// Enclosed area.
    pub fn area(&self) -> f64 {
        PI * self.semi_major * self.semi_minor
    }

    /// `n` points on the boundary, counter-clockwise from the end of the
    /// major axis.
    pub fn boundary_points(&self, n: usize) -> Vec<Point2> {
        let (sin_r, cos_r) = self.rotation.sin_cos();
        (0..n)
            .map(|i| {
                let t = TAU * i as f64 / n as f64;
                let (s, c) = t.sin_cos();
                let u = self.semi_major * c;
                let v = self.semi_minor * s;
                Point2::new(u * cos_r - v * sin_r, self.center_y + u * sin_r + v * cos_r)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_axis_aligned_orientation() {
        let wide = GaitEllipse::axis_aligned(-1.0, 3.0, 1.0);
        assert_eq!(wide.rotation, 0.0);
        assert_eq!(wide.half_width(), 3.0);
        let tall = GaitEllipse::axis_aligned(-1.0, 1.0, 3.0);
        assert_eq!(tall.rotation, FRAC_PI_2);
        assert_eq!(tall.half_width(), 1.0);
        assert_eq!(tall.half_height(), 3.0);
        assert_relative_eq!(wide.area(), tall.area());
    }

    #[test]
    fn test_boundary_points_lie_on_ellipse() {
        for e in [
            GaitEllipse::axis_aligned(0.5, 2.0, 1.0),
            GaitEllipse::axis_aligned(0.5, 1.0, 2.0),
        ] {
            let points = e.boundary_points(64);
            assert_eq!(points.len(), 64);
            for p in points {
                let x = p.x / e.half_width();
                let y = (p.y - 0.5) / e.half_height();
                assert_relative_eq!(x * x + y * y, 1.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_center_on_gravity_axis() {
        let e = GaitEllipse::axis_aligned(-0.12, 0.05, 0.02);
        assert_eq!(e.center(), Point2::new(0.0, -0.12));
    }
}
