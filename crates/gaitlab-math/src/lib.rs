#![warn(missing_docs)]

//! Math types for gaitlab leg analysis.
//!
//! Thin wrappers around nalgebra providing the planar primitives the
//! kinematics and hull stages share: points, vectors, tolerances,
//! circle–circle intersection and segment distances.

use nalgebra::Vector2;

/// A point in the sagittal plane of the leg.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in the sagittal plane of the leg.
pub type Vec2 = Vector2<f64>;

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance, in model units.
    pub linear: f64,
}

impl Tolerance {
    /// Default tolerance (1e-9 linear).
    pub const DEFAULT: Self = Self { linear: 1e-9 };

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point2, b: &Point2) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Polar to cartesian: a vector of length `radius` at `angle` radians from +X.
pub fn polar(radius: f64, angle: f64) -> Vec2 {
    let (s, c) = angle.sin_cos();
    Vec2::new(radius * c, radius * s)
}

/// Z component of the 2D cross product `a × b`.
pub fn cross(a: &Vec2, b: &Vec2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Which of the two circle–circle solutions a mechanism uses.
///
/// Measured against the directed line from the first circle centre to the
/// second one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chirality {
    /// Solution on the left of the centre line (counter-clockwise side).
    Left,
    /// Solution on the right of the centre line (clockwise side).
    Right,
}

/// Outcome of intersecting two circles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CircleIntersection {
    /// Circles are too far apart or one lies inside the other.
    Disjoint,
    /// Same centre and radius: every point of the circle is a solution.
    Coincident,
    /// The two solutions, left of the centre line first.
    ///
    /// Tangent circles produce the same point twice.
    Points {
        /// Solution on the left of the centre line.
        left: Point2,
        /// Solution on the right of the centre line.
        right: Point2,
    },
}

impl CircleIntersection {
    /// Pick the solution for a fixed chirality.
    ///
    /// Disjoint and coincident circles have no usable solution.
    pub fn select(&self, chirality: Chirality) -> Option<Point2> {
        match (self, chirality) {
            (CircleIntersection::Points { left, .. }, Chirality::Left) => Some(*left),
            (CircleIntersection::Points { right, .. }, Chirality::Right) => Some(*right),
            _ => None,
        }
    }
}

/// Intersect the circle `(c1, r1)` with the circle `(c2, r2)`.
///
/// Uses the triangle-height construction: the foot of the chord lies at
/// distance `a` from `c1` along the centre line, and the solutions sit at
/// height `h` on either side of it.
pub fn circle_intersection(c1: &Point2, r1: f64, c2: &Point2, r2: f64) -> CircleIntersection {
    let tol = Tolerance::DEFAULT;
    let delta = c2 - c1;
    let d = delta.norm();

    if tol.is_zero(d) {
        return if tol.is_zero(r1 - r2) {
            CircleIntersection::Coincident
        } else {
            CircleIntersection::Disjoint
        };
    }
    if d > r1 + r2 || d < (r1 - r2).abs() {
        return CircleIntersection::Disjoint;
    }

    let a = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    // Clamp: tangent circles can round a hair below zero
    let h = (r1 * r1 - a * a).max(0.0).sqrt();
    let unit = delta / d;
    let foot = c1 + unit * a;
    let normal = Vec2::new(-unit.y, unit.x);

    CircleIntersection::Points {
        left: foot + normal * h,
        right: foot - normal * h,
    }
}

/// Minimum distance from `p` to the segment `a`–`b`.
pub fn distance_point_segment(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let ab = b - a;
    let ap = p - a;
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return ap.norm();
    }
    let t = (ap.dot(&ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

/// Whether the segments `a`–`b` and `c`–`d` properly cross each other.
pub fn segments_cross(a: &Point2, b: &Point2, c: &Point2, d: &Point2) -> bool {
    let ccw = |p: &Point2, q: &Point2, r: &Point2| cross(&(q - p), &(r - p)) > 0.0;
    ccw(a, c, d) != ccw(b, c, d) && ccw(a, b, c) != ccw(a, b, d)
}

/// Minimum distance between the segments `a`–`b` and `c`–`d`.
///
/// Crossing segments are at distance zero.
pub fn segment_distance(a: &Point2, b: &Point2, c: &Point2, d: &Point2) -> f64 {
    if segments_cross(a, b, c, d) {
        return 0.0;
    }
    distance_point_segment(c, a, b)
        .min(distance_point_segment(d, a, b))
        .min(distance_point_segment(a, c, d))
        .min(distance_point_segment(b, c, d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_polar() {
        let v = polar(2.0, FRAC_PI_2);
        assert!(v.x.abs() < 1e-12);
        assert_relative_eq!(v.y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_circles_too_far_apart() {
        let hit = circle_intersection(&Point2::new(0.0, 0.0), 0.10, &Point2::new(0.25, 0.0), 0.10);
        assert_eq!(hit, CircleIntersection::Disjoint);
        assert!(hit.select(Chirality::Left).is_none());
    }

    #[test]
    fn test_circle_inside_circle() {
        let hit = circle_intersection(&Point2::new(0.0, 0.0), 1.0, &Point2::new(0.1, 0.0), 0.2);
        assert_eq!(hit, CircleIntersection::Disjoint);
    }

    #[test]
    fn test_coincident_circles() {
        let c = Point2::new(1.0, 1.0);
        let hit = circle_intersection(&c, 0.5, &c, 0.5);
        assert_eq!(hit, CircleIntersection::Coincident);
        assert!(hit.select(Chirality::Right).is_none());
    }

    #[test]
    fn test_concentric_circles() {
        let c = Point2::new(1.0, 1.0);
        assert_eq!(circle_intersection(&c, 0.5, &c, 0.7), CircleIntersection::Disjoint);
    }

    #[test]
    fn test_chirality_sides() {
        // Centres on the X axis: left solution is above, right is below
        let hit = circle_intersection(&Point2::new(0.0, 0.0), 5.0, &Point2::new(8.0, 0.0), 5.0);
        let left = hit.select(Chirality::Left).unwrap();
        let right = hit.select(Chirality::Right).unwrap();
        assert_relative_eq!(left.x, 4.0, epsilon = 1e-12);
        assert_relative_eq!(left.y, 3.0, epsilon = 1e-12);
        assert_relative_eq!(right.y, -3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tangent_circles() {
        let hit = circle_intersection(&Point2::new(0.0, 0.0), 1.0, &Point2::new(2.0, 0.0), 1.0);
        let left = hit.select(Chirality::Left).unwrap();
        let right = hit.select(Chirality::Right).unwrap();
        assert!((left - right).norm() < 1e-9);
        assert_relative_eq!(left.x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_solutions_lie_on_both_circles() {
        let c1 = Point2::new(-15.0, -10.0);
        let c2 = Point2::new(20.0, 5.0);
        let hit = circle_intersection(&c1, 30.0, &c2, 25.0);
        for side in [Chirality::Left, Chirality::Right] {
            let p = hit.select(side).unwrap();
            assert_relative_eq!((p - c1).norm(), 30.0, epsilon = 1e-9);
            assert_relative_eq!((p - c2).norm(), 25.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_distance_point_segment() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 0.0);
        assert_relative_eq!(distance_point_segment(&Point2::new(5.0, 3.0), &a, &b), 3.0);
        assert_relative_eq!(distance_point_segment(&Point2::new(-4.0, 3.0), &a, &b), 5.0);
        assert_relative_eq!(distance_point_segment(&Point2::new(3.0, 4.0), &a, &a), 5.0);
    }

    #[test]
    fn test_segment_distance() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 10.0);
        let c = Point2::new(0.0, 10.0);
        let d = Point2::new(10.0, 0.0);
        assert!(segments_cross(&a, &b, &c, &d));
        assert_eq!(segment_distance(&a, &b, &c, &d), 0.0);

        let e = Point2::new(0.0, 2.0);
        let f = Point2::new(10.0, 2.0);
        let g = Point2::new(0.0, 0.0);
        let h = Point2::new(10.0, 0.0);
        assert!(!segments_cross(&e, &f, &g, &h));
        assert_relative_eq!(segment_distance(&e, &f, &g, &h), 2.0);
    }

    #[test]
    fn test_tolerance() {
        let tol = Tolerance::DEFAULT;
        assert!(tol.points_equal(&Point2::new(1.0, 1.0), &Point2::new(1.0 + 1e-12, 1.0)));
        assert!(!tol.points_equal(&Point2::new(1.0, 1.0), &Point2::new(1.001, 1.0)));
    }
}
