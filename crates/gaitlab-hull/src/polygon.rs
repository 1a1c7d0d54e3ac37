//! Closed 2D polygons and boundary queries.

use gaitlab_math::{distance_point_segment, Point2};

/// A 2D polygon (closed path, last vertex connects back to the first).
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Vertices of the polygon in order.
    pub points: Vec<Point2>,
}

impl Polygon {
    /// Create a new polygon from points.
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// Regular `n`-gon inscribed in the circle of `radius` around `center`,
    /// counter-clockwise, first vertex on +X.
    pub fn regular(center: Point2, radius: f64, n: usize) -> Self {
        let points = (0..n)
            .map(|i| {
                let angle = std::f64::consts::TAU * i as f64 / n as f64;
                center + gaitlab_math::polar(radius, angle)
            })
            .collect();
        Self { points }
    }

    /// Iterate over edges as `(start, end)` pairs, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (&Point2, &Point2)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (&self.points[i], &self.points[(i + 1) % n]))
    }

    /// Signed area of the polygon.
    /// Positive for counter-clockwise, negative for clockwise.
    pub fn signed_area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }
        self.edges().map(|(a, b)| a.x * b.y - b.x * a.y).sum::<f64>() / 2.0
    }

    /// Unsigned area.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Is the polygon counter-clockwise?
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Reverse the winding order.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Ensure counter-clockwise winding.
    pub fn ensure_ccw(&mut self) {
        if !self.is_ccw() {
            self.reverse();
        }
    }

    /// Axis-aligned bounds as `(min, max)`.
    pub fn bounds(&self) -> Option<(Point2, Point2)> {
        let first = self.points.first()?;
        Some(self.points.iter().fold((*first, *first), |(lo, hi), p| {
            (
                Point2::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point2::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        }))
    }

    /// Even-odd containment test (points exactly on an edge may go either way).
    pub fn contains(&self, point: &Point2) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let pi = &self.points[i];
            let pj = &self.points[j];
            if ((pi.y > point.y) != (pj.y > point.y))
                && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Shortest distance from `point` to any edge.
    pub fn distance_to_boundary(&self, point: &Point2) -> f64 {
        self.edges()
            .map(|(a, b)| distance_point_segment(point, a, b))
            .fold(f64::INFINITY, f64::min)
    }

    /// X coordinates where the horizontal line at `y` crosses the boundary.
    ///
    /// Uses the half-open rule so a vertex shared by two edges counts once.
    pub fn crossings_at_y(&self, y: f64) -> Vec<f64> {
        self.edges()
            .filter(|(a, b)| (a.y > y) != (b.y > y))
            .map(|(a, b)| a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y))
            .collect()
    }

    /// Y coordinates where the vertical line at `x` crosses the boundary.
    pub fn crossings_at_x(&self, x: f64) -> Vec<f64> {
        self.edges()
            .filter(|(a, b)| (a.x > x) != (b.x > x))
            .map(|(a, b)| a.y + (x - a.x) * (b.y - a.y) / (b.x - a.x))
            .collect()
    }
}
