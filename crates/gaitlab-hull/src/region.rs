//! Boundary regions produced by hull extraction.

use gaitlab_math::Point2;

use crate::polygon::Polygon;

/// One connected piece of a concave hull.
#[derive(Debug, Clone, PartialEq)]
pub struct HullRegion {
    /// Outer boundary, counter-clockwise.
    pub outer: Polygon,
    /// Interior holes, clockwise.
    pub holes: Vec<Polygon>,
    /// Enclosed area (outer minus holes).
    pub area: f64,
}

impl HullRegion {
    /// A region without holes; the boundary is reoriented counter-clockwise.
    pub fn from_polygon(mut outer: Polygon) -> Self {
        outer.ensure_ccw();
        let area = outer.area();
        Self {
            outer,
            holes: Vec::new(),
            area,
        }
    }

    /// Attach a hole and update the area.
    pub(crate) fn push_hole(&mut self, mut hole: Polygon) {
        if hole.is_ccw() {
            hole.reverse();
        }
        self.area -= hole.area();
        self.holes.push(hole);
    }

    /// Iterate over every ring, outer first.
    pub fn rings(&self) -> impl Iterator<Item = &Polygon> + '_ {
        std::iter::once(&self.outer).chain(self.holes.iter())
    }

    /// Whether `point` lies in the region (inside the outer ring, outside
    /// every hole).
    pub fn contains(&self, point: &Point2) -> bool {
        self.outer.contains(point) && !self.holes.iter().any(|h| h.contains(point))
    }

    /// Shortest distance from `point` to any ring.
    pub fn distance_to_boundary(&self, point: &Point2) -> f64 {
        self.rings()
            .map(|r| r.distance_to_boundary(point))
            .fold(f64::INFINITY, f64::min)
    }

    /// Sorted X coordinates where the line at `y` crosses any ring.
    pub fn crossings_at_y(&self, y: f64) -> Vec<f64> {
        let mut xs: Vec<f64> = self.rings().flat_map(|r| r.crossings_at_y(y)).collect();
        xs.sort_by(f64::total_cmp);
        xs
    }

    /// Sorted Y coordinates where the line at `x` crosses any ring.
    pub fn crossings_at_x(&self, x: f64) -> Vec<f64> {
        let mut ys: Vec<f64> = self.rings().flat_map(|r| r.crossings_at_x(x)).collect();
        ys.sort_by(f64::total_cmp);
        ys
    }

    /// The chord of the line at `y` that contains `x`, as `(left, right)`.
    ///
    /// `None` when `(x, y)` lies outside the region.
    pub fn chord_at_y(&self, y: f64, x: f64) -> Option<(f64, f64)> {
        enclosing_interval(&self.crossings_at_y(y), x)
    }

    /// The chord of the line at `x` that contains `y`, as `(bottom, top)`.
    pub fn chord_at_x(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        enclosing_interval(&self.crossings_at_x(x), y)
    }

    /// Bounds of the outer ring.
    pub fn bounds(&self) -> Option<(Point2, Point2)> {
        self.outer.bounds()
    }
}

/// Even-odd pairing of sorted crossings.
fn enclosing_interval(crossings: &[f64], t: f64) -> Option<(f64, f64)> {
    crossings
        .chunks_exact(2)
        .find(|pair| pair[0] <= t && t <= pair[1])
        .map(|pair| (pair[0], pair[1]))
}

/// Concave boundary of a point cloud, as one or more regions.
#[derive(Debug, Clone, PartialEq)]
pub struct ConcaveHull {
    /// Regions by decreasing area.
    pub regions: Vec<HullRegion>,
    /// Alpha radius used to keep triangles.
    pub alpha_radius: f64,
    /// Distinct input points.
    pub point_count: usize,
    /// Triangles that survived the alpha filter.
    pub triangle_count: usize,
}

impl ConcaveHull {
    /// The largest region, used for gait fitting.
    pub fn primary(&self) -> Option<&HullRegion> {
        self.regions.first()
    }

    /// Total enclosed area over all regions.
    pub fn area(&self) -> f64 {
        self.regions.iter().map(|r| r.area).sum()
    }

    /// Whether `point` lies in any region.
    pub fn contains(&self, point: &Point2) -> bool {
        self.regions.iter().any(|r| r.contains(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(lo: f64, hi: f64) -> Polygon {
        Polygon::new(vec![
            Point2::new(lo, lo),
            Point2::new(hi, lo),
            Point2::new(hi, hi),
            Point2::new(lo, hi),
        ])
    }

    #[test]
    fn test_region_with_hole() {
        let mut region = HullRegion::from_polygon(square(0.0, 10.0));
        region.push_hole(square(4.0, 6.0));
        assert_relative_eq!(region.area, 96.0);
        assert!(!region.holes[0].is_ccw());
        assert!(region.contains(&Point2::new(2.0, 2.0)));
        assert!(!region.contains(&Point2::new(5.0, 5.0)));
        assert_eq!(region.crossings_at_y(5.0), vec![0.0, 4.0, 6.0, 10.0]);
        assert_relative_eq!(region.distance_to_boundary(&Point2::new(5.0, 3.0)), 1.0);
        assert_eq!(region.chord_at_y(5.0, 2.0), Some((0.0, 4.0)));
        assert_eq!(region.chord_at_y(5.0, 8.0), Some((6.0, 10.0)));
        assert_eq!(region.chord_at_y(5.0, 5.0), None);
        assert_eq!(region.chord_at_x(5.0, 1.0), Some((0.0, 4.0)));
    }

    #[test]
    fn test_empty_hull_has_no_primary() {
        let hull = ConcaveHull {
            regions: Vec::new(),
            alpha_radius: 1.0,
            point_count: 0,
            triangle_count: 0,
        };
        assert!(hull.primary().is_none());
        assert_eq!(hull.area(), 0.0);
        assert!(!hull.contains(&Point2::origin()));
    }

    #[test]
    fn test_from_clockwise_polygon() {
        let mut cw = square(0.0, 1.0);
        cw.reverse();
        let region = HullRegion::from_polygon(cw);
        assert!(region.outer.is_ccw());
        assert_relative_eq!(region.area, 1.0);
    }
}
