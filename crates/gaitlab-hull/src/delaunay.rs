//! Delaunay triangulation of a point cloud.
//!
//! The mesh is built by `spade`, whose orientation and in-circle tests are
//! exact, so every point set yields a proper triangulation: interior edges
//! are shared by exactly two triangles and hull edges by one.

use gaitlab_math::{cross, Point2};
use spade::{mitigate_underflow, DelaunayTriangulation, Point2 as Vertex, Triangulation};

use crate::error::{HullError, Result};

/// A triangle as indices into the input points, counter-clockwise.
pub type Triangle = [usize; 3];

/// Twice the signed area of `a, b, c`; positive when counter-clockwise.
pub fn orient(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    cross(&(b - a), &(c - a))
}

/// Circumcentre and squared circumradius, or `None` for collinear points.
pub fn circumcircle(a: &Point2, b: &Point2, c: &Point2) -> Option<(Point2, f64)> {
    let ab = b - a;
    let ac = c - a;
    let d = 2.0 * cross(&ab, &ac);
    if d == 0.0 || !d.is_finite() {
        return None;
    }
    let ab2 = ab.norm_squared();
    let ac2 = ac.norm_squared();
    let ux = (ac.y * ab2 - ab.y * ac2) / d;
    let uy = (ab.x * ac2 - ac.x * ab2) / d;
    let radius_sq = ux * ux + uy * uy;
    Some((Point2::new(a.x + ux, a.y + uy), radius_sq))
}

/// Triangulate `points`, returning counter-clockwise index triples.
///
/// Duplicate points must be removed beforehand. Fewer than three points, or
/// an all-collinear set, produce no triangles.
pub fn triangulate(points: &[Point2]) -> Result<Vec<Triangle>> {
    let vertices: Vec<Vertex<f64>> = points
        .iter()
        .map(|p| mitigate_underflow(Vertex::new(p.x, p.y)))
        .collect();
    let mesh = DelaunayTriangulation::<Vertex<f64>>::bulk_load_stable(vertices)
        .map_err(|e| HullError::Degenerate(format!("triangulation failed: {e}")))?;
    if mesh.num_vertices() != points.len() {
        return Err(HullError::Degenerate(format!(
            "{} duplicate points",
            points.len() - mesh.num_vertices()
        )));
    }
    Ok(mesh
        .inner_faces()
        .map(|face| face.vertices().map(|v| v.fix().index()))
        .collect())
}
