//! Alpha-shape extraction over a Delaunay triangulation.
//!
//! Triangles whose circumradius exceeds the alpha radius are dropped; the
//! edges used by exactly one surviving triangle form the boundary. Those
//! edges are chained into closed rings: counter-clockwise rings are outer
//! boundaries and clockwise rings are holes.
//!
//! The default alpha radius is a fixed fraction of the cloud's extent, so it
//! does not depend on how densely the cloud was sampled.

use std::collections::{HashMap, HashSet};

use gaitlab_math::{cross, Point2};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::delaunay::{circumcircle, triangulate, Triangle};
use crate::error::{HullError, Result};
use crate::polygon::Polygon;
use crate::region::{ConcaveHull, HullRegion};

/// Alpha-shape parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HullSettings {
    /// Alpha radius as a fraction of the cloud's larger bounding-box side.
    pub alpha_fraction: f64,
    /// Fixed alpha radius; overrides `alpha_fraction` when set.
    pub alpha_radius: Option<f64>,
}

impl Default for HullSettings {
    fn default() -> Self {
        Self {
            alpha_fraction: 0.1,
            alpha_radius: None,
        }
    }
}

impl HullSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha_fraction > 0.0 && self.alpha_fraction <= 1.0) {
            return Err(HullError::InvalidSettings(format!(
                "alpha_fraction must be in (0, 1], got {}",
                self.alpha_fraction
            )));
        }
        if let Some(r) = self.alpha_radius {
            if !(r.is_finite() && r > 0.0) {
                return Err(HullError::InvalidSettings(format!(
                    "alpha_radius must be positive, got {r}"
                )));
            }
        }
        Ok(())
    }
}

/// Extract the concave boundary of a point cloud.
///
/// Fewer than three distinct points yield [`HullError::InsufficientData`];
/// collinear points, or an alpha radius too small for any triangle, yield
/// [`HullError::Degenerate`].
pub fn extract_concave_hull(points: &[Point2], settings: &HullSettings) -> Result<ConcaveHull> {
    settings.validate()?;

    let points = dedup(points);
    if points.len() < 3 {
        debug!(points = points.len(), "Too few distinct points for a hull");
        return Err(HullError::InsufficientData {
            points: points.len(),
        });
    }

    let triangles = triangulate(&points)?;
    if triangles.is_empty() {
        warn!(points = points.len(), "Point cloud is collinear");
        return Err(HullError::Degenerate("points are collinear".into()));
    }

    let alpha_radius = match settings.alpha_radius {
        Some(r) => r,
        None => settings.alpha_fraction * extent(&points),
    };
    let alpha_sq = alpha_radius * alpha_radius;

    let kept: Vec<Triangle> = triangles
        .into_iter()
        .filter(|t| {
            circumcircle(&points[t[0]], &points[t[1]], &points[t[2]])
                .is_some_and(|(_, r2)| r2 <= alpha_sq)
        })
        .collect();
    if kept.is_empty() {
        warn!(alpha_radius, "No triangle fits the alpha radius");
        return Err(HullError::Degenerate(format!(
            "no triangle fits alpha radius {alpha_radius}"
        )));
    }

    let rings = chain_boundary(&points, &kept);
    let regions = assemble_regions(rings);
    if regions.is_empty() {
        warn!(triangles = kept.len(), "Boundary edges did not close");
        return Err(HullError::Degenerate("boundary did not close".into()));
    }

    debug!(
        points = points.len(),
        triangles = kept.len(),
        regions = regions.len(),
        alpha_radius,
        "Extracted concave hull"
    );

    Ok(ConcaveHull {
        regions,
        alpha_radius,
        point_count: points.len(),
        triangle_count: kept.len(),
    })
}

/// Drop exact and near-exact duplicates, keeping first occurrences.
fn dedup(points: &[Point2]) -> Vec<Point2> {
    let finite: Vec<Point2> = points
        .iter()
        .filter(|p| p.x.is_finite() && p.y.is_finite())
        .copied()
        .collect();
    let quantum = extent(&finite).max(f64::MIN_POSITIVE) * 1e-10;
    let mut seen = HashSet::with_capacity(finite.len());
    finite
        .into_iter()
        .filter(|p| {
            let key = ((p.x / quantum).round() as i64, (p.y / quantum).round() as i64);
            seen.insert(key)
        })
        .collect()
}

fn extent(points: &[Point2]) -> f64 {
    let Some(first) = points.first() else {
        return 0.0;
    };
    let (lo, hi) = points.iter().fold((*first, *first), |(lo, hi), p| {
        (
            Point2::new(lo.x.min(p.x), lo.y.min(p.y)),
            Point2::new(hi.x.max(p.x), hi.y.max(p.y)),
        )
    });
    (hi.x - lo.x).max(hi.y - lo.y)
}

/// Chain boundary edges into closed rings.
///
/// Edges keep the direction they have in their (counter-clockwise)
/// triangle. Where several boundary edges leave one vertex, the walk takes
/// the first one clockwise from the edge it arrived on, which keeps pinched
/// regions as separate rings.
fn chain_boundary(points: &[Point2], triangles: &[Triangle]) -> Vec<Polygon> {
    let mut uses: HashMap<(usize, usize), u32> = HashMap::new();
    for t in triangles {
        for k in 0..3 {
            let (a, b) = (t[k], t[(k + 1) % 3]);
            *uses.entry((a.min(b), a.max(b))).or_default() += 1;
        }
    }

    let mut edges: Vec<(usize, usize)> = Vec::new();
    for t in triangles {
        for k in 0..3 {
            let (a, b) = (t[k], t[(k + 1) % 3]);
            if uses.get(&(a.min(b), a.max(b))) == Some(&1) {
                edges.push((a, b));
            }
        }
    }

    let mut outgoing: HashMap<usize, Vec<usize>> = HashMap::new();
    for (idx, &(a, _)) in edges.iter().enumerate() {
        outgoing.entry(a).or_default().push(idx);
    }

    let mut used = vec![false; edges.len()];
    let mut rings = Vec::new();
    for start in 0..edges.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let (first, mut current) = edges[start];
        let mut previous = first;
        let mut ring = vec![first];
        let mut closed = false;

        for _ in 0..edges.len() {
            if current == first {
                closed = true;
                break;
            }
            ring.push(current);
            let back = points[previous] - points[current];
            let next = outgoing.get(&current).and_then(|candidates| {
                candidates
                    .iter()
                    .copied()
                    .filter(|&e| !used[e])
                    .map(|e| {
                        let out = points[edges[e].1] - points[current];
                        let mut angle = cross(&out, &back).atan2(out.dot(&back));
                        if angle <= 0.0 {
                            angle += std::f64::consts::TAU;
                        }
                        (e, angle)
                    })
                    .min_by(|a, b| a.1.total_cmp(&b.1))
                    .map(|(e, _)| e)
            });
            let Some(e) = next else { break };
            used[e] = true;
            previous = current;
            current = edges[e].1;
        }

        if closed && ring.len() >= 3 {
            rings.push(Polygon::new(ring.into_iter().map(|i| points[i]).collect()));
        }
    }
    rings
}

/// Split rings into outers and holes and attach each hole to the smallest
/// outer ring that contains it.
fn assemble_regions(rings: Vec<Polygon>) -> Vec<HullRegion> {
    let (outers, holes): (Vec<Polygon>, Vec<Polygon>) =
        rings.into_iter().partition(|r| r.is_ccw());

    let mut regions: Vec<HullRegion> = outers.into_iter().map(HullRegion::from_polygon).collect();
    for hole in holes {
        let anchor = hole.points[0];
        let owner = regions
            .iter()
            .enumerate()
            .filter(|(_, r)| {
                r.outer.contains(&anchor) || r.outer.distance_to_boundary(&anchor) == 0.0
            })
            .min_by(|a, b| a.1.outer.area().total_cmp(&b.1.outer.area()))
            .map(|(i, _)| i);
        match owner {
            Some(i) => regions[i].push_hole(hole),
            None => debug!(area = hole.area(), "Dropping hole with no enclosing ring"),
        }
    }

    // Largest first; equal areas prefer the region holding the origin
    let origin = Point2::origin();
    regions.sort_by(|a, b| {
        b.area
            .total_cmp(&a.area)
            .then(b.contains(&origin).cmp(&a.contains(&origin)))
    });
    regions
}
