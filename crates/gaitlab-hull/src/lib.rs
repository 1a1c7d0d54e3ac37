#![warn(missing_docs)]

//! Concave boundaries of 2D point clouds.
//!
//! A Delaunay triangulation of the cloud is filtered by circumradius (the
//! alpha radius, a tenth of the cloud's extent unless fixed), and
//! the surviving triangles' outer edges are chained into polygons. The
//! result is one or more [`HullRegion`]s, each with an outer ring and any
//! number of holes; the largest is the primary region.
//!
//! # Example
//!
//! ```
//! use gaitlab_hull::{extract_concave_hull, HullSettings};
//! use gaitlab_math::Point2;
//!
//! let points: Vec<Point2> = (0..100)
//!     .map(|i| Point2::new((i % 10) as f64 + 0.01 * (i / 10) as f64, (i / 10) as f64))
//!     .collect();
//! let hull = extract_concave_hull(&points, &HullSettings::default()).unwrap();
//! assert!(hull.primary().unwrap().area > 60.0);
//! ```

pub mod alpha;
pub mod delaunay;
pub mod error;
pub mod polygon;
pub mod region;

pub use alpha::{extract_concave_hull, HullSettings};
pub use error::{HullError, Result};
pub use polygon::Polygon;
pub use region::{ConcaveHull, HullRegion};
