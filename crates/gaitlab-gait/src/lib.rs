#![warn(missing_docs)]

//! Gait ellipse fitting.
//!
//! Given the primary region of a leg's workspace boundary, finds the
//! largest ellipse centred on the gravity axis (X = 0) that stays inside
//! it. The ellipse bounds a safe foot trajectory: its horizontal axis is
//! the stride, its vertical axis the step height.
//!
//! # Example
//!
//! ```
//! use gaitlab_gait::{scan_gait_ellipse, GaitSettings};
//! use gaitlab_hull::{HullRegion, Polygon};
//! use gaitlab_math::Point2;
//!
//! let region = HullRegion::from_polygon(Polygon::regular(Point2::origin(), 1.0, 128));
//! let ellipse = scan_gait_ellipse(&region, &GaitSettings::default()).unwrap();
//! assert!(ellipse.semi_minor > 0.95);
//! ```

pub mod ellipse;
pub mod error;
pub mod scan;

pub use ellipse::GaitEllipse;
pub use error::{GaitError, Result};
pub use scan::{scan_gait_ellipse, GaitSettings};
