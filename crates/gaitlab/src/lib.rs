#![warn(missing_docs)]

//! gaitlab: workspace and gait-envelope analysis for two-DOF robotic legs.
//!
//! The pipeline runs four pure stages:
//!
//! 1. **Kinematics** ([`gaitlab_leg`]): actuator angles to foot position
//!    for serial, pantograph and five-bar legs.
//! 2. **Sampling** ([`gaitlab_workspace`]): an N×N actuator grid to a
//!    cloud of reachable foot positions.
//! 3. **Boundary** ([`gaitlab_hull`]): the cloud to concave polygons via
//!    an alpha shape.
//! 4. **Gait** ([`gaitlab_gait`]): the largest ellipse on the gravity axis
//!    inside the primary polygon.
//!
//! Configuration arrives as a [`LegCatalog`] keyed by architecture name,
//! optionally merged with an optimizer's override document. Interactive
//! hosts recompute through a [`Recomputer`] so that only the newest
//! request's result is ever published.
//!
//! # Example
//!
//! ```
//! use gaitlab::{analyze, AnalysisSettings, LegCatalog};
//!
//! let catalog = LegCatalog::presets();
//! let leg = catalog.geometry("serial").unwrap();
//! let analysis = analyze(&leg, &AnalysisSettings::with_resolution(30)).unwrap();
//! assert!(analysis.area() > 0.0);
//! ```

pub mod catalog;
pub mod error;
pub mod pipeline;
pub mod recompute;
pub mod report;

pub use catalog::{preset_name, LegCatalog, Overrides};
pub use error::{AnalysisError, Result};
pub use pipeline::{analyze, Analysis, AnalysisSettings};
pub use recompute::{Published, Recomputer, Ticket};
pub use report::{AnalysisReport, BoundaryReport, EllipseReport, RegionReport};

pub use gaitlab_gait::{GaitEllipse, GaitError, GaitSettings};
pub use gaitlab_hull::{ConcaveHull, HullError, HullRegion, HullSettings, Polygon};
pub use gaitlab_leg::{
    ActuatorAngles, ActuatorBounds, FootPose, Joints, LegError, LegGeometry, LegOverride,
    LegParams, Topology, Validity,
};
pub use gaitlab_math::{Chirality, Point2};
pub use gaitlab_workspace::{WorkspaceCloud, WorkspaceError, WorkspaceSettings};
