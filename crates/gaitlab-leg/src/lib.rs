#![warn(missing_docs)]

//! Leg geometry models and forward kinematics for two-DOF leg mechanisms.
//!
//! A [`LegGeometry`] is built once from a plain [`LegParams`] record and
//! then answers per-sample questions: where does the foot go for a pair of
//! actuator angles, and is that pose reachable without the linkage hitting
//! itself.
//!
//! Four topologies are supported: an open serial chain, a coaxial
//! pantograph, and two five-bar loops that resolve their passive joint by
//! circle–circle intersection.
//!
//! # Example
//!
//! ```
//! use gaitlab_leg::{ActuatorAngles, LegGeometry, LegParams, Topology, Validity};
//!
//! let leg = LegGeometry::from_params(&LegParams::preset(Topology::FiveBarRear)).unwrap();
//! let pose = leg.forward_kinematics(ActuatorAngles::new(120.0, 60.0));
//! assert_ne!(pose.validity(), Validity::Unreachable);
//! ```

pub mod error;
pub mod geometry;
pub mod kinematics;
pub mod params;
pub mod pose;

pub use error::{LegError, Result};
pub use geometry::{FiveBar, LegGeometry, Linkage};
pub use params::{ActuatorBounds, LegOverride, LegParams, Topology};
pub use pose::{ActuatorAngles, FootPose, Joints, Validity};
