//! Validated leg geometry.

use gaitlab_math::Point2;

use crate::error::{LegError, Result};
use crate::params::{ActuatorBounds, LegParams, Topology};

/// Link lengths and pivots of one mechanism, resolved per topology.
#[derive(Debug, Clone, PartialEq)]
pub enum Linkage {
    /// Open chain.
    Serial {
        /// Hip actuator axis.
        base: Point2,
        /// Base → knee.
        thigh: f64,
        /// Knee → foot.
        shin: f64,
    },
    /// Coaxial pantograph.
    Pantograph {
        /// Actuator 1 housing.
        servo1: Point2,
        /// Shared pivot at actuator 2.
        pivot: Point2,
        /// Pivot → knee.
        thigh: f64,
        /// Pivot → crank tip.
        crank: f64,
        /// Knee → foot.
        shin: f64,
    },
    /// Front-drive five-bar.
    FiveBarFront(FiveBar),
    /// Rear-drive five-bar.
    FiveBarRear(FiveBar),
}

/// Five-bar dimensions, named by position in [`Topology::link_names`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiveBar {
    /// Actuator 1 axis.
    pub servo1: Point2,
    /// Actuator 2 axis.
    pub servo2: Point2,
    /// Link 1..=5 lengths.
    pub links: [f64; 5],
}

impl FiveBar {
    /// Distance between the two actuator axes.
    pub fn servo_spacing(&self) -> f64 {
        (self.servo2 - self.servo1).norm()
    }
}

/// Immutable, validated description of one leg.
///
/// Built only through [`LegGeometry::from_params`]; an edit produces a new
/// value.
#[derive(Debug, Clone, PartialEq)]
pub struct LegGeometry {
    pub(crate) params: LegParams,
    pub(crate) linkage: Linkage,
    pub(crate) offsets: [f64; 2],
}

impl LegGeometry {
    /// Validate a parameter record and build the geometry.
    pub fn from_params(params: &LegParams) -> Result<Self> {
        let topology = params.topology;
        let names = topology.link_names();
        if params.links.len() != names.len() {
            return Err(LegError::LinkCount {
                topology,
                expected: names.len(),
                got: params.links.len(),
            });
        }
        for (&name, &value) in names.iter().zip(&params.links) {
            if !value.is_finite() {
                return Err(LegError::NonFinite(name));
            }
            if value <= 0.0 {
                return Err(LegError::NonPositiveLink { name, value });
            }
        }

        let mount_names = topology.mount_names();
        let mounts: Vec<Point2> = if params.mounts.is_empty() {
            vec![Point2::origin(); mount_names.len()]
        } else if params.mounts.len() == mount_names.len() {
            for (&name, m) in mount_names.iter().zip(&params.mounts) {
                if !(m[0].is_finite() && m[1].is_finite()) {
                    return Err(LegError::NonFinite(name));
                }
            }
            params.mounts.iter().map(|m| Point2::new(m[0], m[1])).collect()
        } else {
            return Err(LegError::MountCount {
                topology,
                expected: mount_names.len(),
                got: params.mounts.len(),
            });
        };

        check_bounds(1, &params.theta1)?;
        check_bounds(2, &params.theta2)?;
        if !(params.angle_offsets[0].is_finite() && params.angle_offsets[1].is_finite()) {
            return Err(LegError::NonFinite("angle_offsets"));
        }
        if !params.collision_threshold.is_finite() {
            return Err(LegError::NonFinite("collision_threshold"));
        }
        if params.collision_threshold < 0.0 {
            return Err(LegError::InvalidThreshold(params.collision_threshold));
        }

        let l = &params.links;
        let linkage = match topology {
            Topology::Serial => Linkage::Serial {
                base: mounts[0],
                thigh: l[0],
                shin: l[1],
            },
            Topology::Pantograph => Linkage::Pantograph {
                servo1: mounts[0],
                pivot: mounts[1],
                thigh: l[0],
                crank: l[1],
                shin: l[2],
            },
            Topology::FiveBarFront | Topology::FiveBarRear => {
                let five = FiveBar {
                    servo1: mounts[0],
                    servo2: mounts[1],
                    links: [l[0], l[1], l[2], l[3], l[4]],
                };
                if topology == Topology::FiveBarFront {
                    Linkage::FiveBarFront(five)
                } else {
                    Linkage::FiveBarRear(five)
                }
            }
        };

        let geometry = Self {
            params: params.clone(),
            linkage,
            offsets: params.angle_offsets,
        };
        geometry.check_feasible()?;
        Ok(geometry)
    }

    /// Topology of this leg.
    pub fn topology(&self) -> Topology {
        self.params.topology
    }

    /// Parameter record this geometry was built from.
    pub fn params(&self) -> &LegParams {
        &self.params
    }

    /// Resolved linkage.
    pub fn linkage(&self) -> &Linkage {
        &self.linkage
    }

    /// Bounds of actuator 1 and actuator 2.
    pub fn bounds(&self) -> [ActuatorBounds; 2] {
        [self.params.theta1, self.params.theta2]
    }

    /// Link clearance below which a pose counts as self-colliding.
    pub fn collision_threshold(&self) -> f64 {
        self.params.collision_threshold
    }

    fn infeasible(&self, reason: impl Into<String>) -> LegError {
        LegError::Infeasible {
            topology: self.topology(),
            reason: reason.into(),
        }
    }

    /// Check the topology's loop constraints can hold somewhere in range.
    fn check_feasible(&self) -> Result<()> {
        match &self.linkage {
            Linkage::Serial { thigh, shin, .. } => {
                if self.collision_threshold() >= thigh + shin {
                    return Err(self.infeasible(
                        "collision threshold exceeds the full leg reach",
                    ));
                }
            }
            Linkage::Pantograph { .. } => {
                let [b1, b2] = self.bounds();
                let thigh_max = b1.max + self.offsets[0];
                let thigh_min = b1.min + self.offsets[0];
                let crank_max = b2.max + self.offsets[1];
                let crank_min = b2.min + self.offsets[1];
                if thigh_max < crate::kinematics::PANTOGRAPH_MIN_THIGH_DEG {
                    return Err(self.infeasible("thigh can never rise above its floor angle"));
                }
                if thigh_max - crank_min < crate::kinematics::PANTOGRAPH_KNEE_MARGIN_DEG
                    || thigh_min - crank_max > crate::kinematics::PANTOGRAPH_MAX_OPENING_DEG
                {
                    return Err(self.infeasible(
                        "actuator ranges never open the parallelogram within its limits",
                    ));
                }
            }
            Linkage::FiveBarFront(five) => {
                let [l1, l2, l3, l4, _] = five.links;
                self.check_loop(five, l1, l2, l4, l3)?;
            }
            Linkage::FiveBarRear(five) => {
                let [l1, l2, l3, l4, _] = five.links;
                self.check_loop(five, l1, l3, l2, l4)?;
            }
        }
        Ok(())
    }

    /// The loop closes only if the passive pair `(p, q)` can span some
    /// distance between the two crank tips (radii `r1` around S1, `r2`
    /// around S2).
    fn check_loop(&self, five: &FiveBar, r1: f64, r2: f64, p: f64, q: f64) -> Result<()> {
        let d0 = five.servo_spacing();
        let span_max = d0 + r1 + r2;
        let span_min = (d0 - r1 - r2).max(r1 - d0 - r2).max(r2 - d0 - r1).max(0.0);
        if p + q < span_min {
            return Err(self.infeasible(format!(
                "passive links ({p} + {q}) cannot bridge the minimum crank gap {span_min}"
            )));
        }
        if (p - q).abs() > span_max {
            return Err(self.infeasible(format!(
                "passive link mismatch |{p} - {q}| exceeds the maximum crank gap {span_max}"
            )));
        }
        Ok(())
    }
}

fn check_bounds(actuator: u8, bounds: &ActuatorBounds) -> Result<()> {
    if !(bounds.min.is_finite() && bounds.max.is_finite()) {
        return Err(LegError::NonFinite(if actuator == 1 { "theta1" } else { "theta2" }));
    }
    if bounds.min > bounds.max {
        return Err(LegError::InvalidBounds {
            actuator,
            min: bounds.min,
            max: bounds.max,
        });
    }
    Ok(())
}
