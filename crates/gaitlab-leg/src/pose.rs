//! Per-sample kinematic values: actuator inputs, foot outcome, joint layout.

use gaitlab_math::Point2;
use serde::{Deserialize, Serialize};

/// A pair of actuator angles, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActuatorAngles {
    /// Actuator 1 angle, degrees.
    pub theta1: f64,
    /// Actuator 2 angle, degrees.
    pub theta2: f64,
}

impl ActuatorAngles {
    /// Create an angle pair, in degrees.
    pub fn new(theta1: f64, theta2: f64) -> Self {
        Self { theta1, theta2 }
    }
}

/// Validity tag of a foot pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validity {
    /// The foot can be placed here.
    Reachable,
    /// The loop cannot close, or the angles are out of bounds.
    Unreachable,
    /// The mechanism closes but its links hit each other or the mounts.
    SelfColliding,
}

/// Result of forward kinematics for one angle pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FootPose {
    /// Valid foot position.
    Reachable(Point2),
    /// Foot position the mechanism could only reach through a collision.
    SelfColliding(Point2),
    /// No foot position exists for this angle pair.
    Unreachable,
}

impl FootPose {
    /// Validity tag of this pose.
    pub fn validity(&self) -> Validity {
        match self {
            FootPose::Reachable(_) => Validity::Reachable,
            FootPose::SelfColliding(_) => Validity::SelfColliding,
            FootPose::Unreachable => Validity::Unreachable,
        }
    }

    /// Foot position, if the mechanism closes at all.
    pub fn position(&self) -> Option<Point2> {
        match self {
            FootPose::Reachable(p) | FootPose::SelfColliding(p) => Some(*p),
            FootPose::Unreachable => None,
        }
    }

    /// Foot position, only when reachable.
    pub fn reachable(&self) -> Option<Point2> {
        match self {
            FootPose::Reachable(p) => Some(*p),
            _ => None,
        }
    }
}

/// Resolved joint positions of one pose.
///
/// Mount points come first in each variant, the foot last.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Joints {
    /// Base → knee → foot.
    Serial {
        /// Hip actuator axis.
        base: Point2,
        /// Knee joint.
        knee: Point2,
        /// Foot tip.
        foot: Point2,
    },
    /// Coaxial parallelogram around the S2 pivot.
    Pantograph {
        /// Actuator 1 housing (drives the thigh through a rod).
        servo1: Point2,
        /// Shared thigh/crank pivot at actuator 2.
        pivot: Point2,
        /// Thigh end.
        knee: Point2,
        /// Crank end.
        crank_tip: Point2,
        /// Top of the shin, closing the parallelogram.
        mount: Point2,
        /// Foot tip.
        foot: Point2,
    },
    /// Front-drive five-bar: S1→A→C and S2→B→C, foot extends A→C.
    FiveBarFront {
        /// Actuator 1 axis.
        servo1: Point2,
        /// Actuator 2 axis.
        servo2: Point2,
        /// End of the actuator 1 crank.
        a: Point2,
        /// End of the actuator 2 crank.
        b: Point2,
        /// Passive joint closing the loop.
        c: Point2,
        /// Foot tip.
        foot: Point2,
    },
    /// Rear-drive five-bar: S1→A→B and S2→C→B, foot extends B→C.
    FiveBarRear {
        /// Actuator 1 axis.
        servo1: Point2,
        /// Actuator 2 axis.
        servo2: Point2,
        /// End of the actuator 1 crank.
        a: Point2,
        /// Passive joint closing the loop.
        b: Point2,
        /// End of the actuator 2 crank.
        c: Point2,
        /// Foot tip.
        foot: Point2,
    },
}

impl Joints {
    /// Foot position.
    pub fn foot(&self) -> Point2 {
        match self {
            Joints::Serial { foot, .. }
            | Joints::Pantograph { foot, .. }
            | Joints::FiveBarFront { foot, .. }
            | Joints::FiveBarRear { foot, .. } => *foot,
        }
    }

    /// Physical link segments of the pose.
    pub fn links(&self) -> Vec<(Point2, Point2)> {
        match *self {
            Joints::Serial { base, knee, foot } => vec![(base, knee), (knee, foot)],
            Joints::Pantograph {
                pivot,
                knee,
                crank_tip,
                mount,
                foot,
                ..
            } => vec![
                (pivot, knee),
                (pivot, crank_tip),
                (crank_tip, mount),
                (mount, foot),
            ],
            Joints::FiveBarFront {
                servo1,
                servo2,
                a,
                b,
                c,
                foot,
            } => vec![(servo1, a), (servo2, b), (a, c), (b, c), (c, foot)],
            Joints::FiveBarRear {
                servo1,
                servo2,
                a,
                b,
                c,
                foot,
            } => vec![(servo1, a), (servo2, c), (a, b), (b, c), (c, foot)],
        }
    }
}
