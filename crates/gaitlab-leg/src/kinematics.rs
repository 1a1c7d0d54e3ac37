//! Forward kinematics, self-collision checks and the serial inverse.

use gaitlab_math::{
    circle_intersection, distance_point_segment, polar, segment_distance, Chirality, Point2,
    Tolerance,
};

use crate::geometry::{LegGeometry, Linkage};
use crate::pose::{ActuatorAngles, FootPose, Joints};

/// Lowest thigh angle the pantograph frame allows, degrees.
pub const PANTOGRAPH_MIN_THIGH_DEG: f64 = 80.0;
/// Widest thigh/crank opening before the pantograph locks, degrees.
pub const PANTOGRAPH_MAX_OPENING_DEG: f64 = 170.0;
/// Minimum thigh/crank separation that keeps the knee from inverting, degrees.
pub const PANTOGRAPH_KNEE_MARGIN_DEG: f64 = 10.0;

/// Shortest shin direction vector treated as well defined.
const MIN_DIRECTION: f64 = 1e-9;

impl Linkage {
    /// Which circle–circle solution the passive joint takes.
    ///
    /// Fixed per architecture; open-chain legs never intersect circles.
    pub fn chirality(&self) -> Option<Chirality> {
        match self {
            Linkage::Serial { .. } | Linkage::Pantograph { .. } => None,
            Linkage::FiveBarFront(_) | Linkage::FiveBarRear(_) => Some(Chirality::Left),
        }
    }
}

impl LegGeometry {
    /// Foot position and validity for an angle pair in degrees.
    ///
    /// Angles outside the actuator bounds, and loops that cannot close, are
    /// [`FootPose::Unreachable`].
    pub fn forward_kinematics(&self, angles: ActuatorAngles) -> FootPose {
        let [b1, b2] = self.bounds();
        if !b1.contains(angles.theta1) || !b2.contains(angles.theta2) {
            return FootPose::Unreachable;
        }
        match self.joints(angles) {
            None => FootPose::Unreachable,
            Some(joints) if self.collides(&joints) => FootPose::SelfColliding(joints.foot()),
            Some(joints) => FootPose::Reachable(joints.foot()),
        }
    }

    /// Resolve every joint for an angle pair in degrees, ignoring bounds and
    /// collisions.
    ///
    /// Returns `None` when the closed loop has no solution.
    pub fn joints(&self, angles: ActuatorAngles) -> Option<Joints> {
        let t1 = (angles.theta1 + self.offsets[0]).to_radians();
        let t2 = (angles.theta2 + self.offsets[1]).to_radians();

        match &self.linkage {
            Linkage::Serial { base, thigh, shin } => {
                let knee = base + polar(*thigh, t1);
                let foot = knee + polar(*shin, t1 + t2);
                Some(Joints::Serial {
                    base: *base,
                    knee,
                    foot,
                })
            }
            Linkage::Pantograph {
                servo1,
                pivot,
                thigh,
                crank,
                shin,
            } => {
                let thigh_vec = polar(*thigh, t1);
                let knee = pivot + thigh_vec;
                let crank_tip = pivot + polar(*crank, t2);
                let mount = crank_tip + thigh_vec;
                let dir = mount - knee;
                let norm = dir.norm();
                if norm < MIN_DIRECTION {
                    return None;
                }
                let foot = knee + dir * (*shin / norm);
                Some(Joints::Pantograph {
                    servo1: *servo1,
                    pivot: *pivot,
                    knee,
                    crank_tip,
                    mount,
                    foot,
                })
            }
            Linkage::FiveBarFront(five) => {
                let [l1, l2, l3, l4, l5] = five.links;
                let a = five.servo1 + polar(l1, t1);
                let b = five.servo2 + polar(l2, t2);
                let c = circle_intersection(&a, l4, &b, l3).select(self.linkage.chirality()?)?;
                let foot = extend(&a, &c, l5)?;
                Some(Joints::FiveBarFront {
                    servo1: five.servo1,
                    servo2: five.servo2,
                    a,
                    b,
                    c,
                    foot,
                })
            }
            Linkage::FiveBarRear(five) => {
                let [l1, l2, l3, l4, l5] = five.links;
                let a = five.servo1 + polar(l1, t1);
                let c = five.servo2 + polar(l3, t2);
                let b = circle_intersection(&a, l2, &c, l4).select(self.linkage.chirality()?)?;
                let foot = extend(&b, &c, l5)?;
                Some(Joints::FiveBarRear {
                    servo1: five.servo1,
                    servo2: five.servo2,
                    a,
                    b,
                    c,
                    foot,
                })
            }
        }
    }

    /// Whether a resolved pose violates the architecture's clearance rules.
    pub fn collides(&self, joints: &Joints) -> bool {
        let threshold = self.collision_threshold();
        match *joints {
            Joints::Serial { base, foot, .. } => (foot - base).norm() < threshold,
            Joints::Pantograph {
                pivot,
                knee,
                crank_tip,
                ..
            } => {
                let thigh = knee - pivot;
                let crank = crank_tip - pivot;
                let thigh_deg = thigh.y.atan2(thigh.x).to_degrees();
                let crank_deg = crank.y.atan2(crank.x).to_degrees();
                thigh_deg < PANTOGRAPH_MIN_THIGH_DEG
                    || thigh_deg - crank_deg > PANTOGRAPH_MAX_OPENING_DEG
                    || crank_deg > thigh_deg - PANTOGRAPH_KNEE_MARGIN_DEG
            }
            Joints::FiveBarFront {
                servo1,
                servo2,
                a,
                b,
                c,
                foot,
            } => {
                let (s1a, s2b, ac, bc) = ((servo1, a), (servo2, b), (a, c), (b, c));
                five_bar_collides(
                    threshold,
                    [servo1, servo2],
                    &[s1a, s2b, ac, bc, (c, foot)],
                    &[(s1a, s2b), (s1a, bc), (s2b, ac)],
                )
            }
            Joints::FiveBarRear {
                servo1,
                servo2,
                a,
                b,
                c,
                foot,
            } => {
                let (s1a, s2c, ab, bc) = ((servo1, a), (servo2, c), (a, b), (b, c));
                five_bar_collides(
                    threshold,
                    [servo1, servo2],
                    &[s1a, s2c, ab, bc, (c, foot)],
                    &[(s1a, s2c), (s1a, bc), (s2c, ab)],
                )
            }
        }
    }

    /// Actuator angles (degrees) that put a serial leg's foot at `foot`.
    ///
    /// The knee is found by intersecting the thigh circle around the base
    /// with the shin circle around the foot; `chirality` picks the knee
    /// side. Returns `None` for other topologies or unreachable targets.
    pub fn serial_inverse(&self, foot: &Point2, chirality: Chirality) -> Option<ActuatorAngles> {
        let Linkage::Serial { base, thigh, shin } = &self.linkage else {
            return None;
        };
        let knee = circle_intersection(base, *thigh, foot, *shin).select(chirality)?;
        let upper = knee - base;
        let lower = foot - knee;
        let t1 = upper.y.atan2(upper.x);
        let t2 = wrap_pi(lower.y.atan2(lower.x) - t1);
        Some(ActuatorAngles::new(
            t1.to_degrees() - self.offsets[0],
            t2.to_degrees() - self.offsets[1],
        ))
    }
}

/// Point at distance `length` beyond `to`, along `from → to`.
fn extend(from: &Point2, to: &Point2, length: f64) -> Option<Point2> {
    let dir = to - from;
    let norm = dir.norm();
    if norm < MIN_DIRECTION {
        return None;
    }
    Some(to + dir * (length / norm))
}

fn wrap_pi(angle: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

type Segment = (Point2, Point2);

fn five_bar_collides(
    threshold: f64,
    servos: [Point2; 2],
    links: &[Segment],
    crossing_pairs: &[(Segment, Segment)],
) -> bool {
    let tol = Tolerance::DEFAULT;
    let hits_servo = |(p, q): &Segment, servo: &Point2| {
        // A crank always touches its own servo
        if tol.points_equal(p, servo) || tol.points_equal(q, servo) {
            return false;
        }
        distance_point_segment(servo, p, q) < threshold
    };
    if links
        .iter()
        .any(|seg| servos.iter().any(|servo| hits_servo(seg, servo)))
    {
        return true;
    }
    crossing_pairs
        .iter()
        .any(|((p, q), (r, s))| segment_distance(p, q, r, s) < threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{ActuatorBounds, LegParams, Topology};
    use crate::pose::Validity;
    use approx::assert_relative_eq;

    fn serial_leg() -> LegGeometry {
        LegGeometry::from_params(&LegParams {
            topology: Topology::Serial,
            links: vec![0.10, 0.10],
            mounts: Vec::new(),
            theta1: ActuatorBounds::new(0.0, 180.0),
            theta2: ActuatorBounds::new(-150.0, 0.0),
            angle_offsets: [0.0, 0.0],
            collision_threshold: 0.0,
        })
        .unwrap()
    }

    #[test]
    fn test_serial_right_angle_bend() {
        let leg = serial_leg();
        let pose = leg.forward_kinematics(ActuatorAngles::new(90.0, -90.0));
        assert_eq!(pose.validity(), Validity::Reachable);
        let foot = pose.reachable().unwrap();
        assert_relative_eq!(foot.x, 0.10, epsilon = 1e-12);
        assert_relative_eq!(foot.y, 0.10, epsilon = 1e-12);
        assert_relative_eq!(foot.coords.norm(), 0.10 * 2f64.sqrt(), epsilon = 1e-12);

        let Some(Joints::Serial { knee, .. }) = leg.joints(ActuatorAngles::new(90.0, -90.0)) else {
            panic!("serial leg should resolve");
        };
        // Thigh and shin meet at 90 degrees
        assert!((knee.coords.dot(&(foot - knee))).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_bounds_is_unreachable() {
        let leg = serial_leg();
        let pose = leg.forward_kinematics(ActuatorAngles::new(90.0, 10.0));
        assert_eq!(pose, FootPose::Unreachable);
        assert!(pose.position().is_none());
    }

    #[test]
    fn test_forward_kinematics_is_deterministic() {
        for topology in Topology::ALL {
            let leg = LegGeometry::from_params(&LegParams::preset(topology)).unwrap();
            for theta1 in [10.0, 60.0, 95.0, 140.0] {
                for theta2 in leg.bounds()[1].samples(7) {
                    let angles = ActuatorAngles::new(theta1, theta2);
                    let first = leg.forward_kinematics(angles);
                    let second = leg.forward_kinematics(angles);
                    match (first.position(), second.position()) {
                        (Some(p), Some(q)) => {
                            assert_eq!(p.x.to_bits(), q.x.to_bits());
                            assert_eq!(p.y.to_bits(), q.y.to_bits());
                        }
                        (None, None) => {}
                        _ => panic!("{topology:?} disagreed with itself at {angles:?}"),
                    }
                    assert_eq!(first.validity(), second.validity());
                }
            }
        }
    }

    #[test]
    fn test_serial_round_trip() {
        let leg = serial_leg();
        for &(theta1, theta2) in &[(30.0, -45.0), (90.0, -90.0), (150.0, -20.0), (60.0, -140.0)] {
            let foot = leg
                .forward_kinematics(ActuatorAngles::new(theta1, theta2))
                .reachable()
                .unwrap();
            // Negative knee angles bend the knee to the right of base → foot
            let angles = leg.serial_inverse(&foot, Chirality::Left).unwrap();
            let back = leg.forward_kinematics(angles).reachable().unwrap();
            assert!((back - foot).norm() < 1e-9, "{theta1} {theta2}");
            assert_relative_eq!(angles.theta1, theta1, epsilon = 1e-6);
            assert_relative_eq!(angles.theta2, theta2, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_serial_inverse_outside_annulus() {
        let leg = serial_leg();
        assert!(leg.serial_inverse(&Point2::new(0.5, 0.0), Chirality::Left).is_none());
    }

    #[test]
    fn test_serial_foot_on_base_collides() {
        let mut params = LegParams::preset(Topology::Serial);
        params.links = vec![50.0, 50.0];
        let leg = LegGeometry::from_params(&params).unwrap();
        // Shin folded straight back onto the thigh
        let pose = leg.forward_kinematics(ActuatorAngles::new(90.0, -180.0));
        assert_eq!(pose.validity(), Validity::SelfColliding);
        assert!(pose.position().is_some());
    }

    #[test]
    fn test_pantograph_shin_parallel_to_crank() {
        let leg = LegGeometry::from_params(&LegParams::preset(Topology::Pantograph)).unwrap();
        let Some(Joints::Pantograph {
            pivot,
            knee,
            crank_tip,
            foot,
            ..
        }) = leg.joints(ActuatorAngles::new(120.0, 30.0))
        else {
            panic!("pantograph should resolve");
        };
        let crank = (crank_tip - pivot).normalize();
        let shin = (foot - knee).normalize();
        assert!((crank - shin).norm() < 1e-12);
        assert_relative_eq!((foot - knee).norm(), 95.0, epsilon = 1e-9);
        assert_eq!(
            leg.forward_kinematics(ActuatorAngles::new(120.0, 30.0)).validity(),
            Validity::Reachable
        );
    }

    #[test]
    fn test_pantograph_interlocks() {
        let leg = LegGeometry::from_params(&LegParams::preset(Topology::Pantograph)).unwrap();
        // Thigh below its floor
        assert_eq!(
            leg.forward_kinematics(ActuatorAngles::new(45.0, 10.0)).validity(),
            Validity::SelfColliding
        );
        // Crank past the thigh (knee inversion)
        assert_eq!(
            leg.forward_kinematics(ActuatorAngles::new(100.0, 95.0)).validity(),
            Validity::SelfColliding
        );
    }

    #[test]
    fn test_five_bar_closes_loop() {
        for topology in [Topology::FiveBarFront, Topology::FiveBarRear] {
            let leg = LegGeometry::from_params(&LegParams::preset(topology)).unwrap();
            let angles = ActuatorAngles::new(120.0, 60.0);
            let joints = leg.joints(angles).expect("preset five-bar closes at 120/60");
            let l = &leg.params().links;
            match joints {
                Joints::FiveBarFront { a, b, c, foot, .. } => {
                    assert_relative_eq!((c - a).norm(), l[3], epsilon = 1e-9);
                    assert_relative_eq!((c - b).norm(), l[2], epsilon = 1e-9);
                    assert_relative_eq!((foot - c).norm(), l[4], epsilon = 1e-9);
                }
                Joints::FiveBarRear { a, b, c, foot, .. } => {
                    assert_relative_eq!((b - a).norm(), l[1], epsilon = 1e-9);
                    assert_relative_eq!((b - c).norm(), l[3], epsilon = 1e-9);
                    assert_relative_eq!((foot - c).norm(), l[4], epsilon = 1e-9);
                }
                other => panic!("unexpected joints {other:?}"),
            }
        }
    }

    #[test]
    fn test_five_bar_open_loop_is_unreachable() {
        let mut params = LegParams::preset(Topology::FiveBarRear);
        params.mounts = vec![[-30.0, 0.0], [30.0, 0.0]];
        params.links = vec![20.0, 30.0, 20.0, 30.0, 60.0];
        let leg = LegGeometry::from_params(&params).unwrap();
        // Cranks pointing away from each other: tips 100 apart, passive pair spans 60
        let pose = leg.forward_kinematics(ActuatorAngles::new(180.0, 0.0));
        assert_eq!(pose, FootPose::Unreachable);
    }

    #[test]
    fn test_five_bar_link_over_servo_collides() {
        let mut params = LegParams::preset(Topology::FiveBarFront);
        params.mounts = vec![[-20.0, 0.0], [20.0, 0.0]];
        params.links = vec![50.0, 30.0, 45.0, 45.0, 60.0];
        params.collision_threshold = 5.0;
        let leg = LegGeometry::from_params(&params).unwrap();
        // Actuator 1 crank swung straight across actuator 2's axis
        let joints = leg.joints(ActuatorAngles::new(0.0, 90.0)).unwrap();
        assert!(leg.collides(&joints));
        let relaxed = ActuatorAngles::new(120.0, 60.0);
        let joints = leg.joints(relaxed).unwrap();
        assert!(!leg.collides(&joints));
    }

    #[test]
    fn test_calibration_offsets_shift_angles() {
        let mut params = LegParams::preset(Topology::Serial);
        params.angle_offsets = [10.0, 0.0];
        let shifted = LegGeometry::from_params(&params).unwrap();
        let plain = LegGeometry::from_params(&LegParams::preset(Topology::Serial)).unwrap();
        let a = shifted.forward_kinematics(ActuatorAngles::new(80.0, -60.0));
        let b = plain.forward_kinematics(ActuatorAngles::new(90.0, -60.0));
        assert!((a.position().unwrap() - b.position().unwrap()).norm() < 1e-9);
    }

    #[test]
    fn test_wrap_pi() {
        use std::f64::consts::{FRAC_PI_2, PI};
        assert_relative_eq!(wrap_pi(3.0 * PI / 2.0), -FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(wrap_pi(-0.5), -0.5, epsilon = 1e-12);
    }
}
