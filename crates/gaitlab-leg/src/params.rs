//! Plain parameter records for leg architectures.
//!
//! These are the values an external configuration loader hands over. They
//! carry no invariants of their own; [`LegGeometry::from_params`] validates
//! them.
//!
//! [`LegGeometry::from_params`]: crate::LegGeometry::from_params

use serde::{Deserialize, Serialize};

/// Supported leg mechanism topologies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Open chain: thigh then shin.
    Serial,
    /// Coaxial four-bar with the shin kept parallel to the crank.
    Pantograph,
    /// Five-bar loop closing at the foot-side joint C, foot extends A→C.
    FiveBarFront,
    /// Five-bar loop closing at the passive joint B, foot extends B→C.
    FiveBarRear,
}

impl Topology {
    /// Every supported topology.
    pub const ALL: [Topology; 4] = [
        Topology::Serial,
        Topology::Pantograph,
        Topology::FiveBarFront,
        Topology::FiveBarRear,
    ];

    /// Names of the link lengths, in the order [`LegParams::links`] lists them.
    pub fn link_names(&self) -> &'static [&'static str] {
        match self {
            Topology::Serial => &["thigh", "shin"],
            Topology::Pantograph => &["thigh", "crank", "shin"],
            Topology::FiveBarFront => &["s1_a", "s2_b", "b_c", "a_c", "extension"],
            Topology::FiveBarRear => &["s1_a", "a_b", "s2_c", "b_c", "extension"],
        }
    }

    /// Names of the mounting offsets, in the order [`LegParams::mounts`] lists them.
    pub fn mount_names(&self) -> &'static [&'static str] {
        match self {
            Topology::Serial => &["base"],
            Topology::Pantograph | Topology::FiveBarFront | Topology::FiveBarRear => &["s1", "s2"],
        }
    }
}

/// Closed range of one actuator, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActuatorBounds {
    /// Lower bound in degrees.
    pub min: f64,
    /// Upper bound in degrees.
    pub max: f64,
}

impl ActuatorBounds {
    /// Create bounds from `min` to `max` degrees.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Width of the range in degrees.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Whether `angle` (degrees) lies within the bounds.
    pub fn contains(&self, angle: f64) -> bool {
        const SLACK: f64 = 1e-9;
        angle >= self.min - SLACK && angle <= self.max + SLACK
    }

    /// `n` evenly spaced angles from `min` to `max` inclusive.
    pub fn samples(&self, n: usize) -> Vec<f64> {
        match n {
            0 => Vec::new(),
            1 => vec![self.min],
            _ => {
                let step = self.span() / (n - 1) as f64;
                (0..n)
                    .map(|i| if i == n - 1 { self.max } else { self.min + step * i as f64 })
                    .collect()
            }
        }
    }
}

/// Parameter record for one leg architecture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegParams {
    /// Mechanism topology.
    pub topology: Topology,
    /// Link lengths, ordered as [`Topology::link_names`].
    pub links: Vec<f64>,
    /// Mounting offsets `[x, y]`, ordered as [`Topology::mount_names`].
    /// Empty means every mount sits at the origin.
    #[serde(default)]
    pub mounts: Vec<[f64; 2]>,
    /// Bounds of actuator 1, degrees.
    pub theta1: ActuatorBounds,
    /// Bounds of actuator 2, degrees.
    pub theta2: ActuatorBounds,
    /// Calibration offsets added to each actuator angle, degrees.
    #[serde(default)]
    pub angle_offsets: [f64; 2],
    /// Clearance below which links are considered to collide.
    #[serde(default)]
    pub collision_threshold: f64,
}

impl LegParams {
    /// Built-in parameters for a topology, in millimetres.
    pub fn preset(topology: Topology) -> Self {
        let full = ActuatorBounds::new(0.0, 180.0);
        let servos = vec![[-15.0, -10.0], [0.0, 0.0]];
        match topology {
            Topology::Serial => Self {
                topology,
                links: vec![50.0, 95.0],
                mounts: vec![[0.0, 0.0]],
                theta1: full,
                theta2: ActuatorBounds::new(-180.0, 0.0),
                angle_offsets: [0.0, 0.0],
                collision_threshold: 10.0,
            },
            Topology::Pantograph => Self {
                topology,
                links: vec![95.0, 10.0, 95.0],
                mounts: servos,
                theta1: full,
                theta2: full,
                angle_offsets: [0.0, 0.0],
                collision_threshold: 10.0,
            },
            Topology::FiveBarFront => Self {
                topology,
                links: vec![45.0, 45.0, 50.0, 45.0, 95.0],
                mounts: servos,
                theta1: full,
                theta2: full,
                angle_offsets: [0.0, 0.0],
                collision_threshold: 10.0,
            },
            Topology::FiveBarRear => Self {
                topology,
                links: vec![45.0, 45.0, 50.0, 45.0, 95.0],
                mounts: servos,
                theta1: full,
                theta2: full,
                angle_offsets: [0.0, 0.0],
                collision_threshold: 10.0,
            },
        }
    }

    /// Apply an override on top of these parameters.
    ///
    /// The result still has to pass [`LegGeometry::from_params`].
    ///
    /// [`LegGeometry::from_params`]: crate::LegGeometry::from_params
    pub fn with_override(&self, over: &LegOverride) -> Self {
        let mut params = self.clone();
        if let Some(links) = &over.links {
            params.links = links.clone();
        }
        if let Some(mounts) = &over.mounts {
            params.mounts = mounts.clone();
        }
        if let Some(theta1) = over.theta1 {
            params.theta1 = theta1;
        }
        if let Some(theta2) = over.theta2 {
            params.theta2 = theta2;
        }
        if let Some(offsets) = over.angle_offsets {
            params.angle_offsets = offsets;
        }
        if let Some(threshold) = over.collision_threshold {
            params.collision_threshold = threshold;
        }
        params
    }
}

/// Partial parameter set, e.g. from an optimizer's output file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegOverride {
    /// Replacement link lengths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<f64>>,
    /// Replacement mounting offsets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mounts: Option<Vec<[f64; 2]>>,
    /// Replacement actuator 1 bounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theta1: Option<ActuatorBounds>,
    /// Replacement actuator 2 bounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theta2: Option<ActuatorBounds>,
    /// Replacement calibration offsets, degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle_offsets: Option<[f64; 2]>,
    /// Replacement collision threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collision_threshold: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_inclusive() {
        let bounds = ActuatorBounds::new(0.0, 180.0);
        let s = bounds.samples(5);
        assert_eq!(s, vec![0.0, 45.0, 90.0, 135.0, 180.0]);
        assert_eq!(bounds.samples(1), vec![0.0]);
        assert!(bounds.samples(0).is_empty());
    }

    #[test]
    fn test_coarse_samples_nest_in_fine() {
        let bounds = ActuatorBounds::new(-150.0, 0.0);
        let coarse = bounds.samples(7);
        let fine = bounds.samples(13);
        for (i, angle) in coarse.iter().enumerate() {
            assert!((fine[2 * i] - angle).abs() < 1e-9);
        }
    }

    #[test]
    fn test_contains() {
        let bounds = ActuatorBounds::new(-150.0, 0.0);
        assert!(bounds.contains(-90.0));
        assert!(bounds.contains(0.0));
        assert!(!bounds.contains(1.0));
    }

    #[test]
    fn test_presets_match_link_names() {
        for topology in Topology::ALL {
            let params = LegParams::preset(topology);
            assert_eq!(params.links.len(), topology.link_names().len());
            assert_eq!(params.mounts.len(), topology.mount_names().len());
        }
    }

    #[test]
    fn test_override_merge() {
        let base = LegParams::preset(Topology::FiveBarRear);
        let over: LegOverride = serde_json::from_str(
            r#"{ "links": [40, 50, 55, 50, 90], "angle_offsets": [10, -5] }"#,
        )
        .unwrap();
        let merged = base.with_override(&over);
        assert_eq!(merged.links, vec![40.0, 50.0, 55.0, 50.0, 90.0]);
        assert_eq!(merged.angle_offsets, [10.0, -5.0]);
        assert_eq!(merged.mounts, base.mounts);
        assert_eq!(merged.theta1, base.theta1);
    }

    #[test]
    fn test_params_json_defaults() {
        let params: LegParams = serde_json::from_str(
            r#"{
                "topology": "serial",
                "links": [0.1, 0.1],
                "theta1": { "min": 0, "max": 180 },
                "theta2": { "min": -150, "max": 0 }
            }"#,
        )
        .unwrap();
        assert_eq!(params.topology, Topology::Serial);
        assert!(params.mounts.is_empty());
        assert_eq!(params.collision_threshold, 0.0);
    }
}
