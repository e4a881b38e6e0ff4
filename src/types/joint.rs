//! Posable joints and the per-frame pose supplied by the host.

use crate::error::{Result, RigError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the five posable parts of the armor stand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Head,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
}

impl Joint {
    /// All joints, in the order the host's frame object lists them.
    pub const ALL: [Joint; 5] = [
        Joint::Head,
        Joint::LeftArm,
        Joint::RightArm,
        Joint::LeftLeg,
        Joint::RightLeg,
    ];

    /// Snake-case name, also used as the scene node identifier.
    pub fn name(&self) -> &'static str {
        match self {
            Joint::Head => "head",
            Joint::LeftArm => "left_arm",
            Joint::RightArm => "right_arm",
            Joint::LeftLeg => "left_leg",
            Joint::RightLeg => "right_leg",
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Joint {
    type Err = RigError;

    fn from_str(s: &str) -> Result<Self> {
        Joint::ALL
            .into_iter()
            .find(|joint| joint.name() == s)
            .ok_or_else(|| RigError::UnknownJoint(s.to_string()))
    }
}

/// Euler angles in degrees, applied as an intrinsic XYZ rotation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EulerDegrees {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl EulerDegrees {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Convert to radians, axis by axis.
    pub fn to_radians(&self) -> [f32; 3] {
        [
            super::to_radians(self.x),
            super::to_radians(self.y),
            super::to_radians(self.z),
        ]
    }
}

/// A full frame of joint rotations.
///
/// Every joint is required; a frame missing one fails to deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub head: EulerDegrees,
    pub left_arm: EulerDegrees,
    pub right_arm: EulerDegrees,
    pub left_leg: EulerDegrees,
    pub right_leg: EulerDegrees,
}

impl Pose {
    /// Parse a host frame object.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn get(&self, joint: Joint) -> EulerDegrees {
        match joint {
            Joint::Head => self.head,
            Joint::LeftArm => self.left_arm,
            Joint::RightArm => self.right_arm,
            Joint::LeftLeg => self.left_leg,
            Joint::RightLeg => self.right_leg,
        }
    }

    pub fn with_joint(mut self, joint: Joint, angles: EulerDegrees) -> Self {
        match joint {
            Joint::Head => self.head = angles,
            Joint::LeftArm => self.left_arm = angles,
            Joint::RightArm => self.right_arm = angles,
            Joint::LeftLeg => self.left_leg = angles,
            Joint::RightLeg => self.right_leg = angles,
        }
        self
    }
}
