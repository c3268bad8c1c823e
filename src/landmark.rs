//! Hand landmark types.
//!
//! Landmarks arrive from an external detector in normalized camera space
//! (`x` and `y` in roughly 0..1, origin top-left). The depth coordinate is kept
//! for completeness but nothing here reads it.
//!
//! A `HandPose` is one detected hand in the 21-joint topology used by common
//! hand trackers. It lives for one frame and is never retained.

use serde::Deserialize;

use crate::error::GestureError;

/// Number of landmarks in a full hand pose.
pub const HAND_LANDMARK_COUNT: usize = 21;

/// Semantic joint identities, in landmark order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandJoint {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl HandJoint {
    pub const ALL: [HandJoint; HAND_LANDMARK_COUNT] = [
        HandJoint::Wrist,
        HandJoint::ThumbCmc,
        HandJoint::ThumbMcp,
        HandJoint::ThumbIp,
        HandJoint::ThumbTip,
        HandJoint::IndexMcp,
        HandJoint::IndexPip,
        HandJoint::IndexDip,
        HandJoint::IndexTip,
        HandJoint::MiddleMcp,
        HandJoint::MiddlePip,
        HandJoint::MiddleDip,
        HandJoint::MiddleTip,
        HandJoint::RingMcp,
        HandJoint::RingPip,
        HandJoint::RingDip,
        HandJoint::RingTip,
        HandJoint::PinkyMcp,
        HandJoint::PinkyPip,
        HandJoint::PinkyDip,
        HandJoint::PinkyTip,
    ];

    /// Position of this joint in a pose.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            HandJoint::Wrist => "wrist",
            HandJoint::ThumbCmc => "thumb_cmc",
            HandJoint::ThumbMcp => "thumb_mcp",
            HandJoint::ThumbIp => "thumb_ip",
            HandJoint::ThumbTip => "thumb_tip",
            HandJoint::IndexMcp => "index_finger_mcp",
            HandJoint::IndexPip => "index_finger_pip",
            HandJoint::IndexDip => "index_finger_dip",
            HandJoint::IndexTip => "index_finger_tip",
            HandJoint::MiddleMcp => "middle_finger_mcp",
            HandJoint::MiddlePip => "middle_finger_pip",
            HandJoint::MiddleDip => "middle_finger_dip",
            HandJoint::MiddleTip => "middle_finger_tip",
            HandJoint::RingMcp => "ring_finger_mcp",
            HandJoint::RingPip => "ring_finger_pip",
            HandJoint::RingDip => "ring_finger_dip",
            HandJoint::RingTip => "ring_finger_tip",
            HandJoint::PinkyMcp => "pinky_mcp",
            HandJoint::PinkyPip => "pinky_pip",
            HandJoint::PinkyDip => "pinky_dip",
            HandJoint::PinkyTip => "pinky_tip",
        }
    }
}

/// One normalized keypoint.
///
/// Deserializes from `[x, y]`, `[x, y, z]` or `{"x": .., "y": .., "z": ..}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "PointRepr")]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Planar distance; depth is ignored.
    pub fn distance_2d(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PointRepr {
    Xyz([f32; 3]),
    Xy([f32; 2]),
    Named {
        x: f32,
        y: f32,
        #[serde(default)]
        z: f32,
    },
}

impl From<PointRepr> for Landmark {
    fn from(repr: PointRepr) -> Self {
        match repr {
            PointRepr::Xyz([x, y, z]) => Landmark { x, y, z },
            PointRepr::Xy([x, y]) => Landmark::new(x, y),
            PointRepr::Named { x, y, z } => Landmark { x, y, z },
        }
    }
}

/// Landmarks of one detected hand, ordered by `HandJoint`.
///
/// Construction does not validate; `validate` (called by the classifier)
/// rejects incomplete or non-finite poses.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct HandPose {
    landmarks: Vec<Landmark>,
}

impl HandPose {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn get(&self, joint: HandJoint) -> Option<&Landmark> {
        self.landmarks.get(joint.index())
    }

    /// Check that the pose is a complete, finite 21-point hand.
    pub fn validate(&self) -> Result<(), GestureError> {
        for joint in [HandJoint::ThumbTip, HandJoint::IndexTip] {
            if self.get(joint).is_none() {
                return Err(GestureError::invalid_pose(format!(
                    "missing {} landmark ({} of {} present)",
                    joint.name(),
                    self.len(),
                    HAND_LANDMARK_COUNT
                )));
            }
        }
        if self.len() != HAND_LANDMARK_COUNT {
            return Err(GestureError::invalid_pose(format!(
                "expected {} landmarks, got {}",
                HAND_LANDMARK_COUNT,
                self.len()
            )));
        }
        if let Some(joint) = HandJoint::ALL
            .iter()
            .find(|joint| !self.landmarks[joint.index()].is_finite())
        {
            return Err(GestureError::invalid_pose(format!(
                "{} has non-finite coordinates",
                joint.name()
            )));
        }
        Ok(())
    }

    /// Distance between thumb tip and index tip, if both are present.
    pub fn pinch_distance(&self) -> Option<f32> {
        let thumb = self.get(HandJoint::ThumbTip)?;
        let index = self.get(HandJoint::IndexTip)?;
        Some(thumb.distance_2d(index))
    }

    /// Mean x across all landmarks; a coarse horizontal hand position.
    ///
    /// Accumulated in f64 so a hand whose landmarks all sit on one x value
    /// averages to exactly that value.
    pub fn mean_x(&self) -> Option<f64> {
        if self.landmarks.is_empty() {
            return None;
        }
        let sum: f64 = self.landmarks.iter().map(|lm| f64::from(lm.x)).sum();
        Some(sum / self.landmarks.len() as f64)
    }
}

impl From<Vec<Landmark>> for HandPose {
    fn from(landmarks: Vec<Landmark>) -> Self {
        Self::new(landmarks)
    }
}
