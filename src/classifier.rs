//! Geometric gesture classification.
//!
//! One pose in, one `Gesture` out. Two signals are derived per frame:
//! - pinch distance: planar distance between thumb tip and index tip
//! - hand x: mean x over all landmarks
//!
//! A pinch wins over position. Position rules depend on `ZoneLayout`.

use serde::Deserialize;

use crate::error::GestureError;
use crate::gesture::Gesture;
use crate::landmark::HandPose;

pub const DEFAULT_PINCH_THRESHOLD: f32 = 0.1;
pub const DEFAULT_LEFT_THRESHOLD: f32 = 0.2;
pub const DEFAULT_RIGHT_THRESHOLD: f32 = 0.8;
pub const DEFAULT_COOLDOWN_FRAMES: u32 = 7;

/// How hand x maps to `Rewind` / `Forward`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneLayout {
    /// `x > left` is `Rewind`, else `x < right` is `Forward`, else `Nop`.
    ///
    /// With `left < right` the two rules cover the whole frame, so `Nop` is
    /// never produced and everything right of `left` is `Rewind`.
    #[default]
    Legacy,
    /// `x < left` is `Rewind`, `x > right` is `Forward`, the band between is
    /// a dead zone (`Nop`).
    Banded,
}

/// Classifier thresholds and the cooldown used by the matching debouncer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassifierConfig {
    /// Pinch distance, normalized units. Must be > 0.
    pub pinch_threshold: f32,
    /// Normalized x bound, `0 <= left < right`.
    pub left_threshold: f32,
    /// Normalized x bound, `left < right <= 1`.
    pub right_threshold: f32,
    /// Frames suppressed after each emitted gesture.
    pub cooldown_frames: u32,
    pub zone_layout: ZoneLayout,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: DEFAULT_PINCH_THRESHOLD,
            left_threshold: DEFAULT_LEFT_THRESHOLD,
            right_threshold: DEFAULT_RIGHT_THRESHOLD,
            cooldown_frames: DEFAULT_COOLDOWN_FRAMES,
            zone_layout: ZoneLayout::Legacy,
        }
    }
}

impl ClassifierConfig {
    /// Build and validate a legacy-layout config.
    pub fn new(
        pinch_threshold: f32,
        left_threshold: f32,
        right_threshold: f32,
        cooldown_frames: u32,
    ) -> Result<Self, GestureError> {
        let cfg = Self {
            pinch_threshold,
            left_threshold,
            right_threshold,
            cooldown_frames,
            zone_layout: ZoneLayout::Legacy,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn with_zone_layout(mut self, zone_layout: ZoneLayout) -> Self {
        self.zone_layout = zone_layout;
        self
    }

    pub fn validate(&self) -> Result<(), GestureError> {
        if !self.pinch_threshold.is_finite() || self.pinch_threshold <= 0.0 {
            return Err(GestureError::invalid_config(
                "pinch_threshold",
                format!("must be greater than zero (got {})", self.pinch_threshold),
            ));
        }
        if !self.left_threshold.is_finite() || self.left_threshold < 0.0 {
            return Err(GestureError::invalid_config(
                "left_threshold",
                format!("must be within 0..1 (got {})", self.left_threshold),
            ));
        }
        if !self.right_threshold.is_finite() || self.right_threshold > 1.0 {
            return Err(GestureError::invalid_config(
                "right_threshold",
                format!("must be within 0..1 (got {})", self.right_threshold),
            ));
        }
        if self.left_threshold >= self.right_threshold {
            return Err(GestureError::invalid_config(
                "left_threshold",
                format!(
                    "must be below right_threshold ({} >= {})",
                    self.left_threshold, self.right_threshold
                ),
            ));
        }
        Ok(())
    }
}

/// Classify one pose.
///
/// Validates both inputs; prefer `GestureClassifier` when the config is
/// fixed for a whole stream.
pub fn classify(pose: &HandPose, config: &ClassifierConfig) -> Result<Gesture, GestureError> {
    config.validate()?;
    classify_validated(pose, config)
}

fn classify_validated(pose: &HandPose, config: &ClassifierConfig) -> Result<Gesture, GestureError> {
    pose.validate()?;
    let (Some(pinch_distance), Some(hand_x)) = (pose.pinch_distance(), pose.mean_x()) else {
        return Err(GestureError::invalid_pose("pose has no landmarks"));
    };

    if pinch_distance < config.pinch_threshold {
        return Ok(Gesture::TogglePlay);
    }

    let left = f64::from(config.left_threshold);
    let right = f64::from(config.right_threshold);
    let gesture = match config.zone_layout {
        ZoneLayout::Legacy => {
            if hand_x > left {
                Gesture::Rewind
            } else if hand_x < right {
                Gesture::Forward
            } else {
                Gesture::Nop
            }
        }
        ZoneLayout::Banded => {
            if hand_x < left {
                Gesture::Rewind
            } else if hand_x > right {
                Gesture::Forward
            } else {
                Gesture::Nop
            }
        }
    };
    Ok(gesture)
}

/// Stateless classifier bound to a validated config.
#[derive(Clone, Debug)]
pub struct GestureClassifier {
    config: ClassifierConfig,
}

impl GestureClassifier {
    pub fn new(config: ClassifierConfig) -> Result<Self, GestureError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn classify(&self, pose: &HandPose) -> Result<Gesture, GestureError> {
        classify_validated(pose, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::test_poses::{hand_at, hand_on_line};
    use crate::landmark::{HandJoint, Landmark};

    fn scenario_config() -> ClassifierConfig {
        ClassifierConfig::new(0.1, 0.2, 0.8, 3).unwrap()
    }

    #[test]
    fn close_pinch_toggles_play() {
        let pose = hand_at(0.5, 0.05);
        assert_eq!(
            classify(&pose, &scenario_config()).unwrap(),
            Gesture::TogglePlay
        );
    }

    #[test]
    fn pinch_wins_anywhere_in_frame() {
        let cfg = scenario_config();
        for layout in [ZoneLayout::Legacy, ZoneLayout::Banded] {
            let cfg = cfg.with_zone_layout(layout);
            for step in 0..=20 {
                let x = step as f32 / 20.0;
                let pose = hand_at(x, 0.02);
                assert_eq!(
                    classify(&pose, &cfg).unwrap(),
                    Gesture::TogglePlay,
                    "x={x} layout={layout:?}"
                );
            }
        }
    }

    #[test]
    fn pinch_threshold_is_strict() {
        let cfg = scenario_config();
        // Tips on one vertical line, exactly 0.125 apart (exact in f32).
        let mut landmarks = hand_at(0.5, 0.0).landmarks().to_vec();
        landmarks[HandJoint::ThumbTip.index()] = Landmark::new(0.5, 0.25);
        landmarks[HandJoint::IndexTip.index()] = Landmark::new(0.5, 0.375);
        let pose = HandPose::new(landmarks);
        let cfg = ClassifierConfig {
            pinch_threshold: 0.125,
            ..cfg
        };
        assert_ne!(classify(&pose, &cfg).unwrap(), Gesture::TogglePlay);
    }

    #[test]
    fn legacy_layout_prefers_rewind_right_of_left_threshold() {
        let cfg = scenario_config();
        for x in [0.25, 0.5, 0.75, 0.85, 0.95] {
            assert_eq!(
                classify(&hand_at(x, 0.3), &cfg).unwrap(),
                Gesture::Rewind,
                "x={x}"
            );
        }
    }

    #[test]
    fn legacy_layout_never_reaches_nop() {
        let cfg = scenario_config();
        for x in [0.0, 0.05, 0.1, 0.15, 0.19] {
            assert_eq!(
                classify(&hand_at(x, 0.3), &cfg).unwrap(),
                Gesture::Forward,
                "x={x}"
            );
        }
    }

    #[test]
    fn banded_layout_has_dead_zone() {
        let cfg = scenario_config().with_zone_layout(ZoneLayout::Banded);
        assert_eq!(classify(&hand_at(0.1, 0.3), &cfg).unwrap(), Gesture::Rewind);
        assert_eq!(classify(&hand_at(0.21, 0.3), &cfg).unwrap(), Gesture::Nop);
        assert_eq!(classify(&hand_at(0.5, 0.3), &cfg).unwrap(), Gesture::Nop);
        assert_eq!(classify(&hand_at(0.79, 0.3), &cfg).unwrap(), Gesture::Nop);
        assert_eq!(classify(&hand_at(0.9, 0.3), &cfg).unwrap(), Gesture::Forward);
    }

    #[test]
    fn legacy_layout_at_exact_thresholds() {
        let cfg = scenario_config();
        // Not strictly right of left: falls through to Forward.
        assert_eq!(classify(&hand_on_line(0.2), &cfg).unwrap(), Gesture::Forward);
        assert_eq!(classify(&hand_on_line(0.8), &cfg).unwrap(), Gesture::Rewind);
    }

    #[test]
    fn banded_layout_thresholds_belong_to_dead_zone() {
        let cfg = scenario_config().with_zone_layout(ZoneLayout::Banded);
        assert_eq!(classify(&hand_on_line(0.2), &cfg).unwrap(), Gesture::Nop);
        assert_eq!(classify(&hand_on_line(0.8), &cfg).unwrap(), Gesture::Nop);

        let cfg = ClassifierConfig::new(0.1, 0.35, 0.65, 3)
            .unwrap()
            .with_zone_layout(ZoneLayout::Banded);
        assert_eq!(classify(&hand_on_line(0.35), &cfg).unwrap(), Gesture::Nop);
        assert_eq!(classify(&hand_on_line(0.65), &cfg).unwrap(), Gesture::Nop);
    }

    #[test]
    fn missing_index_tip_is_invalid_pose() {
        let landmarks = hand_at(0.5, 0.05).landmarks()[..HandJoint::IndexTip.index()].to_vec();
        let err = classify(&HandPose::new(landmarks), &scenario_config()).unwrap_err();
        assert!(err.is_invalid_pose());
    }

    #[test]
    fn empty_pose_is_invalid_pose() {
        let err = classify(&HandPose::default(), &scenario_config()).unwrap_err();
        assert!(err.is_invalid_pose());
    }

    #[test]
    fn config_rejects_broken_invariants() {
        let cases = [
            (0.0, 0.2, 0.8),
            (-0.1, 0.2, 0.8),
            (f32::NAN, 0.2, 0.8),
            (0.1, -0.1, 0.8),
            (0.1, 0.2, 1.5),
            (0.1, 0.8, 0.2),
            (0.1, 0.5, 0.5),
        ];
        for (pinch, left, right) in cases {
            let err = ClassifierConfig::new(pinch, left, right, 3).unwrap_err();
            assert_eq!(err.code(), "INVALID_CONFIG", "{pinch} {left} {right}");
        }
        assert!(ClassifierConfig::new(0.1, 0.0, 1.0, 0).is_ok());
        assert!(ClassifierConfig::default().validate().is_ok());
    }

    #[test]
    fn free_classify_rejects_invalid_config() {
        let cfg = ClassifierConfig {
            left_threshold: 0.9,
            ..ClassifierConfig::default()
        };
        let err = classify(&hand_at(0.5, 0.3), &cfg).unwrap_err();
        assert_eq!(err.code(), "INVALID_CONFIG");
        assert!(GestureClassifier::new(cfg).is_err());
    }

    #[test]
    fn bound_classifier_matches_free_function() {
        let cfg = scenario_config();
        let classifier = GestureClassifier::new(cfg).unwrap();
        for (x, gap) in [(0.1, 0.3), (0.5, 0.3), (0.5, 0.01)] {
            let pose = hand_at(x, gap);
            assert_eq!(
                classifier.classify(&pose).unwrap(),
                classify(&pose, &cfg).unwrap()
            );
        }
    }
}
