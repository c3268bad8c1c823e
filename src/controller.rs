//! Per-stream gesture controller.
//!
//! Owns one classifier and one debouncer and decides what a frame without a
//! usable hand means for the debouncer. Invalid poses are logged and treated
//! as frames without a hand; they never abort the stream.

use serde::Deserialize;

use crate::classifier::{ClassifierConfig, GestureClassifier};
use crate::debounce::{DebouncePhase, GestureDebouncer, NopPolicy};
use crate::error::GestureError;
use crate::gesture::Gesture;
use crate::landmark::HandPose;

/// What a frame without a hand does to the debouncer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingHandPolicy {
    /// Spend one cooldown frame, keep the settled gesture.
    #[default]
    Hold,
    /// Return the debouncer to its initial state.
    Reset,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControllerStats {
    pub frames: u64,
    pub hands_seen: u64,
    pub invalid_poses: u64,
    pub events: u64,
}

pub struct GestureController {
    classifier: GestureClassifier,
    debouncer: GestureDebouncer,
    missing_hand: MissingHandPolicy,
    stats: ControllerStats,
}

impl GestureController {
    pub fn new(config: ClassifierConfig) -> Result<Self, GestureError> {
        let classifier = GestureClassifier::new(config)?;
        let debouncer = GestureDebouncer::from_config(classifier.config());
        Ok(Self {
            classifier,
            debouncer,
            missing_hand: MissingHandPolicy::Hold,
            stats: ControllerStats::default(),
        })
    }

    pub fn with_nop_policy(mut self, policy: NopPolicy) -> Self {
        self.debouncer = self.debouncer.with_nop_policy(policy);
        self
    }

    pub fn with_missing_hand(mut self, policy: MissingHandPolicy) -> Self {
        self.missing_hand = policy;
        self
    }

    pub fn config(&self) -> &ClassifierConfig {
        self.classifier.config()
    }

    pub fn phase(&self) -> DebouncePhase {
        self.debouncer.phase()
    }

    pub fn stats(&self) -> ControllerStats {
        self.stats
    }

    /// Process one frame. `hand` is the first detected hand, if any.
    pub fn process(&mut self, hand: Option<&HandPose>) -> Option<Gesture> {
        self.stats.frames += 1;

        let candidate = match hand {
            Some(pose) => {
                self.stats.hands_seen += 1;
                match self.classifier.classify(pose) {
                    Ok(gesture) => Some(gesture),
                    Err(err) => {
                        self.stats.invalid_poses += 1;
                        log::warn!("frame {} skipped: {}", self.stats.frames, err);
                        None
                    }
                }
            }
            None => None,
        };

        let Some(candidate) = candidate else {
            self.on_missing_hand();
            return None;
        };

        let emitted = self.debouncer.update(candidate);
        if let Some(gesture) = emitted {
            self.stats.events += 1;
            log::debug!("frame {}: gesture {}", self.stats.frames, gesture);
        }
        emitted
    }

    pub fn reset(&mut self) {
        self.debouncer.reset();
    }

    fn on_missing_hand(&mut self) {
        match self.missing_hand {
            MissingHandPolicy::Hold => {
                self.debouncer.tick();
            }
            MissingHandPolicy::Reset => self.debouncer.reset(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::test_poses::hand_at;

    fn controller(cooldown: u32) -> GestureController {
        GestureController::new(ClassifierConfig::new(0.1, 0.2, 0.8, cooldown).unwrap()).unwrap()
    }

    #[test]
    fn pinch_then_sweep_emits_once_per_change() {
        let mut ctl = controller(2);
        let pinch = hand_at(0.5, 0.02);
        let low = hand_at(0.1, 0.3);

        let out: Vec<_> = [&pinch, &pinch, &pinch, &pinch, &low, &low]
            .into_iter()
            .map(|pose| ctl.process(Some(pose)))
            .collect();
        assert_eq!(
            out,
            vec![
                Some(Gesture::TogglePlay),
                None,
                None,
                None,
                Some(Gesture::Forward),
                None
            ]
        );
        let stats = ctl.stats();
        assert_eq!(stats.frames, 6);
        assert_eq!(stats.hands_seen, 6);
        assert_eq!(stats.events, 2);
    }

    #[test]
    fn missing_hand_spends_cooldown_by_default() {
        let mut ctl = controller(2);
        let pinch = hand_at(0.5, 0.02);
        assert_eq!(ctl.process(Some(&pinch)), Some(Gesture::TogglePlay));
        assert_eq!(ctl.process(None), None);
        assert_eq!(ctl.process(None), None);
        assert_eq!(ctl.phase(), DebouncePhase::Idle(Gesture::TogglePlay));
        // Same gesture after the hand returns is not a new event.
        assert_eq!(ctl.process(Some(&pinch)), None);
    }

    #[test]
    fn missing_hand_reset_policy_rearms_immediately() {
        let mut ctl = controller(5).with_missing_hand(MissingHandPolicy::Reset);
        let pinch = hand_at(0.5, 0.02);
        assert_eq!(ctl.process(Some(&pinch)), Some(Gesture::TogglePlay));
        assert_eq!(ctl.process(None), None);
        assert_eq!(ctl.phase(), DebouncePhase::Idle(Gesture::Nop));
        assert_eq!(ctl.process(Some(&pinch)), Some(Gesture::TogglePlay));
    }

    #[test]
    fn invalid_pose_counts_as_missing_hand() {
        let mut ctl = controller(0).with_missing_hand(MissingHandPolicy::Reset);
        let rewind = hand_at(0.5, 0.3);
        assert_eq!(ctl.process(Some(&rewind)), Some(Gesture::Rewind));

        let broken = HandPose::new(rewind.landmarks()[..6].to_vec());
        assert_eq!(ctl.process(Some(&broken)), None);
        assert_eq!(ctl.stats().invalid_poses, 1);
        assert_eq!(ctl.process(Some(&rewind)), Some(Gesture::Rewind));
    }

    #[test]
    fn rejects_invalid_config_up_front() {
        let cfg = ClassifierConfig {
            pinch_threshold: 0.0,
            ..ClassifierConfig::default()
        };
        let err = GestureController::new(cfg).err().expect("invalid config");
        assert_eq!(err.code(), "INVALID_CONFIG");
    }
}
