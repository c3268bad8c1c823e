//! Edge detection and rate limiting over per-frame classifications.
//!
//! A debouncer emits a gesture only when the candidate differs from the last
//! settled gesture, then drops every candidate for `cooldown_frames` frames.
//! The cooldown is a hard suppression window: frames inside it are not
//! compared at all.
//!
//! One debouncer serves one stream. `update` takes `&mut self`, so sharing an
//! instance across concurrent callers requires the caller to add its own
//! synchronisation; streams should simply own one each.

use serde::Deserialize;

use crate::classifier::ClassifierConfig;
use crate::gesture::Gesture;

/// How a transition into `Gesture::Nop` is handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NopPolicy {
    /// `Nop` is an ordinary gesture: the transition is emitted and starts a
    /// cooldown.
    #[default]
    Emit,
    /// The transition is recorded without an event and without a cooldown,
    /// so the next real gesture emits on its first frame.
    Settle,
}

/// Mutable per-stream state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DebouncerState {
    pub previous_gesture: Gesture,
    pub cooldown_remaining: u32,
}

impl Default for DebouncerState {
    fn default() -> Self {
        Self {
            previous_gesture: Gesture::Nop,
            cooldown_remaining: 0,
        }
    }
}

/// Read-only view of the state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebouncePhase {
    Idle(Gesture),
    CoolingDown { gesture: Gesture, remaining: u32 },
}

#[derive(Clone, Debug)]
pub struct GestureDebouncer {
    cooldown_frames: u32,
    nop_policy: NopPolicy,
    state: DebouncerState,
}

impl GestureDebouncer {
    pub fn new(cooldown_frames: u32) -> Self {
        Self {
            cooldown_frames,
            nop_policy: NopPolicy::Emit,
            state: DebouncerState::default(),
        }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(config.cooldown_frames)
    }

    pub fn with_nop_policy(mut self, nop_policy: NopPolicy) -> Self {
        self.nop_policy = nop_policy;
        self
    }

    pub fn cooldown_frames(&self) -> u32 {
        self.cooldown_frames
    }

    pub fn state(&self) -> DebouncerState {
        self.state
    }

    pub fn phase(&self) -> DebouncePhase {
        if self.state.cooldown_remaining > 0 {
            DebouncePhase::CoolingDown {
                gesture: self.state.previous_gesture,
                remaining: self.state.cooldown_remaining,
            }
        } else {
            DebouncePhase::Idle(self.state.previous_gesture)
        }
    }

    /// Feed one frame's classification. Returns the gesture to act on, if any.
    pub fn update(&mut self, candidate: Gesture) -> Option<Gesture> {
        if self.tick() {
            return None;
        }
        if candidate == self.state.previous_gesture {
            return None;
        }

        self.state.previous_gesture = candidate;
        if candidate.is_nop() && self.nop_policy == NopPolicy::Settle {
            return None;
        }
        self.state.cooldown_remaining = self.cooldown_frames;
        Some(candidate)
    }

    /// Advance the cooldown by one frame without a candidate.
    ///
    /// Returns true when the frame fell inside the cooldown window.
    pub fn tick(&mut self) -> bool {
        if self.state.cooldown_remaining > 0 {
            self.state.cooldown_remaining -= 1;
            true
        } else {
            false
        }
    }

    /// Back to `Idle(Nop)` with no cooldown.
    pub fn reset(&mut self) {
        self.state = DebouncerState::default();
    }
}
