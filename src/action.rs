//! Gesture-to-media-action mapping and the dispatcher seam.
//!
//! The mapping is an exhaustive `match`: adding a gesture without deciding
//! its action fails to compile. Dispatchers perform the effect; the crate
//! ships one that logs the key it would press and one that records actions.

use anyhow::Result;
use serde::Serialize;

use crate::gesture::Gesture;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaAction {
    TogglePlay,
    Rewind,
    Forward,
}

impl MediaAction {
    pub fn for_gesture(gesture: Gesture) -> Option<MediaAction> {
        match gesture {
            Gesture::TogglePlay => Some(MediaAction::TogglePlay),
            Gesture::Rewind => Some(MediaAction::Rewind),
            Gesture::Forward => Some(MediaAction::Forward),
            Gesture::Nop => None,
        }
    }

    /// Key a desktop media player expects for this action.
    pub fn key(self) -> &'static str {
        match self {
            MediaAction::TogglePlay => "space",
            MediaAction::Rewind => "left",
            MediaAction::Forward => "right",
        }
    }

    /// Short text suitable for an on-screen overlay.
    pub fn label(self) -> &'static str {
        match self {
            MediaAction::TogglePlay => "Play/Pause",
            MediaAction::Rewind => "Rewind",
            MediaAction::Forward => "Forward",
        }
    }
}

/// Receives each emitted action exactly once.
pub trait ActionDispatcher {
    fn name(&self) -> &'static str;

    fn dispatch(&mut self, action: MediaAction) -> Result<()>;
}

/// Logs the key press instead of sending it.
#[derive(Debug, Default)]
pub struct LogDispatcher {
    dispatched: u64,
}

impl LogDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }
}

impl ActionDispatcher for LogDispatcher {
    fn name(&self) -> &'static str {
        "log"
    }

    fn dispatch(&mut self, action: MediaAction) -> Result<()> {
        self.dispatched += 1;
        log::info!("action: {} (key '{}')", action.label(), action.key());
        Ok(())
    }
}

/// Keeps every dispatched action in order.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    actions: Vec<MediaAction>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> &[MediaAction] {
        &self.actions
    }
}

impl ActionDispatcher for RecordingDispatcher {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn dispatch(&mut self, action: MediaAction) -> Result<()> {
        self.actions.push(action);
        Ok(())
    }
}

impl<D: ActionDispatcher + ?Sized> ActionDispatcher for Box<D> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn dispatch(&mut self, action: MediaAction) -> Result<()> {
        (**self).dispatch(action)
    }
}
