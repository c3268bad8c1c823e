use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete gesture recognised in one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    TogglePlay,
    Rewind,
    Forward,
    /// Hand present, no recognised gesture.
    #[default]
    Nop,
}

impl Gesture {
    pub const ALL: [Gesture; 4] = [
        Gesture::TogglePlay,
        Gesture::Rewind,
        Gesture::Forward,
        Gesture::Nop,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Gesture::TogglePlay => "PLAY/PAUSE",
            Gesture::Rewind => "REWIND",
            Gesture::Forward => "FORWARD",
            Gesture::Nop => "NOP",
        }
    }

    pub fn is_nop(self) -> bool {
        matches!(self, Gesture::Nop)
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
