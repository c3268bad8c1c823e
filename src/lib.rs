//! handflix: hand gestures to media-player commands.
//!
//! This crate turns a stream of hand-landmark observations into debounced
//! media-control actions.
//!
//! # Architecture
//!
//! Per frame, the pipeline is:
//!
//! 1. **Ingest**: a landmark source yields zero or more hands; only the first
//!    is used.
//! 2. **Classify**: `classify` maps one pose to a `Gesture` using a pinch
//!    distance and the mean x of the hand. Pinch always wins over position.
//! 3. **Debounce**: `GestureDebouncer::update` emits a gesture only when it
//!    differs from the last settled one, then suppresses a fixed number of
//!    frames.
//! 4. **Dispatch**: each emitted gesture maps to at most one `MediaAction`,
//!    delivered exactly once to an `ActionDispatcher`.
//!
//! Frame capture, landmark inference, overlay drawing and real key injection
//! live outside the crate.
//!
//! # Module Structure
//!
//! - `landmark`, `gesture`: value types
//! - `classifier`, `debounce`: the deterministic core
//! - `controller`: one classifier and one debouncer per stream
//! - `action`: gesture-to-action table and dispatchers
//! - `ingest`: landmark sources (JSON Lines, synthetic, in-memory)
//! - `playback`: the frame loop
//! - `config`: layered file and environment configuration

pub mod action;
pub mod classifier;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod gesture;
pub mod ingest;
pub mod landmark;
pub mod playback;

pub use action::{ActionDispatcher, LogDispatcher, MediaAction, RecordingDispatcher};
pub use classifier::{classify, ClassifierConfig, GestureClassifier, ZoneLayout};
pub use config::{HandflixConfig, InputSettings, MediaSettings};
pub use controller::{ControllerStats, GestureController, MissingHandPolicy};
pub use debounce::{DebouncePhase, DebouncerState, GestureDebouncer, NopPolicy};
pub use error::GestureError;
pub use gesture::Gesture;
pub use ingest::{LandmarkFrame, LandmarkSource, SourceConfig, SourceStats};
pub use landmark::{HandJoint, HandPose, Landmark, HAND_LANDMARK_COUNT};
pub use playback::{ActionEvent, Playback, PlaybackSummary};
