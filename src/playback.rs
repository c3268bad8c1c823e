//! Frame loop: source -> controller -> dispatcher.
//!
//! One frame is fully classified, debounced and dispatched before the next is
//! pulled. The loop ends at end of stream, when the stop flag is raised,
//! after a frame limit, or at the first dispatch failure. A failed dispatch is
//! recorded on the summary so events delivered before it are not lost.

use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::action::{ActionDispatcher, MediaAction};
use crate::controller::{ControllerStats, GestureController};
use crate::gesture::Gesture;
use crate::ingest::{LandmarkSource, SourceStats};

const DEFAULT_WINDOW_NAME: &str = "Playback";

/// One dispatched event.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActionEvent {
    pub frame: u64,
    pub gesture: Gesture,
    pub action: Option<MediaAction>,
    /// Overlay text, e.g. `Action: Play/Pause`.
    pub text: String,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct PlaybackSummary {
    /// Window the overlay text belongs to.
    pub window: String,
    pub frames: u64,
    pub hands_seen: u64,
    pub invalid_poses: u64,
    pub events: Vec<ActionEvent>,
    pub stopped_early: bool,
    /// Set when a dispatch failed; the loop stopped at that frame.
    pub dispatch_error: Option<String>,
}

impl PlaybackSummary {
    pub fn actions(&self) -> Vec<MediaAction> {
        self.events.iter().filter_map(|e| e.action).collect()
    }
}

pub struct Playback<D: ActionDispatcher> {
    source: LandmarkSource,
    controller: GestureController,
    dispatcher: D,
    frame_interval: Option<Duration>,
    window_name: String,
}

impl<D: ActionDispatcher> Playback<D> {
    pub fn new(source: LandmarkSource, controller: GestureController, dispatcher: D) -> Self {
        Self {
            source,
            controller,
            dispatcher,
            frame_interval: None,
            window_name: DEFAULT_WINDOW_NAME.to_string(),
        }
    }

    pub fn with_window_name(mut self, name: impl Into<String>) -> Self {
        self.window_name = name.into();
        self
    }

    /// Pace the loop to at most `fps` frames per second. Zero disables pacing.
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.frame_interval = (fps > 0).then(|| Duration::from_secs_f64(1.0 / fps as f64));
        self
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn controller_stats(&self) -> ControllerStats {
        self.controller.stats()
    }

    pub fn source_stats(&self) -> SourceStats {
        self.source.stats()
    }

    pub fn run(&mut self, stop: &AtomicBool, max_frames: Option<u64>) -> Result<PlaybackSummary> {
        self.source.connect().context("connect landmark source")?;
        log::info!(
            "playback started (dispatcher: {}, cooldown: {} frames)",
            self.dispatcher.name(),
            self.controller.config().cooldown_frames
        );

        let mut summary = PlaybackSummary {
            window: self.window_name.clone(),
            ..PlaybackSummary::default()
        };
        let mut processed: u64 = 0;

        loop {
            if stop.load(Ordering::SeqCst) {
                summary.stopped_early = true;
                break;
            }
            if max_frames.is_some_and(|limit| processed >= limit) {
                break;
            }
            let started = Instant::now();

            let Some(frame) = self.source.next_frame()? else {
                break;
            };
            processed += 1;

            if let Some(gesture) = self.controller.process(frame.primary_hand()) {
                let action = MediaAction::for_gesture(gesture);
                let text = match action {
                    Some(action) => {
                        if let Err(err) = self.dispatcher.dispatch(action) {
                            let reason =
                                format!("frame {}: dispatch {:?}: {:#}", frame.index, action, err);
                            log::error!("{}", reason);
                            summary.dispatch_error = Some(reason);
                            break;
                        }
                        format!("Action: {}", action.label())
                    }
                    None => "Action: No action".to_string(),
                };
                summary.events.push(ActionEvent {
                    frame: frame.index,
                    gesture,
                    action,
                    text,
                });
            }

            if let Some(interval) = self.frame_interval {
                let elapsed = started.elapsed();
                if elapsed < interval {
                    std::thread::sleep(interval - elapsed);
                }
            }
        }

        let stats = self.controller.stats();
        summary.frames = stats.frames;
        summary.hands_seen = stats.hands_seen;
        summary.invalid_poses = stats.invalid_poses;
        log::info!(
            "playback finished: {} frames, {} events, {} invalid poses",
            summary.frames,
            summary.events.len(),
            summary.invalid_poses
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::RecordingDispatcher;
    use anyhow::bail;
    use crate::classifier::ClassifierConfig;
    use crate::ingest::{LandmarkFrame, SourceConfig};
    use crate::landmark::test_poses::hand_at;

    fn controller(cooldown: u32) -> GestureController {
        GestureController::new(ClassifierConfig::new(0.1, 0.2, 0.8, cooldown).unwrap()).unwrap()
    }

    #[test]
    fn dispatches_each_event_once() {
        let pinch = hand_at(0.5, 0.02);
        let low = hand_at(0.1, 0.3);
        let frames = [
            vec![pinch.clone()],
            vec![pinch.clone()],
            vec![],
            vec![low.clone()],
            vec![low.clone()],
            vec![low],
        ]
        .into_iter()
        .enumerate()
        .map(|(i, hands)| LandmarkFrame::new(i as u64, hands))
        .collect();

        let mut playback = Playback::new(
            LandmarkSource::from_frames(frames),
            controller(1),
            RecordingDispatcher::new(),
        );
        let summary = playback.run(&AtomicBool::new(false), None).unwrap();

        assert_eq!(summary.frames, 6);
        assert_eq!(summary.hands_seen, 5);
        assert_eq!(
            playback.dispatcher().actions(),
            &[MediaAction::TogglePlay, MediaAction::Forward]
        );
        assert_eq!(summary.actions(), playback.dispatcher().actions());
        assert_eq!(summary.events[0].frame, 0);
        assert_eq!(summary.events[0].text, "Action: Play/Pause");
        assert_eq!(summary.events[1].frame, 3);
        assert!(!summary.stopped_early);
        assert_eq!(summary.window, "Playback");
        assert_eq!(summary.dispatch_error, None);
    }

    #[test]
    fn nop_events_reach_summary_but_not_dispatcher() {
        let cfg = ClassifierConfig::new(0.1, 0.2, 0.8, 0)
            .unwrap()
            .with_zone_layout(crate::classifier::ZoneLayout::Banded);
        let frames = vec![
            LandmarkFrame::new(0, vec![hand_at(0.1, 0.3)]),
            LandmarkFrame::new(1, vec![hand_at(0.5, 0.3)]),
        ];
        let mut playback = Playback::new(
            LandmarkSource::from_frames(frames),
            GestureController::new(cfg).unwrap(),
            RecordingDispatcher::new(),
        );
        let summary = playback.run(&AtomicBool::new(false), None).unwrap();
        assert_eq!(summary.events.len(), 2);
        assert_eq!(summary.events[1].gesture, Gesture::Nop);
        assert_eq!(summary.events[1].text, "Action: No action");
        assert_eq!(playback.dispatcher().actions(), &[MediaAction::Rewind]);
    }

    /// Accepts `budget` actions, then fails every dispatch.
    struct FlakyDispatcher {
        budget: usize,
    }

    impl ActionDispatcher for FlakyDispatcher {
        fn name(&self) -> &'static str {
            "flaky"
        }

        fn dispatch(&mut self, action: MediaAction) -> Result<()> {
            if self.budget == 0 {
                bail!("player rejected {}", action.key());
            }
            self.budget -= 1;
            Ok(())
        }
    }

    #[test]
    fn dispatch_failure_keeps_partial_summary() {
        let frames = vec![
            LandmarkFrame::new(0, vec![hand_at(0.5, 0.02)]),
            LandmarkFrame::new(1, vec![hand_at(0.1, 0.3)]),
            LandmarkFrame::new(2, vec![hand_at(0.5, 0.3)]),
        ];
        let mut playback = Playback::new(
            LandmarkSource::from_frames(frames),
            controller(0),
            FlakyDispatcher { budget: 1 },
        )
        .with_window_name("Living room");
        let summary = playback.run(&AtomicBool::new(false), None).unwrap();

        assert_eq!(summary.window, "Living room");
        assert_eq!(summary.actions(), vec![MediaAction::TogglePlay]);
        assert_eq!(summary.frames, 2);
        assert!(!summary.stopped_early);
        let reason = summary.dispatch_error.expect("dispatch error recorded");
        assert!(reason.starts_with("frame 1: dispatch Forward"), "{reason}");
        assert!(reason.contains("player rejected"), "{reason}");
    }

    #[test]
    fn honours_frame_limit_and_stop_flag() {
        let source = LandmarkSource::new(SourceConfig::default()).unwrap();
        let mut playback = Playback::new(source, controller(7), RecordingDispatcher::new());
        let summary = playback.run(&AtomicBool::new(false), Some(12)).unwrap();
        assert_eq!(summary.frames, 12);
        assert!(!summary.stopped_early);

        let source = LandmarkSource::new(SourceConfig::default()).unwrap();
        let mut playback = Playback::new(source, controller(7), RecordingDispatcher::new());
        let summary = playback.run(&AtomicBool::new(true), None).unwrap();
        assert_eq!(summary.frames, 0);
        assert!(summary.stopped_early);
    }
}
