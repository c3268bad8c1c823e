//! Scripted synthetic hands (`stub://<script>`).
//!
//! Each script is a fixed timeline of segments: no hand, a pinch held at one
//! spot, or an open hand sweeping across the frame. Landmarks get a small
//! seeded jitter so runs are reproducible but not perfectly still.

use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::str::FromStr;

use super::{LandmarkFrame, SourceStats};
use crate::landmark::{HandJoint, HandPose, Landmark, HAND_LANDMARK_COUNT};

const JITTER: f32 = 0.004;
const HAND_CENTER_Y: f32 = 0.55;

/// Open-hand joint offsets from the hand centre, in `HandJoint` order.
const OPEN_HAND: [(f32, f32); HAND_LANDMARK_COUNT] = [
    (0.0, 0.15),
    (-0.04, 0.11),
    (-0.07, 0.07),
    (-0.09, 0.03),
    (-0.11, 0.0),
    (-0.03, 0.02),
    (-0.035, -0.04),
    (-0.04, -0.08),
    (-0.045, -0.11),
    (0.0, 0.01),
    (0.0, -0.05),
    (0.0, -0.09),
    (0.0, -0.125),
    (0.03, 0.02),
    (0.035, -0.035),
    (0.04, -0.07),
    (0.045, -0.1),
    (0.055, 0.04),
    (0.065, 0.0),
    (0.075, -0.03),
    (0.08, -0.055),
];

/// Where thumb and index tips meet when pinching.
const PINCH_POINT: (f32, f32) = (-0.07, -0.05);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyntheticScript {
    /// Pinch, withdraw, sweep right to left, withdraw, pinch.
    Demo,
    /// A pinch held in the middle of the frame.
    Pinch,
    /// An open hand crossing the frame right to left.
    Sweep,
    /// No hand at all.
    Empty,
}

impl FromStr for SyntheticScript {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" | "demo" => Ok(SyntheticScript::Demo),
            "pinch" => Ok(SyntheticScript::Pinch),
            "sweep" => Ok(SyntheticScript::Sweep),
            "empty" => Ok(SyntheticScript::Empty),
            other => Err(anyhow!(
                "unknown synthetic script '{}' (expected demo, pinch, sweep or empty)",
                other
            )),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Segment {
    Absent { frames: u32 },
    Pinch { frames: u32, x: f32 },
    Sweep { frames: u32, from: f32, to: f32 },
}

impl Segment {
    fn frames(&self) -> u32 {
        match *self {
            Segment::Absent { frames }
            | Segment::Pinch { frames, .. }
            | Segment::Sweep { frames, .. } => frames,
        }
    }
}

impl SyntheticScript {
    fn segments(self) -> Vec<Segment> {
        match self {
            SyntheticScript::Demo => vec![
                Segment::Absent { frames: 10 },
                Segment::Pinch { frames: 20, x: 0.5 },
                Segment::Absent { frames: 8 },
                Segment::Sweep {
                    frames: 40,
                    from: 0.9,
                    to: 0.1,
                },
                Segment::Absent { frames: 8 },
                Segment::Pinch { frames: 15, x: 0.3 },
            ],
            SyntheticScript::Pinch => vec![Segment::Pinch { frames: 30, x: 0.5 }],
            SyntheticScript::Sweep => vec![Segment::Sweep {
                frames: 40,
                from: 0.9,
                to: 0.1,
            }],
            SyntheticScript::Empty => vec![Segment::Absent { frames: 30 }],
        }
    }

    /// Frames in one pass of the script.
    pub fn frames_per_pass(self) -> u64 {
        self.segments().iter().map(|s| s.frames() as u64).sum()
    }
}

pub struct SyntheticSource {
    script: SyntheticScript,
    segments: Vec<Segment>,
    repeat: u32,
    pass: u32,
    segment: usize,
    frame_in_segment: u32,
    rng: StdRng,
    stats: SourceStats,
}

impl SyntheticSource {
    pub fn new(script: SyntheticScript, seed: u64, repeat: u32) -> Self {
        Self {
            script,
            segments: script.segments(),
            repeat: repeat.max(1),
            pass: 0,
            segment: 0,
            frame_in_segment: 0,
            rng: StdRng::seed_from_u64(seed),
            stats: SourceStats {
                source: format!("stub://{:?}", script).to_lowercase(),
                ..SourceStats::default()
            },
        }
    }

    pub fn connect(&mut self) -> Result<()> {
        log::info!(
            "SyntheticSource: playing {:?} x{} ({} frames per pass)",
            self.script,
            self.repeat,
            self.script.frames_per_pass()
        );
        Ok(())
    }

    pub fn next_frame(&mut self) -> Option<LandmarkFrame> {
        let segment = self.advance()?;
        let hands = match segment {
            Segment::Absent { .. } => Vec::new(),
            Segment::Pinch { x, .. } => vec![self.hand(x, true)],
            Segment::Sweep { frames, from, to } => {
                let t = if frames > 1 {
                    self.frame_in_segment as f32 / (frames - 1) as f32
                } else {
                    0.0
                };
                vec![self.hand(from + (to - from) * t, false)]
            }
        };

        let frame = LandmarkFrame::new(self.stats.frames_read, hands);
        self.stats.frames_read += 1;
        self.stats.hands_read += frame.hands.len() as u64;
        self.frame_in_segment += 1;
        Some(frame)
    }

    pub fn stats(&self) -> SourceStats {
        self.stats.clone()
    }

    /// Segment for the current frame, moving past exhausted segments.
    fn advance(&mut self) -> Option<Segment> {
        loop {
            if self.pass >= self.repeat {
                return None;
            }
            match self.segments.get(self.segment) {
                Some(segment) if self.frame_in_segment < segment.frames() => {
                    return Some(*segment);
                }
                Some(_) => {
                    self.segment += 1;
                    self.frame_in_segment = 0;
                }
                None => {
                    self.pass += 1;
                    self.segment = 0;
                    self.frame_in_segment = 0;
                }
            }
        }
    }

    /// Hand whose mean x sits at `center_x`.
    fn hand(&mut self, center_x: f32, pinching: bool) -> HandPose {
        let mut offsets = OPEN_HAND;
        if pinching {
            offsets[HandJoint::ThumbTip.index()] = PINCH_POINT;
            offsets[HandJoint::IndexTip.index()] = (PINCH_POINT.0 + 0.01, PINCH_POINT.1);
        }
        let mean_dx = offsets.iter().map(|(dx, _)| dx).sum::<f32>() / HAND_LANDMARK_COUNT as f32;

        let landmarks = offsets
            .iter()
            .map(|&(dx, dy)| {
                let jx = self.rng.gen_range(-JITTER..=JITTER);
                let jy = self.rng.gen_range(-JITTER..=JITTER);
                Landmark::new(center_x + dx - mean_dx + jx, HAND_CENTER_Y + dy + jy)
            })
            .collect();
        HandPose::new(landmarks)
    }
}
