//! Landmark ingestion.
//!
//! Frame capture and hand-landmark inference happen outside this crate. What
//! arrives here is their output: per frame, zero or more hands of normalized
//! landmarks. Sources provided:
//! - JSON Lines recordings of a landmark detector (local files only)
//! - Synthetic scripted hands (`stub://<script>`) for demos and tests
//! - In-memory frames handed over by an embedding application
//!
//! A source yields `None` at end of stream. Only the first hand of a frame is
//! ever classified.

mod jsonl;
mod synthetic;

use anyhow::{anyhow, Result};
use std::collections::VecDeque;

use crate::landmark::HandPose;

pub use jsonl::JsonlSource;
pub use synthetic::{SyntheticScript, SyntheticSource};

/// One frame's detector output.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LandmarkFrame {
    /// Zero-based position in the stream.
    pub index: u64,
    pub hands: Vec<HandPose>,
}

impl LandmarkFrame {
    pub fn new(index: u64, hands: Vec<HandPose>) -> Self {
        Self { index, hands }
    }

    /// The hand that drives gestures; extra hands are ignored.
    pub fn primary_hand(&self) -> Option<&HandPose> {
        self.hands.first()
    }
}

/// Configuration for a landmark source.
#[derive(Clone, Debug)]
pub struct SourceConfig {
    /// Local path to a `.jsonl` recording, or `stub://<script>`.
    pub path: String,
    /// Seed for synthetic jitter.
    pub seed: u64,
    /// How many times a synthetic script plays.
    pub repeat: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: "stub://demo".to_string(),
            seed: 0,
            repeat: 1,
        }
    }
}

/// Statistics for a landmark source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceStats {
    pub frames_read: u64,
    pub hands_read: u64,
    pub source: String,
}

pub struct LandmarkSource {
    backend: SourceBackend,
}

enum SourceBackend {
    Synthetic(SyntheticSource),
    Jsonl(JsonlSource),
    Memory(MemorySource),
}

impl LandmarkSource {
    pub fn new(config: SourceConfig) -> Result<Self> {
        if let Some(script) = config.path.strip_prefix("stub://") {
            let script: SyntheticScript = script.parse()?;
            return Ok(Self {
                backend: SourceBackend::Synthetic(SyntheticSource::new(
                    script,
                    config.seed,
                    config.repeat,
                )),
            });
        }
        if !is_local_file_path(&config.path) {
            return Err(anyhow!(
                "landmark input must be a local file path or stub://<script> (got '{}')",
                config.path
            ));
        }
        Ok(Self {
            backend: SourceBackend::Jsonl(JsonlSource::new(&config.path)),
        })
    }

    /// Source over frames already in memory.
    pub fn from_frames(frames: Vec<LandmarkFrame>) -> Self {
        Self {
            backend: SourceBackend::Memory(MemorySource {
                frames: frames.into(),
                stats: SourceStats {
                    source: "memory".to_string(),
                    ..SourceStats::default()
                },
            }),
        }
    }

    pub fn connect(&mut self) -> Result<()> {
        match &mut self.backend {
            SourceBackend::Synthetic(source) => source.connect(),
            SourceBackend::Jsonl(source) => source.connect(),
            SourceBackend::Memory(_) => Ok(()),
        }
    }

    /// Next frame, or `None` at end of stream.
    pub fn next_frame(&mut self) -> Result<Option<LandmarkFrame>> {
        match &mut self.backend {
            SourceBackend::Synthetic(source) => Ok(source.next_frame()),
            SourceBackend::Jsonl(source) => source.next_frame(),
            SourceBackend::Memory(source) => Ok(source.next_frame()),
        }
    }

    pub fn stats(&self) -> SourceStats {
        match &self.backend {
            SourceBackend::Synthetic(source) => source.stats(),
            SourceBackend::Jsonl(source) => source.stats(),
            SourceBackend::Memory(source) => source.stats.clone(),
        }
    }
}

struct MemorySource {
    frames: VecDeque<LandmarkFrame>,
    stats: SourceStats,
}

impl MemorySource {
    fn next_frame(&mut self) -> Option<LandmarkFrame> {
        let frame = self.frames.pop_front()?;
        self.stats.frames_read += 1;
        self.stats.hands_read += frame.hands.len() as u64;
        Some(frame)
    }
}

fn is_local_file_path(path: &str) -> bool {
    if path.trim().is_empty() {
        return false;
    }
    !path.contains("://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::test_poses::hand_at;

    #[test]
    fn rejects_remote_urls() {
        for path in ["", "  ", "http://example.com/hands.jsonl", "rtsp://camera/1"] {
            let config = SourceConfig {
                path: path.to_string(),
                ..SourceConfig::default()
            };
            assert!(LandmarkSource::new(config).is_err(), "{path:?}");
        }
    }

    #[test]
    fn rejects_unknown_synthetic_script() {
        let config = SourceConfig {
            path: "stub://juggling".to_string(),
            ..SourceConfig::default()
        };
        assert!(LandmarkSource::new(config).is_err());
    }

    #[test]
    fn memory_source_drains_in_order() {
        let frames = vec![
            LandmarkFrame::new(0, vec![hand_at(0.5, 0.3), hand_at(0.1, 0.3)]),
            LandmarkFrame::new(1, vec![]),
        ];
        let mut source = LandmarkSource::from_frames(frames);
        source.connect().unwrap();

        let first = source.next_frame().unwrap().unwrap();
        assert_eq!(first.primary_hand(), Some(&hand_at(0.5, 0.3)));
        let second = source.next_frame().unwrap().unwrap();
        assert!(second.primary_hand().is_none());
        assert!(source.next_frame().unwrap().is_none());

        let stats = source.stats();
        assert_eq!(stats.frames_read, 2);
        assert_eq!(stats.hands_read, 2);
        assert_eq!(stats.source, "memory");
    }
}
