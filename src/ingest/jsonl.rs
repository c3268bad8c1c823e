//! JSON Lines landmark recordings.
//!
//! One object per line, one line per frame:
//!
//! ```text
//! {"hands": [[[0.41, 0.62, -0.01], [0.45, 0.58, -0.02], ...]]}
//! {"hands": []}
//! ```
//!
//! Points may be `[x, y]`, `[x, y, z]` or `{"x": .., "y": .., "z": ..}`.
//! A missing or null `hands` field means no hand. Blank lines are skipped.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};

use super::{LandmarkFrame, SourceStats};
use crate::landmark::HandPose;

#[derive(Debug, Deserialize)]
struct FrameRecord {
    #[serde(default)]
    hands: Option<Vec<HandPose>>,
}

pub struct JsonlSource {
    path: String,
    reader: Option<BufReader<File>>,
    line_no: u64,
    stats: SourceStats,
}

impl JsonlSource {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            reader: None,
            line_no: 0,
            stats: SourceStats {
                source: path.to_string(),
                ..SourceStats::default()
            },
        }
    }

    pub fn connect(&mut self) -> Result<()> {
        let file = File::open(&self.path)
            .with_context(|| format!("failed to open landmark recording {}", self.path))?;
        self.reader = Some(BufReader::new(file));
        self.line_no = 0;
        log::info!("JsonlSource: reading landmarks from {}", self.path);
        Ok(())
    }

    pub fn next_frame(&mut self) -> Result<Option<LandmarkFrame>> {
        let reader = self
            .reader
            .as_mut()
            .ok_or_else(|| anyhow!("JsonlSource: next_frame called before connect"))?;

        let mut line = String::new();
        loop {
            line.clear();
            let read = reader
                .read_line(&mut line)
                .with_context(|| format!("failed to read {}", self.path))?;
            if read == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            if !line.trim().is_empty() {
                break;
            }
        }

        let record: FrameRecord = serde_json::from_str(line.trim())
            .with_context(|| format!("{}:{}: invalid landmark frame", self.path, self.line_no))?;
        let hands = record.hands.unwrap_or_default();

        let frame = LandmarkFrame::new(self.stats.frames_read, hands);
        self.stats.frames_read += 1;
        self.stats.hands_read += frame.hands.len() as u64;
        Ok(Some(frame))
    }

    pub fn stats(&self) -> SourceStats {
        self.stats.clone()
    }
}
