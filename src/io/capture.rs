//! Recorded perception capture replay
//!
//! A capture is a JSONL file, one frame per line:
//!
//! ```text
//! {"ts":"2026-03-01T09:30:00.000Z","detections":[{"label":"book","confidence":0.81}],"faces":[[{"x":0.5,"y":0.5}, ...]]}
//! ```
//!
//! Missing `detections` or `faces` mean the collaborator reported nothing.
//! Blank lines are skipped; any other unparseable line is an error.

use crate::domain::{Detection, FaceLandmarks, Timestamp};
use crate::io::perception::{FaceLandmarker, ObjectDetector};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

/// One recorded frame: capture time plus what perception reported
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapturedFrame {
    pub ts: Timestamp,
    #[serde(default)]
    pub detections: Vec<Detection>,
    #[serde(default)]
    pub faces: Vec<FaceLandmarks>,
}

/// Perception collaborator that replays what was recorded with each frame
#[derive(Debug, Default, Clone, Copy)]
pub struct ReplayPerception;

impl ObjectDetector<CapturedFrame> for ReplayPerception {
    fn detect(&mut self, frame: &CapturedFrame) -> anyhow::Result<Vec<Detection>> {
        Ok(frame.detections.clone())
    }
}

impl FaceLandmarker<CapturedFrame> for ReplayPerception {
    fn extract_faces(&mut self, frame: &CapturedFrame) -> anyhow::Result<Vec<FaceLandmarks>> {
        Ok(frame.faces.clone())
    }
}

/// Parse a capture from any buffered reader
pub fn parse_capture<R: BufRead>(reader: R) -> anyhow::Result<Vec<CapturedFrame>> {
    let mut frames = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("Failed to read capture line {line_no}"))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let frame: CapturedFrame = serde_json::from_str(trimmed)
            .with_context(|| format!("Malformed capture frame on line {line_no}"))?;
        frames.push(frame);
    }

    debug!(frames = %frames.len(), "capture_parsed");
    Ok(frames)
}

/// Load a capture file from disk
pub fn read_capture<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<CapturedFrame>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open capture file {}", path.display()))?;

    let frames = parse_capture(BufReader::new(file))
        .with_context(|| format!("Failed to parse capture file {}", path.display()))?;

    info!(file = %path.display(), frames = %frames.len(), "capture_loaded");
    Ok(frames)
}
