//! Detection source backed by detections recorded to JSON.
//!
//! Lets a session be re-run with different tracking settings without running
//! the detector again. The recording holds one entry per video frame, in
//! order; entries for frames the sampler skips are never read.
//!
//! ```json
//! {
//!   "video": { "width": 1280, "height": 720, "fps": 30.0 },
//!   "frames": [
//!     { "detections": [ { "class_id": 0, "score": 0.91, "bbox": [80, 60, 120, 140] } ] },
//!     { "error": "CUDA out of memory" }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::Result;
use crate::session::VideoInfo;
use crate::tracker::Detection;

use super::{DetectionSource, FrameRef, IntoDetections};

/// A detection as written by the recorder: TLBR box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedDetection {
    pub class_id: u32,
    pub score: f32,
    pub bbox: [f32; 4],
}

impl IntoDetections for Vec<RecordedDetection> {
    fn into_detections(self) -> Vec<Detection> {
        self.into_iter()
            .map(|d| {
                let [x1, y1, x2, y2] = d.bbox;
                Detection::new(d.class_id, d.score, x1, y1, x2, y2)
            })
            .collect()
    }
}

/// Detector output for one frame, or the failure it reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    #[serde(default)]
    pub detections: Vec<RecordedDetection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub video: VideoInfo,
    pub frames: Vec<RecordedFrame>,
}

#[derive(Debug, Clone, Error)]
pub enum ReplayError {
    #[error("recorded detector failure: {0}")]
    Recorded(String),
    #[error("no recording for frame {0}")]
    MissingFrame(u64),
}

#[derive(Debug, Clone)]
pub struct ReplaySource {
    recording: Recording,
}

impl ReplaySource {
    pub fn new(recording: Recording) -> Self {
        Self { recording }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        let recording: Recording = serde_json::from_str(contents)?;
        Ok(Self::new(recording))
    }

    /// Video properties, with the frame count filled from the recording.
    pub fn video(&self) -> VideoInfo {
        self.recording
            .video
            .with_total_frames(self.recording.frames.len() as u64)
    }

    /// Number of recorded frames.
    pub fn len(&self) -> usize {
        self.recording.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recording.frames.is_empty()
    }
}

impl DetectionSource for ReplaySource {
    type Error = ReplayError;

    fn detect(&mut self, frame: &FrameRef<'_>) -> std::result::Result<Vec<Detection>, ReplayError> {
        let recorded = usize::try_from(frame.index)
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| self.recording.frames.get(i))
            .ok_or(ReplayError::MissingFrame(frame.index))?;

        match &recorded.error {
            Some(message) => Err(ReplayError::Recorded(message.clone())),
            None => Ok(recorded.detections.clone().into_detections()),
        }
    }
}
