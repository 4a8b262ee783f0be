//! SessionPipeline for combining detection with the rally session.

use tracing::{info, warn};

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::session::{FrameAnalysis, FrameDecision, RallySession, SessionStatistics, VideoInfo};

use super::{DetectionSource, FrameRef};

/// Frames between progress log lines.
const PROGRESS_INTERVAL: u64 = 30;

/// What happened to a frame pushed through the pipeline.
///
/// Every variant except `StreamEnded` means the caller should still write the
/// frame to its output; only `Analyzed` carries overlay data.
#[derive(Debug)]
pub enum FrameOutcome {
    Analyzed(FrameAnalysis),
    /// Not selected by the sampler; forward unmodified.
    Passthrough { frame_index: u64 },
    /// Detection failed; forward unmodified. The session continues.
    Failed { frame_index: u64, error: Error },
    /// Frame limit reached; stop feeding frames and call `finish`.
    StreamEnded,
}

impl FrameOutcome {
    pub fn analysis(&self) -> Option<&FrameAnalysis> {
        match self {
            FrameOutcome::Analyzed(analysis) => Some(analysis),
            _ => None,
        }
    }

    pub fn is_stream_end(&self) -> bool {
        matches!(self, FrameOutcome::StreamEnded)
    }
}

/// Bundles a `DetectionSource` with a `RallySession`.
///
/// The pipeline numbers frames itself (1, 2, 3, ...) so frames reach the
/// session strictly in order.
pub struct SessionPipeline<D: DetectionSource> {
    detector: D,
    session: RallySession,
    frame_index: u64,
}

impl<D: DetectionSource> SessionPipeline<D> {
    /// Create a new pipeline. Configuration and dimension errors surface here,
    /// before any frame is processed.
    pub fn new(detector: D, config: SessionConfig, video: VideoInfo) -> Result<Self> {
        Ok(Self {
            detector,
            session: RallySession::new(config, video)?,
            frame_index: 0,
        })
    }

    /// Create a new pipeline with the default session configuration.
    pub fn with_default_config(detector: D, video: VideoInfo) -> Result<Self> {
        Self::new(detector, SessionConfig::default(), video)
    }

    /// Process the next frame of the stream.
    ///
    /// Detection runs only on sampled frames. Detector errors and malformed
    /// detector output are contained here and reported as
    /// [`FrameOutcome::Failed`]; they never end the session.
    pub fn process_frame(&mut self, input: &[u8]) -> FrameOutcome {
        let frame_index = self.frame_index + 1;

        let decision = match self.session.sample(frame_index) {
            Ok(decision) => decision,
            Err(error) => return FrameOutcome::Failed { frame_index, error },
        };

        let outcome = match decision {
            FrameDecision::EndOfStream => return FrameOutcome::StreamEnded,
            FrameDecision::Passthrough => FrameOutcome::Passthrough { frame_index },
            FrameDecision::Analyze => self.analyze(frame_index, input),
        };

        self.frame_index = frame_index;
        if frame_index % PROGRESS_INTERVAL == 0 {
            match self.session.video().total_frames {
                Some(total) => info!("Processed {frame_index}/{total} frames"),
                None => info!("Processed {frame_index} frames"),
            }
        }
        outcome
    }

    fn analyze(&mut self, frame_index: u64, input: &[u8]) -> FrameOutcome {
        let video = *self.session.video();
        let frame = FrameRef {
            index: frame_index,
            data: input,
            width: video.width,
            height: video.height,
        };

        let result = match self.detector.detect(&frame) {
            Ok(detections) => self.session.analyze(frame_index, &detections),
            Err(err) => Err(Error::DetectionFailure {
                frame_index,
                reason: err.to_string(),
            }),
        };

        match result {
            Ok(analysis) => FrameOutcome::Analyzed(analysis),
            Err(err) => {
                let error = if matches!(err, Error::DetectionFailure { .. }) {
                    err
                } else {
                    Error::DetectionFailure {
                        frame_index,
                        reason: err.to_string(),
                    }
                };
                if let Err(rejected) = self.session.record_failure(frame_index, &error) {
                    warn!(frame_index, %rejected, "failure not recorded");
                }
                FrameOutcome::Failed { frame_index, error }
            }
        }
    }

    /// Summary of everything processed so far.
    pub fn statistics(&self) -> SessionStatistics {
        self.session.statistics()
    }

    /// Final aggregation.
    pub fn finish(self) -> SessionStatistics {
        self.session.finish()
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Get a reference to the underlying session.
    pub fn session(&self) -> &RallySession {
        &self.session
    }
}
