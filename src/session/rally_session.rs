//! Session state: one tracker, ball detector and aggregator per video.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::tracker::{
    BallEventDetector, Centroid, Detection, DetectionFilter, PlayerTracker, TrackerConfig,
    UnitConverter,
};

use super::aggregator::StatisticsAggregator;
use super::sampler::{FrameDecision, FrameSampler};
use super::statistics::{FrameAnalysis, PlayerObservation, SessionStatistics};

/// Properties of the video being processed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    /// Frame count reported by the container, used for progress logs only
    #[serde(default)]
    pub total_frames: Option<u64>,
}

impl VideoInfo {
    pub fn new(width: u32, height: u32, fps: f64) -> Self {
        Self {
            width,
            height,
            fps,
            total_frames: None,
        }
    }

    pub fn with_total_frames(mut self, total_frames: u64) -> Self {
        self.total_frames = Some(total_frames);
        self
    }
}

/// All mutable state of one processing session.
///
/// Frames must be presented in increasing index order. Use [`sample`] to
/// decide what to do with each frame, then either [`analyze`] it with the
/// detector output or [`record_failure`] if detection failed.
///
/// [`sample`]: RallySession::sample
/// [`analyze`]: RallySession::analyze
/// [`record_failure`]: RallySession::record_failure
#[derive(Debug, Clone)]
pub struct RallySession {
    config: SessionConfig,
    video: VideoInfo,
    sampler: FrameSampler,
    converter: UnitConverter,
    filter: DetectionFilter,
    tracker: PlayerTracker,
    ball: BallEventDetector,
    aggregator: StatisticsAggregator,
    last_frame: u64,
    last_analyzed: u64,
    ended: bool,
}

impl RallySession {
    /// Validate the configuration and build fresh per-session state.
    ///
    /// Fails before any frame is touched on non-positive dimensions or an
    /// out-of-range configuration value.
    pub fn new(config: SessionConfig, video: VideoInfo) -> Result<Self> {
        config.validate()?;
        if !(video.fps.is_finite() && video.fps > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "fps must be positive, got {}",
                video.fps
            )));
        }
        let converter = UnitConverter::new(
            config.court(),
            f64::from(video.width),
            f64::from(video.height),
        )?;
        let sampler = FrameSampler::new(config.frame_stride, config.max_frames)?;

        info!(
            width = video.width,
            height = video.height,
            fps = video.fps,
            total_frames = ?video.total_frames,
            scale_x = converter.scale_x(),
            scale_y = converter.scale_y(),
            "starting rally session"
        );

        Ok(Self {
            sampler,
            converter,
            filter: DetectionFilter::from_config(&config),
            tracker: PlayerTracker::new(TrackerConfig::from(&config)),
            ball: BallEventDetector::new(config.ball_hit_threshold_px),
            aggregator: StatisticsAggregator::new(config.history_limit),
            last_frame: 0,
            last_analyzed: 0,
            ended: false,
            config,
            video,
        })
    }

    /// Decide how to handle `frame_index`. Once the cutoff is hit every later
    /// call returns [`FrameDecision::EndOfStream`].
    pub fn sample(&mut self, frame_index: u64) -> Result<FrameDecision> {
        if self.ended {
            return Ok(FrameDecision::EndOfStream);
        }
        if frame_index <= self.last_frame {
            return Err(Error::FrameOrder {
                frame_index,
                last: self.last_frame,
            });
        }
        let decision = self.sampler.decide(frame_index);
        if decision == FrameDecision::EndOfStream {
            info!(frame_index, "frame limit reached, ending session");
            self.ended = true;
        } else {
            self.observe_frame(frame_index);
        }
        Ok(decision)
    }

    /// Run tracking and hit inference on one analyzed frame.
    ///
    /// Only frames the sampler selects are accepted, and nothing is accepted
    /// once the frame limit has ended the session. On error (malformed
    /// detections, out-of-order or unsampled frame) no statistic changes.
    pub fn analyze(&mut self, frame_index: u64, detections: &[Detection]) -> Result<FrameAnalysis> {
        self.ensure_analyzable(frame_index)?;
        if frame_index < self.last_frame || frame_index <= self.last_analyzed {
            return Err(Error::FrameOrder {
                frame_index,
                last: self.last_frame.max(self.last_analyzed),
            });
        }
        let classified = self.filter.classify(detections)?;
        self.observe_frame(frame_index);
        self.last_analyzed = frame_index;

        let players: Vec<Centroid> = classified
            .players
            .iter()
            .map(|d| d.bbox.centroid())
            .collect();
        let assigned = self.tracker.update(&players, &self.converter);

        let ball = classified.best_ball().map(|d| d.bbox.centroid());
        let hit = self.ball.update(ball);
        let balls: Vec<Centroid> = classified
            .balls
            .iter()
            .map(|d| d.bbox.centroid())
            .collect();

        self.aggregator.record_analysis(&players, &balls, hit);

        let observations = assigned
            .into_iter()
            .zip(&classified.players)
            .map(|((track_id, centroid), det)| PlayerObservation {
                track_id,
                centroid,
                bbox: det.bbox,
            })
            .collect();

        Ok(FrameAnalysis {
            frame_index,
            players: observations,
            ball,
            ball_hit: hit,
            ball_hit_count: self.aggregator.ball_hit_count(),
        })
    }

    /// Note a frame whose detection failed. The frame is excluded from all
    /// statistics except the failure count.
    ///
    /// The same frames as [`analyze`](RallySession::analyze) are accepted.
    pub fn record_failure(&mut self, frame_index: u64, error: &Error) -> Result<()> {
        self.ensure_analyzable(frame_index)?;
        warn!(frame_index, %error, "frame skipped");
        self.observe_frame(frame_index);
        self.aggregator.record_failure();
        Ok(())
    }

    fn ensure_analyzable(&mut self, frame_index: u64) -> Result<()> {
        if self.ended {
            return Err(Error::SessionEnded { frame_index });
        }
        match self.sampler.decide(frame_index) {
            FrameDecision::Analyze => Ok(()),
            FrameDecision::Passthrough => Err(Error::NotSampled { frame_index }),
            FrameDecision::EndOfStream => {
                info!(frame_index, "frame limit reached, ending session");
                self.ended = true;
                Err(Error::SessionEnded { frame_index })
            }
        }
    }

    fn observe_frame(&mut self, frame_index: u64) {
        if frame_index > self.last_frame {
            self.last_frame = frame_index;
            self.aggregator.record_frame_read();
        }
    }

    /// Summary of everything processed so far.
    pub fn statistics(&self) -> SessionStatistics {
        self.aggregator.summarize(
            self.tracker.unique_players(),
            self.tracker.distances_m(),
            self.video.fps,
        )
    }

    /// Final aggregation. Consumes the session.
    pub fn finish(self) -> SessionStatistics {
        let stats = self.statistics();
        info!(
            total_frames = stats.total_frames,
            frames_read = stats.frames_read,
            failed_frames = stats.failed_frames,
            unique_players = stats.unique_players,
            ball_hit_count = stats.ball_hit_count,
            rally_duration_seconds = stats.rally_duration_seconds,
            "rally session complete"
        );
        stats
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Highest frame index seen so far.
    pub fn last_frame(&self) -> u64 {
        self.last_frame
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn video(&self) -> &VideoInfo {
        &self.video
    }

    pub fn converter(&self) -> &UnitConverter {
        &self.converter
    }

    pub fn tracker(&self) -> &PlayerTracker {
        &self.tracker
    }

    pub fn ball(&self) -> &BallEventDetector {
        &self.ball
    }
}
