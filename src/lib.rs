//! Player identity tracking and rally statistics for racket-sport videos.
//!
//! The crate consumes per-frame detections from an external object detector
//! (see [`DetectionSource`]) and produces stable player ids, per-player travel
//! distance in meters, ball-hit events and a session summary.
//!
//! # Example
//!
//! ```
//! use rallytrack_rs::{RallySession, SessionConfig, VideoInfo, Detection};
//!
//! let video = VideoInfo::new(1280, 720, 30.0);
//! let mut session = RallySession::new(SessionConfig::default(), video).unwrap();
//!
//! let players = vec![Detection::new(0, 0.9, 80.0, 60.0, 120.0, 140.0)];
//! let analysis = session.analyze(2, &players).unwrap();
//! assert_eq!(analysis.players[0].track_id, 1);
//!
//! let stats = session.finish();
//! assert_eq!(stats.unique_players, 1);
//! ```

pub mod config;
pub mod error;
pub mod integration;
pub mod session;
pub mod tracker;

pub use config::{Association, SessionConfig};
pub use error::{Error, Result};
pub use integration::{
    DetectionBuilder, DetectionSource, FrameOutcome, FrameRef, IntoDetections, ReplaySource,
    SessionPipeline,
};
pub use session::{
    FrameAnalysis, FrameDecision, FrameSampler, PlayerObservation, RallySession,
    SessionStatistics, StatisticsAggregator, VideoInfo,
};
pub use tracker::{
    BallEventDetector, Centroid, CourtDimensions, Detection, PlayerTrack, PlayerTracker, Rect,
    TrackId, UnitConverter,
};
