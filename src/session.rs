mod aggregator;
mod rally_session;
mod sampler;
mod statistics;

pub use aggregator::StatisticsAggregator;
pub use rally_session::{RallySession, VideoInfo};
pub use sampler::{FrameDecision, FrameSampler};
pub use statistics::{FrameAnalysis, PlayerObservation, SessionStatistics};
