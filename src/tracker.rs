mod ball;
mod detection;
pub mod matching;
mod player_track;
mod player_tracker;
mod rect;
mod units;

/// Position of a detection in pixel space: the midpoint of its bounding box.
pub type Centroid = nalgebra::Point2<f64>;

pub use ball::BallEventDetector;
pub use detection::{ClassifiedDetections, Detection, DetectionFilter};
pub use player_track::{PlayerTrack, TrackId};
pub use player_tracker::{PlayerTracker, TrackerConfig};
pub use rect::Rect;
pub use units::{CourtDimensions, UnitConverter};
