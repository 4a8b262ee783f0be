//! Error types for session setup and per-frame processing.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A court or frame dimension was zero, negative or not finite.
    #[error("invalid dimension `{name}`: {value} (must be a positive finite number)")]
    InvalidDimension { name: &'static str, value: f64 },

    /// A configuration value is out of its accepted range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The detector raised or produced unusable output for one frame.
    #[error("detection failed on frame {frame_index}: {reason}")]
    DetectionFailure { frame_index: u64, reason: String },

    /// A single detection carried coordinates or a score that cannot be used.
    #[error("malformed detection: {0}")]
    MalformedDetection(String),

    /// Frames were handed to the session out of order.
    #[error("frame {frame_index} is not after the last processed frame {last}")]
    FrameOrder { frame_index: u64, last: u64 },

    /// A frame arrived after the frame limit ended the session.
    #[error("frame {frame_index} arrived after the session ended")]
    SessionEnded { frame_index: u64 },

    /// A frame the sampler passes through was handed in for analysis.
    #[error("frame {frame_index} is not selected for analysis")]
    NotSampled { frame_index: u64 },

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("failed to parse recorded detections: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors that only affect a single frame and must not end the session.
    pub fn is_frame_local(&self) -> bool {
        matches!(
            self,
            Error::DetectionFailure { .. } | Error::MalformedDetection(_)
        )
    }
}
