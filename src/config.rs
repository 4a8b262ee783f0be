//! Session configuration.
//!
//! All calibrated constants (gating radius, hit threshold, confidence cutoffs)
//! live here rather than in the algorithms. They were tuned on broadcast-style
//! padel footage and should be recalibrated for other resolutions or frame rates.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tracker::CourtDimensions;

/// How player detections are associated with existing tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Association {
    /// Each detection independently takes its nearest track inside the gate.
    /// Two detections in one frame may claim the same track.
    #[default]
    Greedy,
    /// One-to-one assignment minimising total pixel distance inside the gate.
    Optimal,
}

/// Configuration for a processing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Analyze every Nth frame; the rest pass through untouched.
    pub frame_stride: u32,
    /// Stop processing once the frame index exceeds this value.
    pub max_frames: Option<u64>,
    /// Maximum pixel distance (exclusive) for matching a detection to a track.
    pub gating_radius_px: f64,
    pub association: Association,
    pub player_class_id: u32,
    /// Player detections are kept when their score is strictly above this.
    pub player_confidence: f32,
    pub ball_class_id: u32,
    /// Ball detections are kept when their score is strictly above this.
    pub ball_confidence: f32,
    /// Ball displacement (pixels per analyzed frame) above which a hit is counted.
    pub ball_hit_threshold_px: f64,
    pub court_length_m: f64,
    pub court_width_m: f64,
    /// Keep only the most recent N entries of each position history.
    pub history_limit: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let court = CourtDimensions::default();
        Self {
            frame_stride: 2,
            max_frames: None,
            gating_radius_px: 100.0,
            association: Association::Greedy,
            player_class_id: 0,
            player_confidence: 0.5,
            ball_class_id: 32,
            ball_confidence: 0.1,
            ball_hit_threshold_px: 50.0,
            court_length_m: court.length_m,
            court_width_m: court.width_m,
            history_limit: None,
        }
    }
}

impl SessionConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let config: SessionConfig = serde_yaml::from_str(contents)?;
        Ok(config)
    }

    pub fn court(&self) -> CourtDimensions {
        CourtDimensions {
            length_m: self.court_length_m,
            width_m: self.court_width_m,
        }
    }

    /// Check ranges that are not covered by the unit converter's dimension checks.
    pub fn validate(&self) -> Result<()> {
        if self.frame_stride == 0 {
            return Err(Error::InvalidConfig("frame_stride must be at least 1".into()));
        }
        if !(self.gating_radius_px.is_finite() && self.gating_radius_px > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "gating_radius_px must be positive, got {}",
                self.gating_radius_px
            )));
        }
        if !(self.ball_hit_threshold_px.is_finite() && self.ball_hit_threshold_px >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "ball_hit_threshold_px must be non-negative, got {}",
                self.ball_hit_threshold_px
            )));
        }
        for (name, value) in [
            ("player_confidence", self.player_confidence),
            ("ball_confidence", self.ball_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if self.history_limit == Some(0) {
            return Err(Error::InvalidConfig(
                "history_limit must be at least 1 when set".into(),
            ));
        }
        Ok(())
    }
}
