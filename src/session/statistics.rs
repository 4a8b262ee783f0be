//! Per-frame outputs and the end-of-session summary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tracker::{Centroid, Rect, TrackId};

/// A player detection with the identity it was assigned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerObservation {
    pub track_id: TrackId,
    pub centroid: Centroid,
    pub bbox: Rect,
}

impl PlayerObservation {
    /// Label drawn next to the player, e.g. `P3`.
    pub fn label(&self) -> String {
        format!("P{}", self.track_id)
    }
}

/// Result of one analyzed frame, for annotators and other observers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameAnalysis {
    /// 1-based index of the frame in the input stream
    pub frame_index: u64,
    pub players: Vec<PlayerObservation>,
    /// Centroid of the ball used for hit inference, if one was detected
    pub ball: Option<Centroid>,
    pub ball_hit: bool,
    /// Hits counted so far in the session, this frame included
    pub ball_hit_count: u64,
}

impl FrameAnalysis {
    /// Status line rendered at the top of annotated frames.
    pub fn overlay_text(&self) -> String {
        format!(
            "Frame: {} | Players: {} | Ball Hits: {}",
            self.frame_index,
            self.players.len(),
            self.ball_hit_count
        )
    }
}

/// Session summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatistics {
    /// Analyzed frames
    pub total_frames: u64,
    /// Player detections summed over analyzed frames (not unique)
    pub players_detected: u64,
    /// Highest track id assigned
    pub unique_players: u32,
    /// Analyzed frames with at least one ball detection
    pub ball_detections: u64,
    pub average_players_per_frame: f64,
    pub ball_hit_count: u64,
    pub rally_duration_seconds: f64,
    pub player_distances_m: BTreeMap<TrackId, f64>,
    /// Every frame handed to the session before the cutoff, passthrough included
    pub frames_read: u64,
    /// Frames whose detection failed and were forwarded unannotated
    pub failed_frames: u64,
    pub player_positions: Vec<Centroid>,
    pub ball_positions: Vec<Centroid>,
}

impl SessionStatistics {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Total distance covered by all players, in meters.
    pub fn total_distance_m(&self) -> f64 {
        self.player_distances_m.values().sum()
    }
}
