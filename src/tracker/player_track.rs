//! Single player identity.

use serde::Serialize;

use crate::tracker::Centroid;

pub type TrackId = u32;

/// Persistent player identity with its travel so far.
///
/// A track is never removed during a session: if no detection matches it in a
/// frame it simply keeps its last position and stays eligible for matching.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerTrack {
    /// Unique track identifier, assigned from 1 in creation order
    pub track_id: TrackId,
    /// Centroid of the most recent matched detection
    pub last_position: Centroid,
    /// Real-world distance covered, in meters
    pub cumulative_distance_m: f64,
    /// Analyzed-frame counter value when the track was created
    pub start_frame: u32,
    /// Analyzed-frame counter value of the last update
    pub frame_id: u32,
    /// Number of detections assigned to this track
    pub observations: u32,
}

impl PlayerTrack {
    pub fn new(track_id: TrackId, position: Centroid, frame_id: u32) -> Self {
        Self {
            track_id,
            last_position: position,
            cumulative_distance_m: 0.0,
            start_frame: frame_id,
            frame_id,
            observations: 1,
        }
    }

    /// Move the track to `position`, adding `distance_m` to its travel.
    pub fn update(&mut self, position: Centroid, distance_m: f64, frame_id: u32) {
        debug_assert!(distance_m >= 0.0);
        self.cumulative_distance_m += distance_m.max(0.0);
        self.last_position = position;
        self.frame_id = frame_id;
        self.observations += 1;
    }
}
