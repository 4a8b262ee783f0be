//! Gated nearest-neighbour player tracker.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::{Association, SessionConfig};
use crate::tracker::Centroid;
use crate::tracker::matching;
use crate::tracker::player_track::{PlayerTrack, TrackId};
use crate::tracker::units::UnitConverter;

/// Configuration for the PlayerTracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerConfig {
    /// A detection matches a track only if strictly closer than this (pixels).
    pub gating_radius_px: f64,
    pub association: Association,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}

impl From<&SessionConfig> for TrackerConfig {
    fn from(config: &SessionConfig) -> Self {
        Self {
            gating_radius_px: config.gating_radius_px,
            association: config.association,
        }
    }
}

/// Assigns session-stable ids to player detections and accumulates the
/// distance each identity travels.
#[derive(Debug, Clone)]
pub struct PlayerTracker {
    tracks: BTreeMap<TrackId, PlayerTrack>,
    next_id: TrackId,
    frame_id: u32,
    config: TrackerConfig,
}

impl PlayerTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            tracks: BTreeMap::new(),
            next_id: 1,
            frame_id: 0,
            config,
        }
    }

    /// Associate this frame's player centroids with tracks.
    ///
    /// Returns `(track_id, centroid)` in the same order as `detections`.
    /// Detections are only matched against tracks that existed before this
    /// call; unmatched detections open new tracks in input order.
    pub fn update(
        &mut self,
        detections: &[Centroid],
        converter: &UnitConverter,
    ) -> Vec<(TrackId, Centroid)> {
        self.frame_id += 1;

        // Step 1: Snapshot of existing tracks, ordered by id
        let (pool_ids, pool_points): (Vec<TrackId>, Vec<Centroid>) = self
            .tracks
            .values()
            .map(|t| (t.track_id, t.last_position))
            .unzip();

        // Step 2: Association
        let dists = matching::euclidean_distance(&pool_points, detections);
        let gate = self.config.gating_radius_px;
        let assigned = match self.config.association {
            Association::Greedy => matching::greedy_nearest(&dists, gate),
            Association::Optimal => {
                matching::linear_assignment(&dists, gate).track_for_detections(detections.len())
            }
        };

        // Step 3: Update matched tracks, init new ones
        let mut output = Vec::with_capacity(detections.len());
        for (&position, row) in detections.iter().zip(assigned) {
            let track_id = match row {
                Some(row) => {
                    let track_id = pool_ids[row];
                    if let Some(track) = self.tracks.get_mut(&track_id) {
                        let moved = position - track.last_position;
                        let distance_m = converter.displacement_m(&moved);
                        track.update(position, distance_m, self.frame_id);
                    }
                    track_id
                }
                None => self.start_track(position),
            };
            output.push((track_id, position));
        }

        output
    }

    fn start_track(&mut self, position: Centroid) -> TrackId {
        let track_id = self.next_id;
        self.next_id += 1;
        debug!(
            track_id,
            x = position.x,
            y = position.y,
            frame = self.frame_id,
            "new player track"
        );
        let track = PlayerTrack::new(track_id, position, self.frame_id);
        self.tracks.insert(track_id, track);
        track_id
    }

    pub fn get(&self, track_id: TrackId) -> Option<&PlayerTrack> {
        self.tracks.get(&track_id)
    }

    /// All tracks ordered by id.
    pub fn tracks(&self) -> impl Iterator<Item = &PlayerTrack> {
        self.tracks.values()
    }

    /// Highest id assigned so far (0 before the first player is seen).
    pub fn unique_players(&self) -> u32 {
        self.next_id - 1
    }

    pub fn distances_m(&self) -> BTreeMap<TrackId, f64> {
        self.tracks
            .values()
            .map(|t| (t.track_id, t.cumulative_distance_m))
            .collect()
    }

    /// Number of `update` calls so far.
    pub fn frame_id(&self) -> u32 {
        self.frame_id
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }
}

impl Default for PlayerTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::units::CourtDimensions;

    fn converter() -> UnitConverter {
        UnitConverter::new(CourtDimensions::default(), 1280.0, 720.0).unwrap()
    }

    fn c(x: f64, y: f64) -> Centroid {
        Centroid::new(x, y)
    }

    #[test]
    fn test_first_player_gets_id_one() {
        let mut tracker = PlayerTracker::default();
        let out = tracker.update(&[c(100.0, 100.0)], &converter());
        assert_eq!(out, vec![(1, c(100.0, 100.0))]);
        assert_eq!(tracker.get(1).unwrap().cumulative_distance_m, 0.0);
        assert_eq!(tracker.unique_players(), 1);
    }

    #[test]
    fn test_match_within_gate_accumulates_distance() {
        let conv = converter();
        let mut tracker = PlayerTracker::default();
        tracker.update(&[c(100.0, 100.0)], &conv);
        let out = tracker.update(&[c(103.0, 104.0)], &conv);

        assert_eq!(out, vec![(1, c(103.0, 104.0))]);
        assert_eq!(tracker.unique_players(), 1);
        let track = tracker.get(1).unwrap();
        assert!((track.cumulative_distance_m - conv.distance_m(3.0, 4.0)).abs() < 1e-12);
        assert_eq!(track.last_position, c(103.0, 104.0));
    }

    #[test]
    fn test_outside_gate_opens_new_track() {
        let conv = converter();
        let mut tracker = PlayerTracker::default();
        tracker.update(&[c(100.0, 100.0)], &conv);
        let out = tracker.update(&[c(200.0, 100.0)], &conv);
        // Exactly on the gate is not a match.
        assert_eq!(out[0].0, 2);
        assert_eq!(tracker.get(1).unwrap().last_position, c(100.0, 100.0));
    }

    #[test]
    fn test_output_keeps_input_order() {
        let conv = converter();
        let mut tracker = PlayerTracker::default();
        tracker.update(&[c(100.0, 100.0), c(600.0, 400.0)], &conv);
        let out = tracker.update(&[c(605.0, 400.0), c(900.0, 100.0), c(98.0, 101.0)], &conv);
        let ids: Vec<TrackId> = out.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_unmatched_track_persists() {
        let conv = converter();
        let mut tracker = PlayerTracker::default();
        tracker.update(&[c(100.0, 100.0)], &conv);
        tracker.update(&[], &conv);
        tracker.update(&[c(640.0, 360.0)], &conv);
        let out = tracker.update(&[c(110.0, 100.0)], &conv);
        assert_eq!(out[0].0, 1);
        let track = tracker.get(1).unwrap();
        assert_eq!(track.frame_id, tracker.frame_id());
        assert_eq!(track.start_frame, 1);
    }

    #[test]
    fn test_greedy_lets_two_detections_share_a_track() {
        let conv = converter();
        let mut tracker = PlayerTracker::default();
        tracker.update(&[c(100.0, 100.0)], &conv);
        let out = tracker.update(&[c(110.0, 100.0), c(90.0, 100.0)], &conv);
        assert_eq!(out[0].0, 1);
        assert_eq!(out[1].0, 1);
        assert_eq!(tracker.unique_players(), 1);

        // Second claim moves from the position written by the first.
        let track = tracker.get(1).unwrap();
        let expected = conv.distance_m(10.0, 0.0) + conv.distance_m(20.0, 0.0);
        assert!((track.cumulative_distance_m - expected).abs() < 1e-12);
        assert_eq!(track.last_position, c(90.0, 100.0));
    }

    #[test]
    fn test_optimal_association_is_one_to_one() {
        let conv = converter();
        let mut tracker = PlayerTracker::new(TrackerConfig {
            association: Association::Optimal,
            ..TrackerConfig::default()
        });
        tracker.update(&[c(100.0, 100.0)], &conv);
        let out = tracker.update(&[c(110.0, 100.0), c(95.0, 100.0)], &conv);
        // The closer detection keeps id 1, the other starts a new identity.
        assert_eq!(out[1].0, 1);
        assert_eq!(out[0].0, 2);
        let track = tracker.get(1).unwrap();
        assert!((track.cumulative_distance_m - conv.distance_m(5.0, 0.0)).abs() < 1e-12);
    }

    #[test]
    fn test_new_tracks_are_not_matched_in_same_frame() {
        let conv = converter();
        let mut tracker = PlayerTracker::default();
        let out = tracker.update(&[c(100.0, 100.0), c(105.0, 100.0)], &conv);
        assert_eq!(out[0].0, 1);
        assert_eq!(out[1].0, 2);
    }

    #[test]
    fn test_distances_cover_every_track() {
        let conv = converter();
        let mut tracker = PlayerTracker::default();
        tracker.update(&[c(100.0, 100.0), c(600.0, 400.0)], &conv);
        tracker.update(&[c(100.0, 110.0)], &conv);
        let distances = tracker.distances_m();
        assert_eq!(distances.len(), 2);
        assert_eq!(distances[&2], 0.0);
        assert!(distances[&1] > 0.0);
    }
}
