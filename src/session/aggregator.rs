//! Running session totals.

use std::collections::{BTreeMap, VecDeque};

use crate::tracker::{Centroid, TrackId};

use super::statistics::SessionStatistics;

#[derive(Debug, Clone, Default)]
pub struct StatisticsAggregator {
    analyzed_frames: u64,
    players_detected: u64,
    ball_frames: u64,
    ball_hit_count: u64,
    frames_read: u64,
    failed_frames: u64,
    player_positions: VecDeque<Centroid>,
    ball_positions: VecDeque<Centroid>,
    history_limit: Option<usize>,
}

impl StatisticsAggregator {
    /// `history_limit` bounds each position history to its most recent
    /// entries; `None` keeps everything.
    pub fn new(history_limit: Option<usize>) -> Self {
        Self {
            history_limit,
            ..Self::default()
        }
    }

    pub fn record_frame_read(&mut self) {
        self.frames_read += 1;
    }

    pub fn record_failure(&mut self) {
        self.failed_frames += 1;
    }

    /// Fold one analyzed frame into the totals.
    pub fn record_analysis(&mut self, players: &[Centroid], balls: &[Centroid], ball_hit: bool) {
        self.analyzed_frames += 1;
        self.players_detected += players.len() as u64;
        if !balls.is_empty() {
            self.ball_frames += 1;
        }
        if ball_hit {
            self.ball_hit_count += 1;
        }
        let limit = self.history_limit;
        push_bounded(&mut self.player_positions, players, limit);
        push_bounded(&mut self.ball_positions, balls, limit);
    }

    pub fn analyzed_frames(&self) -> u64 {
        self.analyzed_frames
    }

    pub fn ball_hit_count(&self) -> u64 {
        self.ball_hit_count
    }

    pub fn average_players_per_frame(&self) -> f64 {
        if self.analyzed_frames == 0 {
            return 0.0;
        }
        self.players_detected as f64 / self.analyzed_frames as f64
    }

    /// Seconds of video in which the ball was visible, to two decimals.
    pub fn rally_duration_seconds(&self, fps: f64) -> f64 {
        if self.ball_frames == 0 || !(fps.is_finite() && fps > 0.0) {
            return 0.0;
        }
        round2(self.ball_frames as f64 / fps)
    }

    pub fn summarize(
        &self,
        unique_players: u32,
        player_distances_m: BTreeMap<TrackId, f64>,
        fps: f64,
    ) -> SessionStatistics {
        SessionStatistics {
            total_frames: self.analyzed_frames,
            players_detected: self.players_detected,
            unique_players,
            ball_detections: self.ball_frames,
            average_players_per_frame: self.average_players_per_frame(),
            ball_hit_count: self.ball_hit_count,
            rally_duration_seconds: self.rally_duration_seconds(fps),
            player_distances_m,
            frames_read: self.frames_read,
            failed_frames: self.failed_frames,
            player_positions: self.player_positions.iter().copied().collect(),
            ball_positions: self.ball_positions.iter().copied().collect(),
        }
    }
}

fn push_bounded(history: &mut VecDeque<Centroid>, points: &[Centroid], limit: Option<usize>) {
    history.extend(points.iter().copied());
    if let Some(limit) = limit {
        let excess = history.len().saturating_sub(limit);
        history.drain(..excess);
    }
}

/// Two-decimal rounding with ties to even, so 0.125 becomes 0.12.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
