//! Ball hit inference from centroid velocity.
//!
//! A "hit" is any jump of the ball centroid larger than the threshold between
//! two sightings. This is a coarse proxy for a racket strike: fast straight
//! flight also trips it, and that is accepted.

use tracing::debug;

use crate::tracker::Centroid;

#[derive(Debug, Clone)]
pub struct BallEventDetector {
    last_position: Option<Centroid>,
    hit_threshold_px: f64,
}

impl BallEventDetector {
    pub fn new(hit_threshold_px: f64) -> Self {
        Self {
            last_position: None,
            hit_threshold_px,
        }
    }

    /// Feed this frame's ball centroid (`None` when no ball was detected).
    ///
    /// Returns true if the displacement from the last sighting exceeds the
    /// threshold. A missing ball leaves the last sighting in place, so the
    /// next velocity is measured across the gap.
    pub fn update(&mut self, centroid: Option<Centroid>) -> bool {
        let Some(current) = centroid else {
            return false;
        };

        let Some(previous) = self.last_position.replace(current) else {
            return false;
        };
        let velocity = nalgebra::distance(&previous, &current);
        let hit = velocity > self.hit_threshold_px;
        if hit {
            debug!(velocity, x = current.x, y = current.y, "ball hit");
        }
        hit
    }

    pub fn last_position(&self) -> Option<Centroid> {
        self.last_position
    }

    pub fn hit_threshold_px(&self) -> f64 {
        self.hit_threshold_px
    }
}

impl Default for BallEventDetector {
    fn default() -> Self {
        Self::new(50.0)
    }
}
