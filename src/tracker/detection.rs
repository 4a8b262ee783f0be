//! Detector output and class/confidence filtering.

use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::tracker::rect::Rect;

/// Detection input for the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Detector class label (COCO ids by default: 0 person, 32 sports ball)
    pub class_id: u32,
    /// Detection confidence score
    pub score: f32,
    /// Bounding box, built from TLBR format (x1, y1, x2, y2)
    pub bbox: Rect,
}

impl Detection {
    pub fn new(class_id: u32, score: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            class_id,
            score,
            bbox: Rect::from_tlbr(x1, y1, x2, y2),
        }
    }

    pub fn from_rect(class_id: u32, bbox: Rect, score: f32) -> Self {
        Self {
            class_id,
            score,
            bbox,
        }
    }

    /// Reject output a well-behaved detector never produces.
    pub fn validate(&self) -> Result<()> {
        if !self.score.is_finite() || !(0.0..=1.0).contains(&self.score) {
            return Err(Error::MalformedDetection(format!(
                "score {} outside [0, 1]",
                self.score
            )));
        }
        if !self.bbox.is_well_formed() {
            return Err(Error::MalformedDetection(format!(
                "bounding box {:?} is not finite or is inverted",
                self.bbox.to_tlbr()
            )));
        }
        Ok(())
    }
}

/// Detections of one frame that passed the class and confidence filters.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedDetections {
    pub players: Vec<Detection>,
    pub balls: Vec<Detection>,
}

impl ClassifiedDetections {
    /// The ball detection fed to the event detector: the most confident one.
    pub fn best_ball(&self) -> Option<&Detection> {
        self.balls
            .iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
    }
}

/// Class/confidence filter. Ball detections are noisier and rarer than
/// players, so they are accepted at a much lower confidence.
#[derive(Debug, Clone, Copy)]
pub struct DetectionFilter {
    pub player_class_id: u32,
    pub player_confidence: f32,
    pub ball_class_id: u32,
    pub ball_confidence: f32,
}

impl DetectionFilter {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            player_class_id: config.player_class_id,
            player_confidence: config.player_confidence,
            ball_class_id: config.ball_class_id,
            ball_confidence: config.ball_confidence,
        }
    }

    /// Validate every detection, then split by class keeping input order.
    ///
    /// A single malformed detection fails the whole frame.
    pub fn classify(&self, detections: &[Detection]) -> Result<ClassifiedDetections> {
        let mut classified = ClassifiedDetections::default();
        for det in detections {
            det.validate()?;
            if det.class_id == self.player_class_id && det.score > self.player_confidence {
                classified.players.push(det.clone());
            } else if det.class_id == self.ball_class_id && det.score > self.ball_confidence {
                classified.balls.push(det.clone());
            }
        }
        Ok(classified)
    }
}

impl Default for DetectionFilter {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}
