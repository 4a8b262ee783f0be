//! Pixel to meter conversion.
//!
//! The court is assumed to fill the frame and to be seen orthogonally, so each
//! axis gets its own constant meters-per-pixel factor. This is an anisotropic
//! scaling, not a perspective correction: distances far from the camera are
//! underestimated on real broadcast footage.

use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Real-world court size in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CourtDimensions {
    /// Extent mapped onto the frame width
    pub length_m: f64,
    /// Extent mapped onto the frame height
    pub width_m: f64,
}

impl Default for CourtDimensions {
    fn default() -> Self {
        Self {
            length_m: 23.77,
            width_m: 8.23,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConverter {
    /// diag(scale_x, scale_y) in meters per pixel
    scale: Matrix2<f64>,
}

fn check_dimension(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidDimension { name, value })
    }
}

impl UnitConverter {
    pub fn new(court: CourtDimensions, frame_width_px: f64, frame_height_px: f64) -> Result<Self> {
        let length_m = check_dimension("court_length_m", court.length_m)?;
        let width_m = check_dimension("court_width_m", court.width_m)?;
        let frame_width_px = check_dimension("frame_width", frame_width_px)?;
        let frame_height_px = check_dimension("frame_height", frame_height_px)?;

        Ok(Self {
            scale: Matrix2::from_diagonal(&Vector2::new(
                length_m / frame_width_px,
                width_m / frame_height_px,
            )),
        })
    }

    #[inline]
    pub fn scale_x(&self) -> f64 {
        self.scale[(0, 0)]
    }

    #[inline]
    pub fn scale_y(&self) -> f64 {
        self.scale[(1, 1)]
    }

    /// `sqrt((dx * scale_x)^2 + (dy * scale_y)^2)`
    #[inline]
    pub fn distance_m(&self, dx: f64, dy: f64) -> f64 {
        self.displacement_m(&Vector2::new(dx, dy))
    }

    #[inline]
    pub fn displacement_m(&self, displacement_px: &Vector2<f64>) -> f64 {
        (self.scale * displacement_px).norm()
    }
}
