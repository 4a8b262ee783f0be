use super::Centroid;

/// Axis-aligned bounding box in pixel coordinates.
///
/// Stored as top-left corner plus size, constructed from the detector's
/// TLBR output `(x1, y1, x2, y2)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// Top-left x coordinate
    pub x: f32,
    /// Top-left y coordinate
    pub y: f32,
    /// Width of the bounding box
    pub width: f32,
    /// Height of the bounding box
    pub height: f32,
}

impl Rect {
    /// Create a new Rect from top-left coordinates and dimensions (TLWH format).
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a Rect from TLBR format (top-left x, top-left y, bottom-right x, bottom-right y).
    #[inline]
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        }
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [f32; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }

    /// Midpoint of the box, the canonical position of a detection.
    #[inline]
    pub fn centroid(&self) -> Centroid {
        Centroid::new(
            f64::from(self.x) + f64::from(self.width) / 2.0,
            f64::from(self.y) + f64::from(self.height) / 2.0,
        )
    }

    /// Get the area of the bounding box.
    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// True when every coordinate is finite and the box is not inverted.
    pub fn is_well_formed(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width >= 0.0
            && self.height >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tlbr() {
        let rect = Rect::from_tlbr(10.0, 20.0, 40.0, 60.0);
        assert_eq!(rect, Rect::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!(rect.to_tlbr(), [10.0, 20.0, 40.0, 60.0]);
        assert_eq!(rect.area(), 1200.0);
    }

    #[test]
    fn test_centroid_is_midpoint() {
        let rect = Rect::from_tlbr(80.0, 60.0, 120.0, 140.0);
        let c = rect.centroid();
        assert_eq!(c.x, 100.0);
        assert_eq!(c.y, 100.0);
    }

    #[test]
    fn test_centroid_keeps_fraction() {
        let c = Rect::from_tlbr(0.0, 0.0, 5.0, 3.0).centroid();
        assert!((c.x - 2.5).abs() < 1e-9);
        assert!((c.y - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_well_formed() {
        assert!(Rect::from_tlbr(0.0, 0.0, 10.0, 10.0).is_well_formed());
        // Degenerate boxes are still usable as a point.
        assert!(Rect::from_tlbr(5.0, 5.0, 5.0, 5.0).is_well_formed());
        assert!(!Rect::from_tlbr(10.0, 0.0, 0.0, 10.0).is_well_formed());
        assert!(!Rect::from_tlbr(f32::NAN, 0.0, 10.0, 10.0).is_well_formed());
        assert!(!Rect::from_tlbr(0.0, 0.0, f32::INFINITY, 10.0).is_well_formed());
    }
}
