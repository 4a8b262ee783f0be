//! Trait for object detection inference backends.

use std::fmt::Display;

use crate::tracker::Detection;

/// One decoded video frame handed to a detector.
#[derive(Debug, Clone, Copy)]
pub struct FrameRef<'a> {
    /// 1-based index of the frame in the stream
    pub index: u64,
    /// Raw image bytes (format depends on the detector)
    pub data: &'a [u8],
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

/// Trait for object detection inference backends.
///
/// Implement this trait to connect any detection model to a session.
///
/// # Example
///
/// ```ignore
/// use rallytrack_rs::{Detection, DetectionSource, FrameRef};
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl DetectionSource for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, frame: &FrameRef<'_>) -> Result<Vec<Detection>, Self::Error> {
///         // Run inference and return detections
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for detection failures.
    type Error: Display;

    /// Run inference on one frame and return all detections, unfiltered.
    fn detect(&mut self, frame: &FrameRef<'_>) -> Result<Vec<Detection>, Self::Error>;
}

/// Helper trait for converting model-specific outputs to `Detection`.
///
/// Implement this for your model's output format to enable easy conversion.
pub trait IntoDetections {
    /// Convert the output into a vector of detections.
    fn into_detections(self) -> Vec<Detection>;
}

impl IntoDetections for Vec<Detection> {
    fn into_detections(self) -> Vec<Detection> {
        self
    }
}
