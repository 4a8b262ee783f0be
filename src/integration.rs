//! Integration module for connecting object detection backends with a rally session.
//!
//! The detector itself lives outside this crate. This module provides the trait
//! it implements, a builder for its output, a replay source for recorded
//! detections and the pipeline that drives a session frame by frame.

mod builder;
mod detector;
mod pipeline;
mod replay;

pub use builder::DetectionBuilder;
pub use detector::{DetectionSource, FrameRef, IntoDetections};
pub use pipeline::{FrameOutcome, SessionPipeline};
pub use replay::{RecordedDetection, RecordedFrame, Recording, ReplayError, ReplaySource};
