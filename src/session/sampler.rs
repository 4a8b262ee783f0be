use crate::error::{Error, Result};

/// What the session does with a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDecision {
    /// Run detection, tracking and statistics
    Analyze,
    /// Forward unmodified; not counted in any statistic
    Passthrough,
    /// Max-frame cutoff exceeded; stop processing the session
    EndOfStream,
}

/// Picks every `stride`-th frame for analysis and applies the optional
/// max-frame cutoff. Frame indices are 1-based, so with stride 2 the
/// analyzed frames are 2, 4, 6, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSampler {
    stride: u32,
    max_frames: Option<u64>,
}

impl FrameSampler {
    pub fn new(stride: u32, max_frames: Option<u64>) -> Result<Self> {
        if stride == 0 {
            return Err(Error::InvalidConfig("frame_stride must be at least 1".into()));
        }
        Ok(Self { stride, max_frames })
    }

    pub fn decide(&self, frame_index: u64) -> FrameDecision {
        if self.max_frames.is_some_and(|max| frame_index > max) {
            FrameDecision::EndOfStream
        } else if frame_index % u64::from(self.stride) == 0 {
            FrameDecision::Analyze
        } else {
            FrameDecision::Passthrough
        }
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn max_frames(&self) -> Option<u64> {
        self.max_frames
    }
}
