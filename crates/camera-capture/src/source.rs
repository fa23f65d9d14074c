//! Capture-source contract and the synthetic test source

use crate::frame::VideoFrame;
use crate::{CameraConfig, CameraError};
use tracing::{debug, info};

/// Blocking, ordered frame delivery from a capture device.
///
/// `next_frame` returns `Ok(None)` at end of stream and `Err` on a read
/// failure; a stalled device may block indefinitely. Device release happens
/// in the implementation's `Drop`, so every exit path gives the handle back.
pub trait FrameSource {
    /// Block until the next frame is available
    fn next_frame(&mut self) -> Result<Option<VideoFrame>, CameraError>;

    /// Actual capture resolution
    fn resolution(&self) -> (u32, u32);
}

/// Deterministic generated-frame source.
///
/// Stands in for a real camera in tests and in camera-less diagnostic runs.
/// Only device index 0 exists; other indices fail to open like an absent
/// device would. Frames carry a moving gradient so successive frames differ.
pub struct SyntheticSource {
    config: CameraConfig,
    sequence: u64,
    remaining: Option<u64>,
    frame_period_ms: u64,
}

impl SyntheticSource {
    /// Open the synthetic device
    pub fn open(config: CameraConfig) -> Result<Self, CameraError> {
        if config.index != 0 {
            return Err(CameraError::Open {
                index: config.index,
                reason: "no such device".into(),
            });
        }
        info!(
            width = config.width,
            height = config.height,
            "synthetic capture source opened"
        );
        Ok(Self {
            config,
            sequence: 0,
            remaining: None,
            frame_period_ms: 33,
        })
    }

    /// Limit the stream to `frames` frames, then report end of stream
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.remaining = Some(frames);
        self
    }

    fn render(&self) -> VideoFrame {
        let (w, h) = (self.config.width, self.config.height);
        let phase = (self.sequence % 256) as u8;
        let mut data = Vec::with_capacity((w * h * 3) as usize);
        for y in 0..h {
            for x in 0..w {
                data.push(((x as u64 * 255 / w.max(1) as u64) as u8).wrapping_add(phase));
                data.push((y as u64 * 255 / h.max(1) as u64) as u8);
                data.push(phase);
            }
        }
        VideoFrame {
            data,
            width: w,
            height: h,
            timestamp_ms: self.sequence * self.frame_period_ms,
            sequence: self.sequence,
        }
    }
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self) -> Result<Option<VideoFrame>, CameraError> {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                debug!(sequence = self.sequence, "synthetic stream exhausted");
                return Ok(None);
            }
            *remaining -= 1;
        }
        let frame = self.render();
        self.sequence += 1;
        Ok(Some(frame))
    }

    fn resolution(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }
}

impl Drop for SyntheticSource {
    fn drop(&mut self) {
        debug!(frames = self.sequence, "synthetic capture source released");
    }
}
