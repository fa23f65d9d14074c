//! Camera Capture Library for the Drowsiness Monitor
//!
//! Provides the frame types and the capture-source contract the detection
//! pipeline consumes:
//! - RGB video frames with grayscale conversion for detection
//! - `FrameSource`: blocking, ordered frame delivery; release via `Drop`
//! - A deterministic synthetic source for tests and camera-less diagnostics

pub mod frame;
pub mod source;

pub use frame::{GrayFrame, VideoFrame};
pub use source::{FrameSource, SyntheticSource};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Camera error types
#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Failed to open camera {index}: {reason}")]
    Open { index: u32, reason: String },

    #[error("Frame read failed: {0}")]
    Read(String),

    #[error("Invalid frame geometry: {0}")]
    Geometry(String),
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Device index (0 = default camera)
    #[serde(default)]
    pub index: u32,
    /// Capture width
    #[serde(default = "default_width")]
    pub width: u32,
    /// Capture height
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_width() -> u32 {
    640
}

fn default_height() -> u32 {
    480
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            width: 640,
            height: 480,
        }
    }
}

impl CameraConfig {
    /// Config for a given device index at the default resolution
    pub fn with_index(index: u32) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }
}
