//! Drowsiness Detection Core
//!
//! Per-frame drowsiness inference from facial landmarks:
//! - Eye-aspect-ratio (EAR) geometry over eye-contour landmarks
//! - 68-point landmark normalization and eye slicing
//! - Per-subject hysteresis state machine (open -> closing -> alerting)
//! - Frame pipeline orchestrating detection, tracking, and state updates
//! - Rolling frames-per-second estimation
//!
//! Face detection and landmark localization are external capabilities
//! behind the traits in [`predictor`]; nothing in this crate depends on
//! which implementation is plugged in.

pub mod analysis;
pub mod config;
pub mod geometry;
pub mod landmarks;
pub mod perf;
pub mod pipeline;
pub mod predictor;
pub mod state;
pub mod tracker;

pub use analysis::{AlertSignal, FaceAnalysis, FrameAnalysis};
pub use config::{AlertPolicy, DetectionConfig};
pub use geometry::{eye_aspect_ratio, Point};
pub use landmarks::LandmarkSet;
pub use perf::PerformanceMonitor;
pub use pipeline::FrameProcessingPipeline;
pub use predictor::{
    CenterRegionDetector, DisabledPredictor, FaceDetector, FaceRegion, LandmarkPredictor,
};
pub use state::{DrowsinessPhase, DrowsinessState};
pub use tracker::{FaceTracker, TrackId};

use thiserror::Error;

/// Detection error types
#[derive(Error, Debug)]
pub enum DrowsinessError {
    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    #[error("Predictor returned {actual} landmarks, expected {expected}")]
    LandmarkCount { expected: usize, actual: usize },

    #[error("Degenerate eye geometry: horizontal corner landmarks coincide")]
    DegenerateEye,

    #[error("Face detection failed: {0}")]
    Detection(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
