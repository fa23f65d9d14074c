//! Per-frame analysis results

use crate::landmarks::LandmarkSet;
use crate::predictor::FaceRegion;
use crate::state::DrowsinessPhase;
use crate::tracker::TrackId;
use serde::{Deserialize, Serialize};

/// An alert that fired during one frame's state update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertSignal {
    /// Track whose closure crossed the threshold
    pub track: TrackId,
    /// Averaged EAR on the firing frame
    pub ear: f64,
    /// Consecutive closed frames at firing time
    pub consecutive_closed_frames: u32,
}

/// One face's detection outcome for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceAnalysis {
    /// Stable track identity
    pub track: TrackId,
    /// Face bounding box
    pub region: FaceRegion,
    /// Averaged eye aspect ratio over both eyes
    pub ear: f64,
    /// Phase after this frame's state update
    pub phase: DrowsinessPhase,
    /// Consecutive closed frames after this frame's update
    pub consecutive_closed_frames: u32,
    /// Landmarks for overlay rendering; not serialized
    #[serde(skip)]
    pub landmarks: Option<LandmarkSet>,
}

/// Complete result of processing one frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameAnalysis {
    /// Source frame sequence number
    pub sequence: u64,
    /// Whether at least one face was detected
    pub face_detected: bool,
    /// Per-face outcomes; faces with data-quality failures are omitted
    pub faces: Vec<FaceAnalysis>,
    /// Alerts fired on this frame
    pub alerts: Vec<AlertSignal>,
}

impl FrameAnalysis {
    /// Whether any alert fired on this frame
    pub fn has_alerts(&self) -> bool {
        !self.alerts.is_empty()
    }
}
