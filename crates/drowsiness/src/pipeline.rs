//! Per-frame processing pipeline
//!
//! One synchronous pass per frame: grayscale conversion, face enumeration,
//! landmark extraction, per-eye EAR, averaged EAR into the per-track state
//! machine. Data-quality failures on one face are logged and isolated;
//! other faces' states are untouched.

use crate::analysis::{AlertSignal, FaceAnalysis, FrameAnalysis};
use crate::config::DetectionConfig;
use crate::geometry::eye_aspect_ratio;
use crate::landmarks::LandmarkSet;
use crate::predictor::{FaceDetector, FaceRegion, LandmarkPredictor};
use crate::state::DrowsinessState;
use crate::tracker::FaceTracker;
use crate::DrowsinessError;
use camera_capture::frame::{GrayFrame, VideoFrame};
use std::collections::HashMap;
use tracing::{debug, warn};

pub struct FrameProcessingPipeline {
    detector: Box<dyn FaceDetector>,
    predictor: Box<dyn LandmarkPredictor>,
    tracker: FaceTracker,
    states: HashMap<crate::tracker::TrackId, DrowsinessState>,
    config: DetectionConfig,
}

impl FrameProcessingPipeline {
    /// Build a pipeline over the given detection capabilities
    pub fn new(
        config: DetectionConfig,
        detector: Box<dyn FaceDetector>,
        predictor: Box<dyn LandmarkPredictor>,
    ) -> Result<Self, DrowsinessError> {
        config.validate()?;
        Ok(Self {
            detector,
            predictor,
            tracker: FaceTracker::new(),
            states: HashMap::new(),
            config,
        })
    }

    /// Process one frame to completion.
    ///
    /// A detector failure surfaces as `Err` so the caller can decide whether
    /// the stream is still usable; it does not disturb any tracked state.
    pub fn process(&mut self, frame: &VideoFrame) -> Result<FrameAnalysis, DrowsinessError> {
        let gray = frame.to_grayscale();
        let faces = self.detector.detect(&gray)?;

        let mut analysis = FrameAnalysis {
            sequence: frame.sequence,
            face_detected: !faces.is_empty(),
            ..Default::default()
        };

        if faces.is_empty() {
            debug!(sequence = frame.sequence, "no face detected");
            let assignment = self.tracker.assign(&[], &self.config);
            self.drop_retired(&assignment.retired);
            return Ok(analysis);
        }

        let centroids: Vec<(f64, f64)> = faces.iter().map(FaceRegion::centroid).collect();
        let assignment = self.tracker.assign(&centroids, &self.config);

        for (face, &track) in faces.iter().zip(&assignment.ids) {
            match self.analyze_face(&gray, face) {
                Ok((ear, landmarks)) => {
                    let state = self.states.entry(track).or_default();
                    if state.update(ear, &self.config) {
                        analysis.alerts.push(AlertSignal {
                            track,
                            ear,
                            consecutive_closed_frames: state.consecutive_closed_frames(),
                        });
                    }
                    analysis.faces.push(FaceAnalysis {
                        track,
                        region: face.clone(),
                        ear,
                        phase: state.phase(&self.config),
                        consecutive_closed_frames: state.consecutive_closed_frames(),
                        landmarks: Some(landmarks),
                    });
                }
                Err(err) => {
                    warn!(track, error = %err, "skipping face with unusable landmark data");
                }
            }
        }

        self.drop_retired(&assignment.retired);
        Ok(analysis)
    }

    fn analyze_face(
        &self,
        gray: &GrayFrame,
        face: &FaceRegion,
    ) -> Result<(f64, LandmarkSet), DrowsinessError> {
        let raw = self.predictor.predict(gray, face)?;
        let landmarks = LandmarkSet::from_points(raw)?;
        let left = eye_aspect_ratio(&landmarks.left_eye())?;
        let right = eye_aspect_ratio(&landmarks.right_eye())?;
        Ok(((left + right) / 2.0, landmarks))
    }

    fn drop_retired(&mut self, retired: &[crate::tracker::TrackId]) {
        for id in retired {
            self.states.remove(id);
        }
    }

    /// State snapshot for one track, if it is alive
    pub fn state(&self, track: crate::tracker::TrackId) -> Option<&DrowsinessState> {
        self.states.get(&track)
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }
}
