//! Face detection and landmark prediction capability interface
//!
//! The actual computer vision lives behind these two traits; the pipeline
//! never depends on which implementation is plugged in. The optional
//! `backend-tract` feature supplies an ONNX-session-backed landmark
//! predictor; without it the monitor falls back to a disabled predictor
//! that reports no faces.

use crate::geometry::Point;
use crate::DrowsinessError;
use camera_capture::frame::GrayFrame;
use serde::{Deserialize, Serialize};

/// Detected face bounding box in frame coordinates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceRegion {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub confidence: f32,
}

impl FaceRegion {
    /// Region centroid, used for frame-to-frame association
    pub fn centroid(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }
}

/// Face enumeration over a grayscale frame
pub trait FaceDetector {
    fn detect(&self, frame: &GrayFrame) -> Result<Vec<FaceRegion>, DrowsinessError>;
}

/// Per-face landmark localization
pub trait LandmarkPredictor {
    /// Raw landmark points for one face region, in predictor order.
    /// Count validation happens downstream in [`crate::LandmarkSet`].
    fn predict(&self, frame: &GrayFrame, face: &FaceRegion)
        -> Result<Vec<Point>, DrowsinessError>;
}

/// Fixed-mount heuristic detector for cabin cameras.
///
/// Assumes the subject's face sits in the central region of the frame; the
/// mount constrains where a driver can be, so no model is needed to bound
/// the landmark search.
pub struct CenterRegionDetector;

impl FaceDetector for CenterRegionDetector {
    fn detect(&self, frame: &GrayFrame) -> Result<Vec<FaceRegion>, DrowsinessError> {
        if frame.width == 0 || frame.height == 0 {
            return Err(DrowsinessError::Detection("empty frame".into()));
        }
        Ok(vec![FaceRegion {
            x: (frame.width / 4) as i32,
            y: (frame.height / 5) as i32,
            width: frame.width / 2,
            height: frame.height * 3 / 5,
            confidence: 1.0,
        }])
    }
}

/// Fallback used when no landmark model is configured.
///
/// Reports zero faces, so the pipeline runs but every frame is "no face".
#[derive(Debug, Default)]
pub struct DisabledPredictor;

impl DisabledPredictor {
    pub fn new() -> Self {
        Self
    }
}

impl FaceDetector for DisabledPredictor {
    fn detect(&self, _frame: &GrayFrame) -> Result<Vec<FaceRegion>, DrowsinessError> {
        Ok(Vec::new())
    }
}

impl LandmarkPredictor for DisabledPredictor {
    fn predict(
        &self,
        _frame: &GrayFrame,
        _face: &FaceRegion,
    ) -> Result<Vec<Point>, DrowsinessError> {
        Err(DrowsinessError::Detection(
            "landmark prediction is disabled".into(),
        ))
    }
}

#[cfg(feature = "backend-tract")]
pub use tract_backend::OnnxLandmarkPredictor;

#[cfg(feature = "backend-tract")]
mod tract_backend {
    use super::{FaceRegion, LandmarkPredictor};
    use crate::geometry::Point;
    use crate::landmarks::LANDMARK_COUNT;
    use crate::DrowsinessError;
    use camera_capture::frame::GrayFrame;
    use std::path::Path;
    use tract_onnx::prelude::*;
    use tracing::info;

    /// Side length of the model's square input crop
    const INPUT_SIZE: u32 = 112;

    /// ONNX landmark predictor.
    ///
    /// Expects a model taking a 1x1xSxS normalized grayscale crop and
    /// producing 136 values: 68 (x, y) pairs in [0, 1] relative to the crop.
    pub struct OnnxLandmarkPredictor {
        model: TypedRunnableModel<TypedModel>,
    }

    impl OnnxLandmarkPredictor {
        /// Load and optimize the model; failure here is fatal at startup
        pub fn load(path: &Path) -> Result<Self, DrowsinessError> {
            let model = tract_onnx::onnx()
                .model_for_path(path)
                .map_err(|e| DrowsinessError::ModelLoad(e.to_string()))?
                .with_input_fact(
                    0,
                    f32::fact([1, 1, INPUT_SIZE as usize, INPUT_SIZE as usize]).into(),
                )
                .map_err(|e| DrowsinessError::ModelLoad(e.to_string()))?
                .into_optimized()
                .map_err(|e| DrowsinessError::ModelLoad(e.to_string()))?
                .into_runnable()
                .map_err(|e| DrowsinessError::ModelLoad(e.to_string()))?;

            info!(path = %path.display(), "loaded landmark model");
            Ok(Self { model })
        }

        /// Nearest-neighbor resample of the face crop to the model input
        fn input_tensor(crop: &GrayFrame) -> Tensor {
            let array = tract_ndarray::Array4::from_shape_fn(
                (1, 1, INPUT_SIZE as usize, INPUT_SIZE as usize),
                |(_, _, y, x)| {
                    let src_x = (x as u32 * crop.width.max(1)) / INPUT_SIZE;
                    let src_y = (y as u32 * crop.height.max(1)) / INPUT_SIZE;
                    crop.get(src_x.min(crop.width.saturating_sub(1)),
                             src_y.min(crop.height.saturating_sub(1)))
                        .unwrap_or(0) as f32
                        / 255.0
                },
            );
            array.into()
        }
    }

    impl LandmarkPredictor for OnnxLandmarkPredictor {
        fn predict(
            &self,
            frame: &GrayFrame,
            face: &FaceRegion,
        ) -> Result<Vec<Point>, DrowsinessError> {
            let crop = frame.crop(
                face.x.max(0) as u32,
                face.y.max(0) as u32,
                face.width,
                face.height,
            );
            if crop.width == 0 || crop.height == 0 {
                return Err(DrowsinessError::Detection(
                    "face region lies outside the frame".into(),
                ));
            }

            let input = Self::input_tensor(&crop);
            let outputs = self
                .model
                .run(tvec!(input.into()))
                .map_err(|e| DrowsinessError::Detection(e.to_string()))?;
            let values = outputs[0]
                .to_array_view::<f32>()
                .map_err(|e| DrowsinessError::Detection(e.to_string()))?;

            let coords: Vec<f32> = values.iter().copied().collect();
            if coords.len() != LANDMARK_COUNT * 2 {
                return Err(DrowsinessError::LandmarkCount {
                    expected: LANDMARK_COUNT,
                    actual: coords.len() / 2,
                });
            }

            let points = coords
                .chunks(2)
                .map(|pair| {
                    Point::new(
                        face.x.max(0) + (pair[0] * crop.width as f32) as i32,
                        face.y.max(0) + (pair[1] * crop.height as f32) as i32,
                    )
                })
                .collect();
            Ok(points)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_centroid() {
        let region = FaceRegion {
            x: 100,
            y: 50,
            width: 200,
            height: 100,
            confidence: 0.9,
        };
        assert_eq!(region.centroid(), (200.0, 100.0));
    }

    #[test]
    fn test_disabled_predictor_reports_no_faces() {
        let predictor = DisabledPredictor::new();
        let frame = GrayFrame {
            data: vec![0; 16],
            width: 4,
            height: 4,
        };
        assert!(predictor.detect(&frame).unwrap().is_empty());

        let region = FaceRegion {
            x: 0,
            y: 0,
            width: 4,
            height: 4,
            confidence: 1.0,
        };
        assert!(predictor.predict(&frame, &region).is_err());
    }
}
