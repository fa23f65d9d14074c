//! Facial landmark normalization and eye slicing
//!
//! The predictor contract is the 68-point convention: any output that is
//! not exactly 68 points is rejected before it can reach the fixed-index
//! eye slices below.

use crate::geometry::Point;
use crate::DrowsinessError;
use std::ops::Range;

/// Number of landmarks in the 68-point convention
pub const LANDMARK_COUNT: usize = 68;

/// Right-eye landmark indices (points 36-41)
pub const RIGHT_EYE: Range<usize> = 36..42;

/// Left-eye landmark indices (points 42-47)
pub const LEFT_EYE: Range<usize> = 42..48;

/// One face's normalized landmarks
#[derive(Debug, Clone)]
pub struct LandmarkSet {
    points: [Point; LANDMARK_COUNT],
}

impl LandmarkSet {
    /// Normalize raw predictor output, rejecting anything that is not
    /// exactly 68 points
    pub fn from_points(points: Vec<Point>) -> Result<Self, DrowsinessError> {
        let points: [Point; LANDMARK_COUNT] =
            points
                .try_into()
                .map_err(|v: Vec<Point>| DrowsinessError::LandmarkCount {
                    expected: LANDMARK_COUNT,
                    actual: v.len(),
                })?;
        Ok(Self { points })
    }

    /// All 68 points in predictor order
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Right-eye contour in anatomical order
    pub fn right_eye(&self) -> [Point; 6] {
        let mut eye = [Point::default(); 6];
        eye.copy_from_slice(&self.points[RIGHT_EYE]);
        eye
    }

    /// Left-eye contour in anatomical order
    pub fn left_eye(&self) -> [Point; 6] {
        let mut eye = [Point::default(); 6];
        eye.copy_from_slice(&self.points[LEFT_EYE]);
        eye
    }
}
