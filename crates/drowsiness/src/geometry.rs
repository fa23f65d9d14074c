//! Eye-aspect-ratio geometry
//!
//! EAR follows Soukupová and Čech (2016): the mean of the two vertical
//! eyelid distances over twice the horizontal eye width. Open eyes sit
//! roughly in 0.25-0.35; closed eyes trend toward 0.

use crate::DrowsinessError;
use serde::{Deserialize, Serialize};

/// 2D landmark coordinate (pixel space)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Compute the eye aspect ratio from 6 ordered eye-contour landmarks.
///
/// Index convention: 0 and 3 are the horizontal corners, 1/5 and 2/4 the
/// vertical top/bottom pairs. Fails with [`DrowsinessError::DegenerateEye`]
/// when the corners coincide (zero-width region) rather than dividing by
/// zero.
pub fn eye_aspect_ratio(eye: &[Point; 6]) -> Result<f64, DrowsinessError> {
    let a = eye[1].distance(&eye[5]);
    let b = eye[2].distance(&eye[4]);
    let c = eye[0].distance(&eye[3]);

    if c == 0.0 {
        return Err(DrowsinessError::DegenerateEye);
    }

    Ok((a + b) / (2.0 * c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    /// Symmetric fixture: corners at (0,0)/(3,0), vertical pairs one pixel
    /// above/below. A = B = 2, C = 3, so EAR = 4/6.
    fn symmetric_eye() -> [Point; 6] {
        [p(0, 0), p(1, 1), p(2, 1), p(3, 0), p(2, -1), p(1, -1)]
    }

    #[test]
    fn test_symmetric_fixture_value() {
        let ear = eye_aspect_ratio(&symmetric_eye()).unwrap();
        assert!((ear - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_fully_closed_eye_is_zero() {
        let eye = [p(0, 0), p(1, 0), p(2, 0), p(3, 0), p(2, 0), p(1, 0)];
        let ear = eye_aspect_ratio(&eye).unwrap();
        assert_eq!(ear, 0.0);
    }

    #[test]
    fn test_degenerate_corners_fail() {
        let eye = [p(5, 5), p(6, 7), p(7, 7), p(5, 5), p(7, 3), p(6, 3)];
        let result = eye_aspect_ratio(&eye);
        assert!(matches!(result, Err(DrowsinessError::DegenerateEye)));
    }

    fn arb_eye() -> impl Strategy<Value = [Point; 6]> {
        // Coordinates kept small enough that translation and scaling below
        // stay inside i32.
        prop::array::uniform6((-1000..1000i32, -1000..1000i32))
            .prop_map(|pts| pts.map(|(x, y)| Point::new(x, y)))
            .prop_filter("corners must not coincide", |eye| eye[0] != eye[3])
    }

    proptest! {
        #[test]
        fn prop_translation_invariant(eye in arb_eye(), dx in -10_000..10_000i32, dy in -10_000..10_000i32) {
            let moved = eye.map(|pt| Point::new(pt.x + dx, pt.y + dy));
            let original = eye_aspect_ratio(&eye).unwrap();
            let translated = eye_aspect_ratio(&moved).unwrap();
            prop_assert!((original - translated).abs() < 1e-9);
        }

        #[test]
        fn prop_uniform_scale_invariant(eye in arb_eye(), k in 1..500i32) {
            let scaled = eye.map(|pt| Point::new(pt.x * k, pt.y * k));
            let original = eye_aspect_ratio(&eye).unwrap();
            let rescaled = eye_aspect_ratio(&scaled).unwrap();
            prop_assert!((original - rescaled).abs() < 1e-9);
        }

        #[test]
        fn prop_ear_is_non_negative_and_finite(eye in arb_eye()) {
            let ear = eye_aspect_ratio(&eye).unwrap();
            prop_assert!(ear.is_finite());
            prop_assert!(ear >= 0.0);
        }
    }
}
