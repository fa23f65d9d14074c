//! Detection configuration

use crate::DrowsinessError;
use serde::{Deserialize, Serialize};

/// Alert firing policy for sustained eye closure.
///
/// Edge-triggered fires once per closure episode, when the consecutive
/// counter first reaches the frame threshold. Level-triggered fires on
/// every frame the counter is at or past the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertPolicy {
    #[default]
    EdgeTriggered,
    LevelTriggered,
}

/// Tunable detection parameters, loaded once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// EAR below this value counts as a closed-eye frame
    pub ear_threshold: f64,

    /// Consecutive closed-eye frames before an alert fires
    pub ear_consec_frames: u32,

    /// Alert firing policy
    #[serde(default)]
    pub alert_policy: AlertPolicy,

    /// Maximum centroid distance (pixels) for frame-to-frame face association
    #[serde(default = "default_max_match_distance")]
    pub max_match_distance: f64,

    /// Frames a track survives without a matching detection
    #[serde(default = "default_track_expiry_frames")]
    pub track_expiry_frames: u32,
}

fn default_max_match_distance() -> f64 {
    120.0
}

fn default_track_expiry_frames() -> u32 {
    15
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.25,
            ear_consec_frames: 20,
            alert_policy: AlertPolicy::default(),
            max_match_distance: default_max_match_distance(),
            track_expiry_frames: default_track_expiry_frames(),
        }
    }
}

impl DetectionConfig {
    /// Validate parameter ranges; any violation is a fatal startup error
    pub fn validate(&self) -> Result<(), DrowsinessError> {
        if !self.ear_threshold.is_finite() || self.ear_threshold <= 0.0 || self.ear_threshold >= 1.0
        {
            return Err(DrowsinessError::Config(format!(
                "ear_threshold must be in (0, 1), got {}",
                self.ear_threshold
            )));
        }
        if self.ear_consec_frames == 0 {
            return Err(DrowsinessError::Config(
                "ear_consec_frames must be at least 1".into(),
            ));
        }
        if !self.max_match_distance.is_finite() || self.max_match_distance <= 0.0 {
            return Err(DrowsinessError::Config(format!(
                "max_match_distance must be positive, got {}",
                self.max_match_distance
            )));
        }
        if self.track_expiry_frames == 0 {
            return Err(DrowsinessError::Config(
                "track_expiry_frames must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(DetectionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        for bad in [0.0, -0.2, 1.0, 1.5, f64::NAN] {
            let config = DetectionConfig {
                ear_threshold: bad,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_rejects_zero_frame_threshold() {
        let config = DetectionConfig {
            ear_consec_frames: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
