//! Application configuration
//!
//! Loaded once at startup from a TOML file with `MONITOR__`-prefixed
//! environment overrides layered on top. A missing file, a malformed
//! document, or out-of-range detection parameters are all fatal.

use anyhow::Context;
use camera_capture::CameraConfig;
use drowsiness::DetectionConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Overlay and per-frame log toggles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Draw landmark dots and face boxes into the frame
    #[serde(default = "default_true")]
    pub show_landmarks: bool,
    /// Log the per-face EAR each frame
    #[serde(default = "default_true")]
    pub show_ear: bool,
    /// Log the rolling FPS estimate each frame
    #[serde(default = "default_true")]
    pub show_fps: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_landmarks: true,
            show_ear: true,
            show_fps: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Alert delivery settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertSettings {
    /// Enable the audible alert hook
    #[serde(default)]
    pub use_sound_alert: bool,
    /// Sound asset for the hook
    #[serde(default)]
    pub sound_file: Option<PathBuf>,
}

/// Model paths
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Landmark model; when absent, detection runs disabled
    #[serde(default)]
    pub landmark_model: Option<PathBuf>,
}

/// Complete monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorSettings {
    #[serde(default)]
    pub camera: CameraConfig,
    pub detection: DetectionConfig,
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub alert: AlertSettings,
    #[serde(default)]
    pub model: ModelSettings,
}

impl MonitorSettings {
    /// Load and validate configuration from `path`
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = config::Config::builder()
            .add_source(config::File::from(path.to_path_buf()))
            .add_source(config::Environment::with_prefix("MONITOR").separator("__"))
            .build()
            .with_context(|| format!("failed to read configuration from {}", path.display()))?;

        let settings: MonitorSettings = raw
            .try_deserialize()
            .with_context(|| format!("malformed configuration in {}", path.display()))?;

        settings
            .detection
            .validate()
            .context("invalid detection parameters")?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn settings_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_minimal_config_loads_with_defaults() {
        let file = settings_file(
            r#"
            [detection]
            ear_threshold = 0.22
            ear_consec_frames = 12
            "#,
        );

        let settings = MonitorSettings::load(file.path()).unwrap();
        assert_eq!(settings.detection.ear_threshold, 0.22);
        assert_eq!(settings.detection.ear_consec_frames, 12);
        assert_eq!(settings.camera.index, 0);
        assert_eq!((settings.camera.width, settings.camera.height), (640, 480));
        assert!(settings.display.show_fps);
        assert!(!settings.alert.use_sound_alert);
        assert!(settings.model.landmark_model.is_none());
    }

    #[test]
    fn test_missing_file_is_fatal() {
        assert!(MonitorSettings::load(Path::new("/nonexistent/monitor.toml")).is_err());
    }

    #[test]
    fn test_missing_required_keys_are_fatal() {
        let file = settings_file(
            r#"
            [camera]
            index = 1
            "#,
        );
        assert!(MonitorSettings::load(file.path()).is_err());
    }

    #[test]
    fn test_malformed_document_is_fatal() {
        let file = settings_file("detection = not toml [");
        assert!(MonitorSettings::load(file.path()).is_err());
    }

    #[test]
    fn test_out_of_range_threshold_is_fatal() {
        let file = settings_file(
            r#"
            [detection]
            ear_threshold = 1.5
            ear_consec_frames = 12
            "#,
        );
        assert!(MonitorSettings::load(file.path()).is_err());
    }

    #[test]
    fn test_full_config_roundtrip() {
        let file = settings_file(
            r#"
            [camera]
            index = 0
            width = 1280
            height = 720

            [detection]
            ear_threshold = 0.25
            ear_consec_frames = 20
            alert_policy = "level_triggered"

            [display]
            show_landmarks = false
            show_ear = false
            show_fps = true

            [alert]
            use_sound_alert = true
            sound_file = "assets/alarm.wav"

            [model]
            landmark_model = "models/landmarks_68.onnx"
            "#,
        );

        let settings = MonitorSettings::load(file.path()).unwrap();
        assert_eq!(
            settings.detection.alert_policy,
            drowsiness::AlertPolicy::LevelTriggered
        );
        assert!(!settings.display.show_landmarks);
        assert!(settings.alert.use_sound_alert);
        assert_eq!(
            settings.model.landmark_model.as_deref(),
            Some(Path::new("models/landmarks_68.onnx"))
        );
    }
}
