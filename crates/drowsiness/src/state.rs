//! Per-subject drowsiness state machine
//!
//! A hysteresis counter over consecutive closed-eye frames. Reacting only
//! after `ear_consec_frames` closed frames absorbs blinks and brief
//! predictor jitter; the price is a detection latency of roughly the frame
//! threshold divided by the capture rate.

use crate::config::{AlertPolicy, DetectionConfig};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Phase derived from the consecutive-closed counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrowsinessPhase {
    /// Eyes open, counter at zero
    #[default]
    Awake,
    /// Counter accumulating, still below the frame threshold
    Closing,
    /// Counter at or past the frame threshold
    Alerting,
}

/// Temporal closure tracking for one subject
#[derive(Debug, Clone, Default)]
pub struct DrowsinessState {
    /// Consecutive frames with EAR below threshold
    consecutive_closed_frames: u32,
    /// Total alerts fired this run, monotone
    alert_count: u64,
}

impl DrowsinessState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one EAR reading; returns whether an alert fired on this frame.
    ///
    /// NaN or negative readings are corrupted geometry from upstream and
    /// take the eyes-open path so they can never fire an alert; each one is
    /// logged as a data-quality warning.
    pub fn update(&mut self, ear: f64, config: &DetectionConfig) -> bool {
        if !ear.is_finite() || ear < 0.0 {
            warn!(ear, "discarding invalid EAR reading, treating eyes as open");
            self.consecutive_closed_frames = 0;
            return false;
        }

        if ear < config.ear_threshold {
            self.consecutive_closed_frames += 1;
            let fired = match config.alert_policy {
                AlertPolicy::EdgeTriggered => {
                    self.consecutive_closed_frames == config.ear_consec_frames
                }
                AlertPolicy::LevelTriggered => {
                    self.consecutive_closed_frames >= config.ear_consec_frames
                }
            };
            if fired {
                self.alert_count += 1;
            }
            fired
        } else {
            self.consecutive_closed_frames = 0;
            false
        }
    }

    /// Current phase under the given frame threshold
    pub fn phase(&self, config: &DetectionConfig) -> DrowsinessPhase {
        if self.consecutive_closed_frames == 0 {
            DrowsinessPhase::Awake
        } else if self.consecutive_closed_frames < config.ear_consec_frames {
            DrowsinessPhase::Closing
        } else {
            DrowsinessPhase::Alerting
        }
    }

    pub fn consecutive_closed_frames(&self) -> u32 {
        self.consecutive_closed_frames
    }

    pub fn alert_count(&self) -> u64 {
        self.alert_count
    }
}
