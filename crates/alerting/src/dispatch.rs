//! Alert event construction and sink fan-out

use crate::AlertError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

/// One drowsiness detection firing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertEvent {
    /// Wall-clock time of the firing
    pub timestamp: DateTime<Utc>,
    /// Monotone per-run alert sequence number, starting at 1
    pub sequence: u64,
    /// Track the alert belongs to
    pub track: u64,
    /// Averaged EAR on the firing frame
    pub ear: f64,
    /// Consecutive closed frames at firing time
    pub consecutive_closed_frames: u32,
}

/// Alert delivery target
pub trait AlertSink {
    fn deliver(&mut self, event: &AlertEvent) -> Result<(), AlertError>;
}

/// Sink that emits the alert as a structured warning
#[derive(Debug, Default)]
pub struct LogSink;

impl AlertSink for LogSink {
    fn deliver(&mut self, event: &AlertEvent) -> Result<(), AlertError> {
        let payload =
            serde_json::to_string(event).map_err(|e| AlertError::Sink(e.to_string()))?;
        warn!(
            alert = event.sequence,
            track = event.track,
            ear = event.ear,
            %payload,
            "Drowsiness detected! Alert #{}",
            event.sequence
        );
        Ok(())
    }
}

/// Audible alert hook.
///
/// Playback is deliberately unimplemented; the configured asset path is
/// carried so an implementation can be dropped in without touching callers.
#[derive(Debug)]
pub struct SoundAlert {
    sound_file: Option<PathBuf>,
}

impl SoundAlert {
    pub fn new(sound_file: Option<PathBuf>) -> Self {
        Self { sound_file }
    }
}

impl AlertSink for SoundAlert {
    fn deliver(&mut self, event: &AlertEvent) -> Result<(), AlertError> {
        match &self.sound_file {
            Some(path) => debug!(
                alert = event.sequence,
                sound = %path.display(),
                "sound alert hook invoked (playback not implemented)"
            ),
            None => debug!(alert = event.sequence, "sound alert hook invoked without asset"),
        }
        Ok(())
    }
}

/// Fans alert firings out to the configured sinks
pub struct AlertDispatcher {
    sinks: Vec<Box<dyn AlertSink>>,
    sequence: u64,
}

impl AlertDispatcher {
    pub fn new(sinks: Vec<Box<dyn AlertSink>>) -> Self {
        Self { sinks, sequence: 0 }
    }

    /// Build and deliver the event for one firing.
    ///
    /// Sink failures are logged and swallowed; delivery problems must not
    /// disturb frame processing.
    pub fn dispatch(&mut self, track: u64, ear: f64, consecutive_closed_frames: u32) -> AlertEvent {
        self.sequence += 1;
        let event = AlertEvent {
            timestamp: Utc::now(),
            sequence: self.sequence,
            track,
            ear,
            consecutive_closed_frames,
        };

        for sink in &mut self.sinks {
            if let Err(err) = sink.deliver(&event) {
                warn!(error = %err, alert = event.sequence, "alert sink failed");
            }
        }
        event
    }

    /// Alerts dispatched this run
    pub fn total(&self) -> u64 {
        self.sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct RecordingSink(Rc<RefCell<Vec<AlertEvent>>>);

    impl AlertSink for RecordingSink {
        fn deliver(&mut self, event: &AlertEvent) -> Result<(), AlertError> {
            self.0.borrow_mut().push(event.clone());
            Ok(())
        }
    }

    struct FailingSink;

    impl AlertSink for FailingSink {
        fn deliver(&mut self, _event: &AlertEvent) -> Result<(), AlertError> {
            Err(AlertError::Sink("device unavailable".into()))
        }
    }

    #[test]
    fn test_sequence_is_monotone_from_one() {
        let received = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher =
            AlertDispatcher::new(vec![Box::new(RecordingSink(received.clone()))]);

        dispatcher.dispatch(0, 0.1, 15);
        dispatcher.dispatch(1, 0.12, 20);

        let events = received.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].sequence, 1);
        assert_eq!(events[1].sequence, 2);
        assert_eq!(dispatcher.total(), 2);
    }

    #[test]
    fn test_failing_sink_does_not_block_others() {
        let received = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = AlertDispatcher::new(vec![
            Box::new(FailingSink),
            Box::new(RecordingSink(received.clone())),
        ]);

        let event = dispatcher.dispatch(3, 0.08, 30);
        assert_eq!(event.track, 3);
        assert_eq!(received.borrow().len(), 1);
    }

    #[test]
    fn test_sound_hook_is_a_no_op() {
        let mut sink = SoundAlert::new(Some(PathBuf::from("assets/alarm.wav")));
        let mut dispatcher = AlertDispatcher::new(Vec::new());
        let event = dispatcher.dispatch(0, 0.2, 15);
        assert!(sink.deliver(&event).is_ok());
    }
}
