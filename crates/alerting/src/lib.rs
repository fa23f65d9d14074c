//! Alerting
//!
//! Turns state-machine firings into timestamped alert events and fans them
//! out to sinks (structured log, optional sound hook). A failing sink is
//! logged and never propagates back into the detection pipeline.

mod dispatch;

pub use dispatch::{AlertDispatcher, AlertEvent, AlertSink, LogSink, SoundAlert};

use thiserror::Error;

/// Alert delivery errors
#[derive(Error, Debug)]
pub enum AlertError {
    #[error("Alert sink failed: {0}")]
    Sink(String),
}
