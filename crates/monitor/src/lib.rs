//! Drowsiness Monitor Application
//!
//! Wires the capture source, detection pipeline, and alert dispatch into
//! the synchronous frame loop, and owns the application-level plumbing:
//! configuration loading, logging setup, overlay painting, and display.

pub mod app;
pub mod display;
pub mod overlay;
pub mod settings;

pub use app::{MonitorApp, RunSummary};
pub use settings::MonitorSettings;

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber, honoring `RUST_LOG` when set
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
