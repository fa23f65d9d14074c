//! Drowsiness Monitor - Main Entry Point

use alerting::{AlertDispatcher, AlertSink, LogSink, SoundAlert};
use anyhow::Context;
use camera_capture::source::SyntheticSource;
use clap::Parser;
use drowsiness::{
    DisabledPredictor, FaceDetector, FrameProcessingPipeline, LandmarkPredictor,
};
use monitor::display::HeadlessDisplay;
use monitor::{init_logging, MonitorApp, MonitorSettings};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "drowsiness-monitor", about = "Real-time drowsiness detection monitor")]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config/monitor.toml")]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    info!("=== Drowsiness Monitor v{} ===", env!("CARGO_PKG_VERSION"));
    info!(config = %args.config.display(), "loading configuration");

    let settings = MonitorSettings::load(&args.config)?;
    info!(
        ear_threshold = settings.detection.ear_threshold,
        ear_consec_frames = settings.detection.ear_consec_frames,
        "detection parameters"
    );

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        ctrlc::set_handler(move || stop.store(true, Ordering::Relaxed))
            .context("failed to install interrupt handler")?;
    }

    let (detector, predictor) = build_detection(&settings)?;
    let pipeline = FrameProcessingPipeline::new(settings.detection.clone(), detector, predictor)
        .context("failed to assemble detection pipeline")?;

    let mut sinks: Vec<Box<dyn AlertSink>> = vec![Box::new(LogSink)];
    if settings.alert.use_sound_alert {
        sinks.push(Box::new(SoundAlert::new(settings.alert.sound_file.clone())));
    }
    let dispatcher = AlertDispatcher::new(sinks);

    let mut source = SyntheticSource::open(settings.camera.clone())
        .context("failed to open capture source")?;
    let mut display = HeadlessDisplay;

    let mut app = MonitorApp::new(settings, pipeline, dispatcher, stop);
    app.run(&mut source, &mut display)?;
    Ok(())
}

/// Select the detection capabilities from the configured model.
///
/// A configured model that cannot be loaded (or that this build has no
/// backend for) is fatal; with no model configured the monitor runs with
/// detection disabled so the loop and alert plumbing stay exercisable.
fn build_detection(
    settings: &MonitorSettings,
) -> anyhow::Result<(Box<dyn FaceDetector>, Box<dyn LandmarkPredictor>)> {
    match &settings.model.landmark_model {
        Some(path) => {
            #[cfg(feature = "backend-tract")]
            {
                let predictor = drowsiness::predictor::OnnxLandmarkPredictor::load(path)
                    .with_context(|| {
                        format!("failed to load landmark model from {}", path.display())
                    })?;
                Ok((
                    Box::new(drowsiness::CenterRegionDetector),
                    Box::new(predictor),
                ))
            }
            #[cfg(not(feature = "backend-tract"))]
            {
                anyhow::bail!(
                    "landmark model {} is configured, but this build has no model backend \
                     (rebuild with the backend-tract feature)",
                    path.display()
                )
            }
        }
        None => {
            warn!("no landmark model configured; face detection is disabled");
            Ok((
                Box::new(DisabledPredictor::new()),
                Box::new(DisabledPredictor::new()),
            ))
        }
    }
}
