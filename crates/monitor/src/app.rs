//! The synchronous detection loop

use crate::display::{FrameDisplay, KeyCommand};
use crate::overlay;
use crate::settings::MonitorSettings;
use alerting::AlertDispatcher;
use camera_capture::source::FrameSource;
use drowsiness::{FrameProcessingPipeline, PerformanceMonitor};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Outcome of one monitor run
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    /// Frames pulled from the capture source
    pub frames: u64,
    /// Alerts dispatched
    pub alerts: u64,
}

/// The assembled monitor: pipeline, alert dispatch, and FPS tracking
pub struct MonitorApp {
    settings: MonitorSettings,
    pipeline: FrameProcessingPipeline,
    dispatcher: AlertDispatcher,
    perf: PerformanceMonitor,
    stop: Arc<AtomicBool>,
}

impl MonitorApp {
    pub fn new(
        settings: MonitorSettings,
        pipeline: FrameProcessingPipeline,
        dispatcher: AlertDispatcher,
        stop: Arc<AtomicBool>,
    ) -> Self {
        Self {
            settings,
            pipeline,
            dispatcher,
            perf: PerformanceMonitor::new(),
            stop,
        }
    }

    /// Pull frames until the stream ends, a read fails, or a stop is
    /// requested. Frames are processed strictly in arrival order; the
    /// capture handle is released by `Drop` on every exit path.
    pub fn run(
        &mut self,
        source: &mut dyn FrameSource,
        display: &mut dyn FrameDisplay,
    ) -> anyhow::Result<RunSummary> {
        info!("starting detection loop");
        let mut frames = 0u64;

        loop {
            if self.stop.load(Ordering::Relaxed) {
                info!("stop requested, ending detection loop");
                break;
            }
            if matches!(display.poll_key(), Some(KeyCommand::Quit)) {
                info!("detection stopped by user");
                break;
            }

            let mut frame = match source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    info!("capture stream ended");
                    break;
                }
                Err(err) => {
                    // A dead capture source cannot self-heal; end gracefully
                    error!(error = %err, "failed to capture frame");
                    break;
                }
            };

            frames += 1;
            match self.pipeline.process(&frame) {
                Ok(analysis) => {
                    for alert in &analysis.alerts {
                        self.dispatcher.dispatch(
                            alert.track,
                            alert.ear,
                            alert.consecutive_closed_frames,
                        );
                    }

                    self.perf.tick();
                    if self.settings.display.show_ear {
                        for face in &analysis.faces {
                            debug!(track = face.track, ear = face.ear, "eye aspect ratio");
                        }
                    }
                    if self.settings.display.show_fps {
                        debug!(fps = self.perf.fps(), "frame rate");
                    }

                    overlay::annotate(&mut frame, &analysis, &self.settings.display);
                    display.show(&frame)?;
                }
                Err(err) => {
                    warn!(error = %err, sequence = frame.sequence, "frame processing failed");
                }
            }
        }

        let summary = RunSummary {
            frames,
            alerts: self.dispatcher.total(),
        };
        info!(
            frames = summary.frames,
            alerts = summary.alerts,
            "drowsiness detection ended"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::HeadlessDisplay;
    use camera_capture::source::SyntheticSource;
    use camera_capture::CameraConfig;
    use drowsiness::{DetectionConfig, DisabledPredictor};

    fn app(stop: Arc<AtomicBool>) -> MonitorApp {
        let settings = MonitorSettings {
            camera: CameraConfig::default(),
            detection: DetectionConfig::default(),
            display: Default::default(),
            alert: Default::default(),
            model: Default::default(),
        };
        let pipeline = FrameProcessingPipeline::new(
            settings.detection.clone(),
            Box::new(DisabledPredictor::new()),
            Box::new(DisabledPredictor::new()),
        )
        .unwrap();
        MonitorApp::new(settings, pipeline, AlertDispatcher::new(Vec::new()), stop)
    }

    #[test]
    fn test_loop_ends_at_end_of_stream() {
        let stop = Arc::new(AtomicBool::new(false));
        let mut app = app(stop);
        let mut source = SyntheticSource::open(CameraConfig {
            index: 0,
            width: 32,
            height: 24,
        })
        .unwrap()
        .with_frame_limit(7);

        let summary = app
            .run(&mut source, &mut HeadlessDisplay)
            .unwrap();
        assert_eq!(summary.frames, 7);
        assert_eq!(summary.alerts, 0);
    }

    #[test]
    fn test_stop_flag_prevents_processing() {
        let stop = Arc::new(AtomicBool::new(true));
        let mut app = app(stop);
        let mut source = SyntheticSource::open(CameraConfig::default()).unwrap();

        let summary = app
            .run(&mut source, &mut HeadlessDisplay)
            .unwrap();
        assert_eq!(summary.frames, 0);
    }

    #[test]
    fn test_quit_key_ends_loop() {
        struct QuitAfter(u32);
        impl FrameDisplay for QuitAfter {
            fn show(&mut self, _frame: &camera_capture::VideoFrame) -> anyhow::Result<()> {
                Ok(())
            }
            fn poll_key(&mut self) -> Option<KeyCommand> {
                if self.0 == 0 {
                    Some(KeyCommand::Quit)
                } else {
                    self.0 -= 1;
                    None
                }
            }
        }

        let stop = Arc::new(AtomicBool::new(false));
        let mut app = app(stop);
        let mut source = SyntheticSource::open(CameraConfig::default()).unwrap();

        let summary = app.run(&mut source, &mut QuitAfter(3)).unwrap();
        assert_eq!(summary.frames, 3);
    }
}
