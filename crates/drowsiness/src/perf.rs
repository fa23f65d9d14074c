//! Rolling frames-per-second estimation

use std::time::{Duration, Instant};

/// Window length after which the FPS estimate is recomputed
const WINDOW: Duration = Duration::from_secs(1);

/// Rolling FPS over one-second windows.
///
/// Purely observational; never feeds back into detection decisions.
#[derive(Debug)]
pub struct PerformanceMonitor {
    window_start: Instant,
    frames_in_window: u32,
    fps: f64,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self {
            window_start: Instant::now(),
            frames_in_window: 0,
            fps: 0.0,
        }
    }

    /// Record one processed frame
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    fn tick_at(&mut self, now: Instant) {
        self.frames_in_window += 1;
        let elapsed = now.duration_since(self.window_start);
        if elapsed > WINDOW {
            self.fps = self.frames_in_window as f64 / elapsed.as_secs_f64();
            self.frames_in_window = 0;
            self.window_start = now;
        }
    }

    /// Latest estimate; 0.0 until the first window completes
    pub fn fps(&self) -> f64 {
        self.fps
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}
