//! Camera Diagnostic Tool
//!
//! Verifies that the capture source delivers frames at the configured
//! resolution and measures the achieved frame rate. Useful before a
//! monitor deployment to rule the camera out as a failure source.

use camera_capture::frame::VideoFrame;
use camera_capture::source::{FrameSource, SyntheticSource};
use camera_capture::CameraConfig;
use clap::Parser;
use drowsiness::PerformanceMonitor;
use monitor::init_logging;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "camera-diag", about = "Test the capture source and measure frame rate")]
struct Args {
    /// Camera device index
    #[arg(short = 'c', long, default_value_t = 0)]
    camera: u32,

    /// Capture resolution as WIDTHxHEIGHT (e.g. 640x480)
    #[arg(short = 'r', long, value_parser = parse_resolution)]
    resolution: Option<(u32, u32)>,

    /// Frames to capture before exiting (0 = run until interrupted)
    #[arg(long, default_value_t = 300)]
    frames: u64,

    /// Save the first captured frame to this path
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

fn parse_resolution(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("resolution must be WIDTHxHEIGHT (e.g. 640x480), got '{s}'"))?;
    let width: u32 = w
        .parse()
        .map_err(|_| format!("invalid width '{w}' in resolution '{s}'"))?;
    let height: u32 = h
        .parse()
        .map_err(|_| format!("invalid height '{h}' in resolution '{s}'"))?;
    if width == 0 || height == 0 {
        return Err(format!("resolution dimensions must be non-zero, got '{s}'"));
    }
    Ok((width, height))
}

fn main() {
    init_logging();
    // Malformed arguments (e.g. a bad WIDTHxHEIGHT string) exit 1, matching
    // the camera-open failure code; --help and --version stay exit 0.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            err.print().ok();
            std::process::exit(code);
        }
    };
    std::process::exit(run(&args));
}

fn run(args: &Args) -> i32 {
    let mut config = CameraConfig::with_index(args.camera);
    if let Some((width, height)) = args.resolution {
        config.width = width;
        config.height = height;
    }

    println!("Testing camera at index {}...", config.index);
    let mut source = match SyntheticSource::open(config) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("ERROR: {err}");
            return 1;
        }
    };

    let (width, height) = source.resolution();
    println!("Camera opened successfully:");
    println!("- Resolution: {width}x{height}");
    println!("Capturing. Press Ctrl-C to stop.");

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        if let Err(err) = ctrlc::set_handler(move || stop.store(true, Ordering::Relaxed)) {
            warn!(error = %err, "interrupt handler unavailable");
        }
    }

    let mut perf = PerformanceMonitor::new();
    let mut captured = 0u64;
    let mut pending_snapshot = args.snapshot.as_deref();

    loop {
        if stop.load(Ordering::Relaxed) {
            info!("camera test stopped by user");
            break;
        }
        if args.frames > 0 && captured >= args.frames {
            break;
        }

        match source.next_frame() {
            Ok(Some(frame)) => {
                captured += 1;
                perf.tick();

                if let Some(path) = pending_snapshot.take() {
                    match save_snapshot(path, &frame) {
                        Ok(()) => println!("Snapshot saved to {}", path.display()),
                        Err(err) => eprintln!("ERROR: failed to save snapshot: {err}"),
                    }
                }

                if captured % 30 == 0 {
                    println!("Frames: {captured}  FPS: {:.2}", perf.fps());
                }
            }
            Ok(None) => {
                println!("Capture stream ended.");
                break;
            }
            Err(err) => {
                eprintln!("ERROR: failed to grab frame: {err}");
                break;
            }
        }
    }

    println!("Camera test complete.");
    0
}

fn save_snapshot(path: &Path, frame: &VideoFrame) -> anyhow::Result<()> {
    image::save_buffer(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ExtendedColorType::Rgb8,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolution_accepts_wxh() {
        assert_eq!(parse_resolution("640x480"), Ok((640, 480)));
        assert_eq!(parse_resolution("1920x1080"), Ok((1920, 1080)));
    }

    #[test]
    fn test_parse_resolution_rejects_malformed() {
        assert!(parse_resolution("640").is_err());
        assert!(parse_resolution("640x").is_err());
        assert!(parse_resolution("x480").is_err());
        assert!(parse_resolution("640xabc").is_err());
        assert!(parse_resolution("0x480").is_err());
        assert!(parse_resolution("640X480").is_err());
    }
}
