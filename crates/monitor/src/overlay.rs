//! Frame annotation painting
//!
//! Draws detection results into the RGB frame buffer: landmark dots, face
//! boxes, and a red tint while an alert is firing. Painting is purely
//! presentational; detection results are computed before any of this runs.

use crate::settings::DisplaySettings;
use camera_capture::frame::VideoFrame;
use drowsiness::FrameAnalysis;

const LANDMARK_COLOR: [u8; 3] = [0, 255, 0];
const BOX_COLOR: [u8; 3] = [0, 200, 255];

/// Paint one frame's annotations according to the display toggles
pub fn annotate(frame: &mut VideoFrame, analysis: &FrameAnalysis, display: &DisplaySettings) {
    if display.show_landmarks {
        for face in &analysis.faces {
            draw_box(
                frame,
                face.region.x,
                face.region.y,
                face.region.width,
                face.region.height,
            );
            if let Some(landmarks) = &face.landmarks {
                for point in landmarks.points() {
                    draw_dot(frame, point.x, point.y);
                }
            }
        }
    }

    if analysis.has_alerts() {
        tint_red(frame);
    }
}

/// 3x3 dot centered on (x, y); off-frame parts are clipped
fn draw_dot(frame: &mut VideoFrame, x: i32, y: i32) {
    for dy in -1..=1 {
        for dx in -1..=1 {
            let (px, py) = (x + dx, y + dy);
            if px >= 0 && py >= 0 {
                frame.put_pixel(px as u32, py as u32, LANDMARK_COLOR);
            }
        }
    }
}

fn draw_box(frame: &mut VideoFrame, x: i32, y: i32, width: u32, height: u32) {
    let x1 = x + width as i32;
    let y1 = y + height as i32;
    for px in x..=x1 {
        put_clipped(frame, px, y);
        put_clipped(frame, px, y1);
    }
    for py in y..=y1 {
        put_clipped(frame, x, py);
        put_clipped(frame, x1, py);
    }
}

fn put_clipped(frame: &mut VideoFrame, x: i32, y: i32) {
    if x >= 0 && y >= 0 {
        frame.put_pixel(x as u32, y as u32, BOX_COLOR);
    }
}

/// Blend 20% red over the whole frame, matching the alert banner effect
fn tint_red(frame: &mut VideoFrame) {
    for pixel in frame.data.chunks_mut(3) {
        pixel[0] = (pixel[0] as u16 * 4 / 5 + 51) as u8;
        pixel[1] = (pixel[1] as u16 * 4 / 5) as u8;
        pixel[2] = (pixel[2] as u16 * 4 / 5) as u8;
    }
}
