//! Frame display contract
//!
//! Window rendering is an external collaborator; the loop only needs to
//! hand frames over and poll for key commands. The headless implementation
//! keeps the monitor and diagnostics runnable on machines with no display.

use camera_capture::frame::VideoFrame;

/// Interactive key commands the display can report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// `q`: stop the loop
    Quit,
    /// `s`: save a snapshot of the current frame
    Snapshot,
}

/// Presentation surface for processed frames
pub trait FrameDisplay {
    /// Present one annotated frame
    fn show(&mut self, frame: &VideoFrame) -> anyhow::Result<()>;

    /// Non-blocking key poll, once per loop iteration
    fn poll_key(&mut self) -> Option<KeyCommand>;
}

/// Display that discards frames and reports no key presses
#[derive(Debug, Default)]
pub struct HeadlessDisplay;

impl FrameDisplay for HeadlessDisplay {
    fn show(&mut self, _frame: &VideoFrame) -> anyhow::Result<()> {
        Ok(())
    }

    fn poll_key(&mut self) -> Option<KeyCommand> {
        None
    }
}
