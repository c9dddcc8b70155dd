//! Screen presentation: mapping a buffer onto a bounded character grid.
//!
//! The [`Viewport`] decides what to draw (scroll offsets, repaint vs.
//! cursor-only refresh, per-line rendering with tab expansion, selection
//! highlighting, overflow and end-of-text markers) and drives an abstract
//! [`ScreenSink`]. The [`Writer`] is the crossterm-backed sink used in
//! production; tests substitute a capturing sink.

use anyhow::Result;

mod status;
mod viewport;
mod writer;

pub use status::{compose_status, format_status, StatusContext, StatusSegment};
pub use viewport::{Viewport, DEFAULT_TAB_WIDTH, HSCROLL_STRIDE};
pub use writer::Writer;

/// A rectangular screen region, in 0-based terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub row: u16,
    pub col: u16,
    pub height: u16,
    pub width: u16,
}

impl Rect {
    pub fn new(row: u16, col: u16, height: u16, width: u16) -> Self {
        Self {
            row,
            col,
            height,
            width,
        }
    }
}

/// The four primitive capabilities the renderer needs from a terminal.
/// Everything is queued; nothing reaches the device until `flush`.
pub trait ScreenSink {
    /// Absolute positioning, 0-based (row, col).
    fn move_to(&mut self, row: u16, col: u16);
    /// Clear the line under the current position to its end.
    fn clear_line(&mut self);
    /// Toggle reverse-video for subsequent prints.
    fn set_reverse(&mut self, on: bool);
    fn print(&mut self, text: &str);
    fn flush(&mut self) -> Result<()>;
}
