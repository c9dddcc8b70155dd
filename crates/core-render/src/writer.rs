//! Crossterm-backed [`ScreenSink`]: commands are queued in order and
//! translated into terminal escapes in a single flush, so a frame never
//! reaches the device half-drawn.

use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType},
};
use std::io::{stdout, Write as _};

use crate::ScreenSink;

#[derive(Debug)]
enum Command {
    MoveTo(u16, u16),
    ClearLine,
    SetReverse(bool),
    Print(String),
}

/// Buffered terminal writer. Short-lived in spirit (one frame of commands),
/// but reusable: `flush` drains the queue.
#[derive(Default)]
pub struct Writer {
    cmds: Vec<Command>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScreenSink for Writer {
    fn move_to(&mut self, row: u16, col: u16) {
        self.cmds.push(Command::MoveTo(row, col));
    }

    fn clear_line(&mut self) {
        self.cmds.push(Command::ClearLine);
    }

    fn set_reverse(&mut self, on: bool) {
        self.cmds.push(Command::SetReverse(on));
    }

    fn print(&mut self, text: &str) {
        if !text.is_empty() {
            self.cmds.push(Command::Print(text.to_owned()));
        }
    }

    fn flush(&mut self) -> Result<()> {
        let mut out = stdout();
        for cmd in self.cmds.drain(..) {
            match cmd {
                // MoveTo takes (column, row).
                Command::MoveTo(row, col) => queue!(out, MoveTo(col, row))?,
                Command::ClearLine => queue!(out, Clear(ClearType::UntilNewLine))?,
                Command::SetReverse(true) => queue!(out, SetAttribute(Attribute::Reverse))?,
                Command::SetReverse(false) => queue!(out, SetAttribute(Attribute::NoReverse))?,
                Command::Print(s) => queue!(out, Print(s))?,
            }
        }
        out.flush()?;
        Ok(())
    }
}
