//! Turns decoded keys into buffer operations. One key, one dispatch, zero
//! or more buffer mutations; the outcome tells the caller whether visible
//! lines changed and whether the editor should exit.

use core_events::Key;
use core_text::{codepoint, Cursor, TextBuffer};
use std::path::PathBuf;
use tracing::debug;

use crate::buffers::{BufferEntry, BufferList};
use crate::io_ops::{self, LoadError};
use crate::keymap::{action_for, Action};

/// What one keystroke did to the world.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// The editor should shut down.
    pub quit: bool,
    /// Visible lines (not just the cursor) may have changed.
    pub repaint: bool,
    /// The current buffer changed identity.
    pub switched: bool,
}

pub struct Editor {
    buffers: BufferList,
    /// Most recently cut fragment, in splice shape.
    clipboard: Vec<String>,
    message: String,
    pending_quit: bool,
}

impl Editor {
    pub fn new(first: BufferEntry) -> Self {
        Self {
            buffers: BufferList::new(first),
            clipboard: Vec::new(),
            message: String::new(),
            pending_quit: false,
        }
    }

    /// Start from a file on disk (or a fresh buffer if it does not exist).
    pub fn open(path: PathBuf) -> Result<Self, LoadError> {
        let buffer = io_ops::load_document(&path)?;
        Ok(Self::new(BufferEntry {
            buffer,
            path: Some(path),
        }))
    }

    pub fn add_buffer(&mut self, entry: BufferEntry) {
        self.buffers.push(entry);
    }

    pub fn buffers(&self) -> &BufferList {
        &self.buffers
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffers.current().buffer
    }

    pub fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffers.current_mut().buffer
    }

    /// The one-line result of the last dispatch, for the status row.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Apply one key. `page_rows` is the height of the view, used by the
    /// page motions.
    pub fn dispatch(&mut self, key: Key, page_rows: usize) -> Dispatch {
        let action = action_for(key);
        debug!(target: "dispatch", ?key, ?action, "key dispatched");
        self.message.clear();
        if self.pending_quit && action != Action::Quit {
            self.pending_quit = false;
        }
        let mut out = Dispatch::default();
        match action {
            Action::MoveUp => self.buffer_mut().move_cursor(-1, 0),
            Action::MoveDown => self.buffer_mut().move_cursor(1, 0),
            Action::MoveLeft => self.move_left(),
            Action::MoveRight => self.move_right(),
            Action::LineStart => self.buffer_mut().set_cursor(None, Some(1)),
            Action::LineEnd => self.buffer_mut().set_cursor(None, Some(i64::MAX)),
            Action::PageUp => self.buffer_mut().move_cursor(-(page_rows as i64), 0),
            Action::PageDown => self.buffer_mut().move_cursor(page_rows as i64, 0),
            Action::InsertChar(c) => {
                let mut s = String::new();
                s.push(c);
                if self.buffer_mut().insert(&[s]).is_ok() {
                    out.repaint = true;
                }
            }
            Action::InsertNewline => {
                if self.buffer_mut().insert(&["", ""]).is_ok() {
                    out.repaint = true;
                }
            }
            Action::Backspace => out.repaint = self.backspace(),
            Action::DeleteForward => out.repaint = self.delete_forward(),
            Action::SetMark => {
                self.buffer_mut().set_mark();
                self.message.push_str("Mark set");
            }
            Action::ClearMark => {
                if self.buffer().has_mark() {
                    self.buffer_mut().clear_mark();
                    self.message.push_str("Mark cleared");
                    out.repaint = true;
                }
            }
            Action::Cut => out.repaint = self.cut(),
            Action::Paste => out.repaint = self.paste(),
            Action::Undo => match self.buffer_mut().undo() {
                Ok(()) => out.repaint = true,
                Err(err) => self.message.push_str(&err.to_string()),
            },
            Action::Redo => match self.buffer_mut().redo() {
                Ok(()) => out.repaint = true,
                Err(err) => self.message.push_str(&err.to_string()),
            },
            Action::Save => self.save(),
            Action::NextBuffer => {
                self.buffers.rotate();
                let name = self.buffer().name.clone();
                self.message.push_str(&name);
                out.switched = true;
                out.repaint = true;
            }
            Action::Quit => out.quit = self.confirm_quit(),
            Action::Unbound => {
                self.message = format!("{key} is not bound");
            }
        }
        out
    }

    fn line_len(&self, line: usize) -> usize {
        codepoint::count(self.buffer().line(line).unwrap_or(""))
    }

    fn move_left(&mut self) {
        let cur = self.buffer().cursor();
        if cur.col > 1 {
            self.buffer_mut().move_cursor(0, -1);
        } else if cur.line > 1 {
            let col = self.line_len(cur.line - 1) + 1;
            self.buffer_mut()
                .set_cursor(Some(cur.line as i64 - 1), Some(col as i64));
        }
    }

    fn move_right(&mut self) {
        let cur = self.buffer().cursor();
        if cur.col <= self.line_len(cur.line) {
            self.buffer_mut().move_cursor(0, 1);
        } else if cur.line < self.buffer().line_count() {
            self.buffer_mut()
                .set_cursor(Some(cur.line as i64 + 1), Some(1));
        }
    }

    /// Step left (wrapping over line joins) and delete forward to where the
    /// cursor was. At the start of the document this is a no-op.
    fn backspace(&mut self) -> bool {
        let cur = self.buffer().cursor();
        if cur == Cursor::origin() {
            return false;
        }
        self.move_left();
        self.buffer_mut().delete(cur);
        true
    }

    fn delete_forward(&mut self) -> bool {
        let cur = self.buffer().cursor();
        let target = if cur.col <= self.line_len(cur.line) {
            Cursor::new(cur.line, cur.col + 1)
        } else if cur.line < self.buffer().line_count() {
            Cursor::new(cur.line + 1, 1)
        } else {
            return false;
        };
        self.buffer_mut().delete(target);
        true
    }

    fn cut(&mut self) -> bool {
        let Some((begin, end)) = self.buffer().selection() else {
            self.message.push_str("No mark set");
            return false;
        };
        let buf = self.buffer_mut();
        buf.set_cursor(Some(begin.line as i64), Some(begin.col as i64));
        let removed = buf.delete(end);
        buf.clear_mark();
        self.clipboard = removed;
        self.message = format!("Cut {} line(s)", self.clipboard.len());
        true
    }

    fn paste(&mut self) -> bool {
        if self.clipboard.is_empty() {
            self.message.push_str("Nothing to paste");
            return false;
        }
        let frag = self.clipboard.clone();
        match self.buffer_mut().insert(&frag) {
            Ok(()) => true,
            Err(err) => {
                self.message.push_str(&err.to_string());
                false
            }
        }
    }

    fn save(&mut self) {
        let entry = self.buffers.current_mut();
        let Some(path) = entry.path.clone() else {
            self.message.push_str("No file name");
            return;
        };
        match io_ops::save_document(&path, &mut entry.buffer) {
            Ok(lines) => self.message = format!("Saved {lines} line(s) to {}", path.display()),
            Err(err) => self.message = format!("Save failed: {err}"),
        }
    }

    /// Quitting with unsaved changes takes a second confirmation press.
    fn confirm_quit(&mut self) -> bool {
        let dirty = self.buffers.iter().any(|e| e.buffer.dirty);
        if dirty && !self.pending_quit {
            self.pending_quit = true;
            self.message
                .push_str("Unsaved changes; press quit again to discard");
            return false;
        }
        true
    }
}
