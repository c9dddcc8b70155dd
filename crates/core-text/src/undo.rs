//! Bounded edit history with a movable replay pointer.
//!
//! Each record captures enough to invert an edit exactly: what kind it was,
//! the fragment of lines it touched, and the anchor position where it was
//! applied. The log is a single vector with a pointer `top`; entries below
//! the pointer are undoable, entries at or above it are redo-pending. A
//! fresh edit truncates the redo tail before appending.

use tracing::trace;

/// Default ceiling on retained edit records. When exceeded, the oldest
/// records fall off the bottom of the log.
pub const UNDO_HISTORY_MAX: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Insert,
    Delete,
}

/// One recorded edit. `lines` is the fragment in splice shape: a single
/// element for intra-line edits, first/interior/last elements when line
/// boundaries were involved.
#[derive(Debug, Clone)]
pub struct EditRecord {
    pub kind: EditKind,
    pub lines: Vec<String>,
    pub anchor: crate::Cursor,
}

pub struct UndoLog {
    records: Vec<EditRecord>,
    /// Count of undoable records; also the index where the next record
    /// lands.
    top: usize,
    cap: usize,
}

impl UndoLog {
    pub fn new(cap: usize) -> Self {
        Self {
            records: Vec::new(),
            top: 0,
            cap: cap.max(1),
        }
    }

    /// Change the retention ceiling, trimming oldest records immediately if
    /// the log is already over it.
    pub fn set_cap(&mut self, cap: usize) {
        self.cap = cap.max(1);
        if self.records.len() > self.cap {
            let excess = self.records.len() - self.cap;
            self.records.drain(..excess);
            self.top = self.top.saturating_sub(excess);
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.top = 0;
    }

    pub fn undo_depth(&self) -> usize {
        self.top
    }

    pub fn redo_depth(&self) -> usize {
        self.records.len() - self.top
    }

    /// Append a record for a freshly applied edit, discarding any
    /// redo-pending tail and trimming the oldest entries past capacity.
    pub fn record(&mut self, kind: EditKind, lines: Vec<String>, anchor: crate::Cursor) {
        if self.top < self.records.len() {
            trace!(
                target: "buffer.undo",
                discarded = self.records.len() - self.top,
                "redo tail invalidated by new edit"
            );
            self.records.truncate(self.top);
        }
        self.records.push(EditRecord {
            kind,
            lines,
            anchor,
        });
        self.top += 1;
        if self.records.len() > self.cap {
            let excess = self.records.len() - self.cap;
            self.records.drain(..excess);
            self.top -= excess;
        }
    }

    /// Step the pointer down one record and hand it back for inversion.
    pub fn step_back(&mut self) -> Option<EditRecord> {
        if self.top == 0 {
            return None;
        }
        self.top -= 1;
        Some(self.records[self.top].clone())
    }

    /// Step the pointer up one record and hand it back for replay.
    pub fn step_forward(&mut self) -> Option<EditRecord> {
        if self.top == self.records.len() {
            return None;
        }
        let rec = self.records[self.top].clone();
        self.top += 1;
        Some(rec)
    }
}
