//! Open-buffer bookkeeping. The list always holds at least one entry and
//! exposes the current buffer through accessors; nothing else in the system
//! holds a "current buffer" pointer.

use core_text::TextBuffer;
use std::path::PathBuf;

pub struct BufferEntry {
    pub buffer: TextBuffer,
    /// Backing file, when the buffer came from (or was saved to) one.
    pub path: Option<PathBuf>,
}

pub struct BufferList {
    entries: Vec<BufferEntry>,
    current: usize,
}

impl BufferList {
    pub fn new(first: BufferEntry) -> Self {
        Self {
            entries: vec![first],
            current: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false given the at-least-one-entry invariant, but answered
    /// honestly from the storage.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &BufferEntry {
        &self.entries[self.current]
    }

    pub fn current_mut(&mut self) -> &mut BufferEntry {
        &mut self.entries[self.current]
    }

    pub fn push(&mut self, entry: BufferEntry) {
        self.entries.push(entry);
    }

    /// Cycle to the next buffer, wrapping at the end.
    pub fn rotate(&mut self) {
        self.current = (self.current + 1) % self.entries.len();
    }

    pub fn iter(&self) -> impl Iterator<Item = &BufferEntry> {
        self.entries.iter()
    }
}
