//! Line-oriented text buffer with a codepoint-indexed cursor, an optional
//! selection mark, and a record-based undo/redo log.
//!
//! The document is an ordered sequence of UTF-8 lines containing no newline
//! bytes; it always holds at least one line (an empty document is one empty
//! line). Lines and columns are 1-based and columns count Unicode
//! *codepoints*, never bytes; every slicing operation translates a column
//! to a byte offset first. Mutation routines clamp the cursor rather than
//! ever leaving it out of range.

use thiserror::Error;

pub mod undo;
use undo::{EditKind, EditRecord, UndoLog};
pub use undo::UNDO_HISTORY_MAX;

/// Failure taxonomy for buffer operations. All variants are local and
/// recoverable: the document is never partially modified on an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditError {
    /// A fragment line handed to `insert` (or a file line read from storage)
    /// is not valid UTF-8. Nothing was applied.
    #[error("text fragment is not valid UTF-8")]
    InvalidEncoding,
    /// The undo log boundary was reached; purely informational.
    #[error("nothing to undo")]
    NothingToUndo,
    /// The redo boundary was reached; purely informational.
    #[error("nothing to redo")]
    NothingToRedo,
}

/// A position inside a buffer: 1-based line, 1-based codepoint column.
/// `col == 1` is before the first character, `col == len + 1` is end of
/// line. Ordering is lexicographic on (line, col), i.e. document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cursor {
    pub line: usize,
    pub col: usize,
}

impl Cursor {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
    /// Start of document.
    pub fn origin() -> Self {
        Self { line: 1, col: 1 }
    }
}

/// Codepoint/byte translation helpers for a single line.
pub mod codepoint {
    /// Number of codepoints in `s`.
    pub fn count(s: &str) -> usize {
        s.chars().count()
    }

    /// Byte offset of the 1-based codepoint column `col`. `col` may be
    /// `count(s) + 1` (end of line) or beyond, in which case the full byte
    /// length is returned.
    pub fn byte_offset(s: &str, col: usize) -> usize {
        debug_assert!(col >= 1, "columns are 1-based");
        s.char_indices()
            .nth(col - 1)
            .map(|(idx, _)| idx)
            .unwrap_or(s.len())
    }
}

/// A document plus cursor, selection mark, and undo history.
pub struct TextBuffer {
    lines: Vec<String>,
    cursor: Cursor,
    mark: Option<Cursor>,
    history: UndoLog,
    /// True when the buffer has unsaved modifications.
    pub dirty: bool,
    /// Display name (usually the base file name).
    pub name: String,
}

impl TextBuffer {
    /// An empty buffer: one empty line, cursor at origin.
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_text(name, "")
    }

    /// Build a buffer from serialized document text (one `\n` after every
    /// line; a missing final newline is tolerated on input).
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        Self {
            lines: split_document(text),
            cursor: Cursor::origin(),
            mark: None,
            history: UndoLog::new(UNDO_HISTORY_MAX),
            dirty: false,
            name: name.into(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The 1-based line `idx`, without any newline.
    pub fn line(&self, idx: usize) -> Option<&str> {
        if idx >= 1 {
            self.lines.get(idx - 1).map(String::as_str)
        } else {
            None
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Codepoint length of the line under the cursor.
    pub fn cursor_line_len(&self) -> usize {
        codepoint::count(&self.lines[self.cursor.line - 1])
    }

    // ------------------------------------------------------------------
    // Cursor
    // ------------------------------------------------------------------

    /// Absolute cursor positioning. An omitted coordinate is unchanged;
    /// out-of-range values (including negative ones) clamp to `[1, N]` and
    /// `[1, len + 1]`. Always succeeds.
    pub fn set_cursor(&mut self, line: Option<i64>, col: Option<i64>) {
        let n = self.lines.len() as i64;
        let target_line = line.unwrap_or(self.cursor.line as i64).clamp(1, n) as usize;
        let max_col = codepoint::count(&self.lines[target_line - 1]) as i64 + 1;
        let target_col = col.unwrap_or(self.cursor.col as i64).clamp(1, max_col) as usize;
        self.cursor = Cursor::new(target_line, target_col);
    }

    /// Relative positioning with identical clamping. Does not wrap across
    /// line boundaries; callers wanting wrap detect end-of-line themselves.
    pub fn move_cursor(&mut self, dl: i64, dc: i64) {
        self.set_cursor(
            Some(self.cursor.line as i64 + dl),
            Some(self.cursor.col as i64 + dc),
        );
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Place the selection mark at the cursor.
    pub fn set_mark(&mut self) {
        self.mark = Some(self.cursor);
    }

    pub fn clear_mark(&mut self) {
        self.mark = None;
    }

    pub fn has_mark(&self) -> bool {
        self.mark.is_some()
    }

    /// The active selection as an ordered `(begin, end)` pair in document
    /// order, regardless of whether the mark sits before or after the
    /// cursor. The mark is re-clamped here since edits may have shortened
    /// the document underneath it.
    pub fn selection(&self) -> Option<(Cursor, Cursor)> {
        let mark = self.clamped(self.mark?);
        if mark <= self.cursor {
            Some((mark, self.cursor))
        } else {
            Some((self.cursor, mark))
        }
    }

    fn clamped(&self, pos: Cursor) -> Cursor {
        let line = pos.line.clamp(1, self.lines.len());
        let col = pos.col.clamp(1, codepoint::count(&self.lines[line - 1]) + 1);
        Cursor::new(line, col)
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Splice a fragment at the cursor. The fragment is an ordered list of
    /// lines: one element inserts no newline, `["", ""]` inserts exactly one
    /// newline, interior elements become whole new lines. The cursor moves
    /// to the end of the inserted text.
    ///
    /// Every element is validated as UTF-8 before anything is applied;
    /// failure returns [`EditError::InvalidEncoding`] with the document
    /// untouched. Records an `Insert` undo entry and marks the buffer dirty.
    pub fn insert<B: AsRef<[u8]>>(&mut self, fragment: &[B]) -> Result<(), EditError> {
        let mut frag = Vec::with_capacity(fragment.len());
        for part in fragment {
            let s = std::str::from_utf8(part.as_ref()).map_err(|_| EditError::InvalidEncoding)?;
            debug_assert!(!s.contains('\n'), "fragment lines must not embed newlines");
            frag.push(s.to_owned());
        }
        if frag.is_empty() || (frag.len() == 1 && frag[0].is_empty()) {
            return Ok(());
        }
        let anchor = self.cursor;
        self.splice_insert(&frag);
        self.history.record(EditKind::Insert, frag, anchor);
        self.dirty = true;
        Ok(())
    }

    /// Delete all text strictly between the cursor and `to`, which must lie
    /// at or after the cursor in document order (violating that is a
    /// programming error in the caller, not a recoverable condition).
    /// Intervening lines are removed and the two remainders joined. Returns
    /// the removed fragment; the cursor does not move. Records a `Delete`
    /// undo entry and marks the buffer dirty unless nothing was removed.
    pub fn delete(&mut self, to: Cursor) -> Vec<String> {
        let to = self.clamped(to);
        assert!(
            to >= self.cursor,
            "delete target {to:?} precedes cursor {:?}",
            self.cursor
        );
        let anchor = self.cursor;
        let removed = self.splice_delete(to);
        if removed.len() > 1 || !removed[0].is_empty() {
            self.history
                .record(EditKind::Delete, removed.clone(), anchor);
            self.dirty = true;
        }
        removed
    }

    // ------------------------------------------------------------------
    // Undo / redo
    // ------------------------------------------------------------------

    /// Revert the most recent recorded edit by applying its exact inverse
    /// with recording suppressed. Fails at the log boundary without
    /// touching any state.
    pub fn undo(&mut self) -> Result<(), EditError> {
        let rec = self.history.step_back().ok_or(EditError::NothingToUndo)?;
        self.apply_inverse(&rec);
        self.dirty = true;
        Ok(())
    }

    /// Re-apply the most recently undone edit. Fails with `NothingToRedo`
    /// when no redo-pending entries exist (always the case right after a
    /// fresh edit, which truncates the redo tail).
    pub fn redo(&mut self) -> Result<(), EditError> {
        let rec = self.history.step_forward().ok_or(EditError::NothingToRedo)?;
        self.apply_replay(&rec);
        self.dirty = true;
        Ok(())
    }

    fn apply_inverse(&mut self, rec: &EditRecord) {
        match rec.kind {
            EditKind::Insert => {
                self.cursor = rec.anchor;
                let end = advance(rec.anchor, &rec.lines);
                self.splice_delete(end);
            }
            EditKind::Delete => {
                self.cursor = rec.anchor;
                self.splice_insert(&rec.lines);
                // The original delete left the cursor at the anchor; an
                // exact inverse puts it back there, not at the fragment end.
                self.cursor = rec.anchor;
            }
        }
    }

    fn apply_replay(&mut self, rec: &EditRecord) {
        match rec.kind {
            EditKind::Insert => {
                self.cursor = rec.anchor;
                self.splice_insert(&rec.lines);
            }
            EditKind::Delete => {
                self.cursor = rec.anchor;
                let end = advance(rec.anchor, &rec.lines);
                self.splice_delete(end);
            }
        }
    }

    /// Adjust how many edit records are retained (oldest trimmed first).
    pub fn set_undo_capacity(&mut self, cap: usize) {
        self.history.set_cap(cap);
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    // ------------------------------------------------------------------
    // Whole-document access
    // ------------------------------------------------------------------

    /// Serialize the document: every line followed by `\n`, including the
    /// last.
    pub fn text(&self) -> String {
        let mut out = String::with_capacity(
            self.lines.iter().map(|l| l.len() + 1).sum::<usize>(),
        );
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// Text between the cursor and `to` in document order (the earlier of
    /// the two positions is treated as the start). Interior line breaks
    /// appear as `\n`.
    pub fn text_between(&self, to: Cursor) -> String {
        let to = self.clamped(to);
        let (from, to) = if self.cursor <= to {
            (self.cursor, to)
        } else {
            (to, self.cursor)
        };
        if from.line == to.line {
            let line = &self.lines[from.line - 1];
            let fb = codepoint::byte_offset(line, from.col);
            let tb = codepoint::byte_offset(line, to.col);
            return line[fb..tb].to_owned();
        }
        let first = &self.lines[from.line - 1];
        let mut out = first[codepoint::byte_offset(first, from.col)..].to_owned();
        for idx in from.line..to.line - 1 {
            out.push('\n');
            out.push_str(&self.lines[idx]);
        }
        out.push('\n');
        let last = &self.lines[to.line - 1];
        out.push_str(&last[..codepoint::byte_offset(last, to.col)]);
        out
    }

    /// Replace the whole document. Explicitly not undoable: the undo log is
    /// cleared, the cursor resets to (1,1), and any mark is dropped.
    pub fn set_text(&mut self, text: &str) {
        self.lines = split_document(text);
        self.cursor = Cursor::origin();
        self.mark = None;
        self.history.clear();
        self.dirty = true;
    }

    // ------------------------------------------------------------------
    // Unrecorded splice primitives (shared by edits and undo replay)
    // ------------------------------------------------------------------

    fn splice_insert(&mut self, frag: &[String]) {
        let Cursor { line, col } = self.cursor;
        let idx = line - 1;
        let byte = codepoint::byte_offset(&self.lines[idx], col);
        let tail = self.lines[idx].split_off(byte);
        self.lines[idx].push_str(&frag[0]);
        if frag.len() == 1 {
            self.lines[idx].push_str(&tail);
            self.cursor = Cursor::new(line, col + codepoint::count(&frag[0]));
        } else {
            let mut new_lines: Vec<String> = frag[1..].to_vec();
            let last = new_lines.len() - 1;
            let end_col = codepoint::count(&new_lines[last]) + 1;
            new_lines[last].push_str(&tail);
            self.lines.splice(idx + 1..idx + 1, new_lines);
            self.cursor = Cursor::new(line + frag.len() - 1, end_col);
        }
    }

    /// Remove `[cursor, to)` and return the removed fragment in the same
    /// shape `insert` accepts (so a record replays losslessly). Caller
    /// guarantees `to >= cursor` and both positions valid.
    fn splice_delete(&mut self, to: Cursor) -> Vec<String> {
        let from = self.cursor;
        debug_assert!(to >= from);
        let fi = from.line - 1;
        let ti = to.line - 1;
        let fb = codepoint::byte_offset(&self.lines[fi], from.col);
        let tb = codepoint::byte_offset(&self.lines[ti], to.col);
        if fi == ti {
            let removed = self.lines[fi][fb..tb].to_owned();
            self.lines[fi].replace_range(fb..tb, "");
            return vec![removed];
        }
        let mut removed = vec![self.lines[fi][fb..].to_owned()];
        let mut drained: Vec<String> = self.lines.drain(fi + 1..=ti).collect();
        // The last drained line splits: its prefix was deleted, its suffix
        // joins the first remainder.
        let last = drained.pop().unwrap_or_default();
        removed.extend(drained);
        removed.push(last[..tb].to_owned());
        self.lines[fi].truncate(fb);
        self.lines[fi].push_str(&last[tb..]);
        removed
    }
}

/// End position of a fragment applied at `anchor` (where the cursor lands
/// after inserting it, and the delete target that removes it again).
fn advance(anchor: Cursor, frag: &[String]) -> Cursor {
    if frag.len() == 1 {
        Cursor::new(anchor.line, anchor.col + codepoint::count(&frag[0]))
    } else {
        Cursor::new(
            anchor.line + frag.len() - 1,
            codepoint::count(&frag[frag.len() - 1]) + 1,
        )
    }
}

/// Split serialized text into document lines. A trailing `\n` terminates the
/// final line rather than opening an empty one; zero-length input is a
/// single empty line.
fn split_document(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text.split('\n').map(str::to_owned).collect();
    if text.ends_with('\n') && lines.len() > 1 {
        lines.pop();
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf(text: &str) -> TextBuffer {
        TextBuffer::from_text("test", text)
    }

    #[test]
    fn empty_document_is_one_empty_line() {
        let b = buf("");
        assert_eq!(b.line_count(), 1);
        assert_eq!(b.line(1), Some(""));
        assert_eq!(b.cursor(), Cursor::origin());
    }

    #[test]
    fn from_text_drops_terminating_newline_only() {
        let b = buf("a\nb\n");
        assert_eq!(b.line_count(), 2);
        assert_eq!(b.line(2), Some("b"));
        let c = buf("a\nb");
        assert_eq!(c.line_count(), 2);
        let d = buf("a\n\n");
        assert_eq!(d.line_count(), 2);
        assert_eq!(d.line(2), Some(""));
    }

    #[test]
    fn set_cursor_clamps_all_inputs() {
        let mut b = buf("héllo\nxy\n");
        for (i, j) in [(-5i64, -9i64), (0, 0), (99, 99), (2, 100), (1, 3)] {
            b.set_cursor(Some(i), Some(j));
            let c = b.cursor();
            assert!((1..=2).contains(&c.line), "line clamped for ({i},{j})");
            let max = codepoint::count(b.line(c.line).unwrap()) + 1;
            assert!((1..=max).contains(&c.col), "col clamped for ({i},{j})");
        }
        b.set_cursor(Some(1), Some(99));
        assert_eq!(b.cursor(), Cursor::new(1, 6), "clamp counts codepoints");
    }

    #[test]
    fn set_cursor_partial_coordinates() {
        let mut b = buf("abcdef\nxy\n");
        b.set_cursor(Some(1), Some(5));
        b.set_cursor(Some(2), None);
        assert_eq!(b.cursor(), Cursor::new(2, 3), "col re-clamped to new line");
        b.set_cursor(None, Some(1));
        assert_eq!(b.cursor(), Cursor::new(2, 1));
    }

    #[test]
    fn move_cursor_does_not_wrap() {
        let mut b = buf("ab\ncd\n");
        b.set_cursor(Some(1), Some(3));
        b.move_cursor(0, 1);
        assert_eq!(b.cursor(), Cursor::new(1, 3), "stays at end of line");
        b.move_cursor(0, -10);
        assert_eq!(b.cursor(), Cursor::new(1, 1));
    }

    #[test]
    fn insert_single_line_fragment() {
        let mut b = buf("hello\n");
        b.set_cursor(Some(1), Some(3));
        b.insert(&["XY"]).unwrap();
        assert_eq!(b.line(1), Some("heXYllo"));
        assert_eq!(b.cursor(), Cursor::new(1, 5));
        assert!(b.dirty);
    }

    #[test]
    fn insert_two_empty_elements_is_one_newline() {
        let mut b = buf("hello\n");
        b.set_cursor(Some(1), Some(3));
        b.insert(&["", ""]).unwrap();
        assert_eq!(b.line(1), Some("he"));
        assert_eq!(b.line(2), Some("llo"));
        assert_eq!(b.cursor(), Cursor::new(2, 1));
    }

    #[test]
    fn insert_multi_line_fragment() {
        let mut b = buf("ab\n");
        b.set_cursor(Some(1), Some(2));
        b.insert(&["1", "22", "333"]).unwrap();
        assert_eq!(b.text(), "a1\n22\n333b\n");
        assert_eq!(b.cursor(), Cursor::new(3, 4));
    }

    #[test]
    fn insert_counts_codepoints_not_bytes() {
        let mut b = buf("aé\n");
        b.set_cursor(Some(1), Some(3));
        b.insert(&["ü"]).unwrap();
        assert_eq!(b.line(1), Some("aéü"));
        assert_eq!(b.cursor(), Cursor::new(1, 4));
    }

    #[test]
    fn insert_rejects_invalid_utf8_without_side_effects() {
        let mut b = buf("keep\n");
        b.set_cursor(Some(1), Some(2));
        let before = b.text();
        let cursor = b.cursor();
        let err = b.insert(&[&b"\xFF\xFE"[..]]).unwrap_err();
        assert_eq!(err, EditError::InvalidEncoding);
        assert_eq!(b.text(), before);
        assert_eq!(b.cursor(), cursor);
        assert_eq!(b.undo_depth(), 0, "no record pushed on failure");
        assert!(!b.dirty);
    }

    #[test]
    fn insert_rejects_when_any_element_is_invalid() {
        let mut b = buf("x\n");
        let frag: Vec<&[u8]> = vec![b"ok", b"\xC3\x28"];
        assert_eq!(b.insert(&frag).unwrap_err(), EditError::InvalidEncoding);
        assert_eq!(b.text(), "x\n");
    }

    #[test]
    fn delete_within_line() {
        let mut b = buf("abcdef\n");
        b.set_cursor(Some(1), Some(2));
        let removed = b.delete(Cursor::new(1, 5));
        assert_eq!(removed, vec!["bcd".to_owned()]);
        assert_eq!(b.line(1), Some("aef"));
        assert_eq!(b.cursor(), Cursor::new(1, 2));
    }

    #[test]
    fn delete_across_lines_joins_remainders() {
        let mut b = buf("one\ntwo\nthree\n");
        b.set_cursor(Some(1), Some(3));
        let removed = b.delete(Cursor::new(3, 3));
        assert_eq!(
            removed,
            vec!["e".to_owned(), "two".to_owned(), "th".to_owned()]
        );
        assert_eq!(b.text(), "onree\n");
        assert_eq!(b.cursor(), Cursor::new(1, 3));
    }

    #[test]
    fn delete_newline_only() {
        let mut b = buf("ab\ncd\n");
        b.set_cursor(Some(1), Some(3));
        let removed = b.delete(Cursor::new(2, 1));
        assert_eq!(removed, vec![String::new(), String::new()]);
        assert_eq!(b.text(), "abcd\n");
    }

    #[test]
    #[should_panic(expected = "precedes cursor")]
    fn delete_before_cursor_is_a_contract_violation() {
        let mut b = buf("abc\n");
        b.set_cursor(Some(1), Some(3));
        b.delete(Cursor::new(1, 1));
    }

    #[test]
    fn selection_is_always_ordered() {
        let mut b = buf("one\ntwo\n");
        b.set_cursor(Some(2), Some(2));
        b.set_mark();
        b.set_cursor(Some(1), Some(1));
        let (begin, end) = b.selection().unwrap();
        assert!(begin <= end);
        assert_eq!(begin, Cursor::new(1, 1));
        assert_eq!(end, Cursor::new(2, 2));
        // Mark before cursor orders identically.
        b.set_cursor(Some(1), Some(2));
        b.set_mark();
        b.set_cursor(Some(2), Some(1));
        let (begin, end) = b.selection().unwrap();
        assert!(begin <= end);
        assert_eq!(begin, Cursor::new(1, 2));
    }

    #[test]
    fn selection_mark_reclamps_after_shrink() {
        let mut b = buf("abcdef\nxyz\n");
        b.set_cursor(Some(2), Some(4));
        b.set_mark();
        b.set_cursor(Some(1), Some(1));
        b.delete(Cursor::new(2, 4));
        let (begin, end) = b.selection().unwrap();
        assert!(begin <= end);
        assert!(end.line <= b.line_count());
    }

    #[test]
    fn text_between_spans_lines() {
        let mut b = buf("one\ntwo\nthree\n");
        b.set_cursor(Some(1), Some(3));
        assert_eq!(b.text_between(Cursor::new(3, 3)), "e\ntwo\nth");
        // Reversed point reads the same span.
        b.set_cursor(Some(3), Some(3));
        assert_eq!(b.text_between(Cursor::new(1, 3)), "e\ntwo\nth");
    }

    #[test]
    fn set_text_clears_history_and_resets_cursor() {
        let mut b = buf("old\n");
        b.insert(&["x"]).unwrap();
        assert_eq!(b.undo_depth(), 1);
        b.set_text("new\ncontent\n");
        assert_eq!(b.undo_depth(), 0);
        assert_eq!(b.cursor(), Cursor::origin());
        assert_eq!(b.undo().unwrap_err(), EditError::NothingToUndo);
        assert_eq!(b.text(), "new\ncontent\n");
    }

    #[test]
    fn undo_insert_restores_document_and_cursor() {
        let mut b = buf("hello\n");
        b.set_cursor(Some(1), Some(3));
        b.insert(&["XY", "Z"]).unwrap();
        assert_eq!(b.text(), "heXY\nZllo\n");
        b.undo().unwrap();
        assert_eq!(b.text(), "hello\n");
        assert_eq!(b.cursor(), Cursor::new(1, 3));
    }

    #[test]
    fn undo_delete_reinserts_fragment() {
        let mut b = buf("one\ntwo\n");
        b.set_cursor(Some(1), Some(2));
        b.delete(Cursor::new(2, 2));
        assert_eq!(b.text(), "owo\n");
        b.undo().unwrap();
        assert_eq!(b.text(), "one\ntwo\n");
        assert_eq!(b.cursor(), Cursor::new(1, 2), "back at the delete anchor");
    }

    #[test]
    fn redo_reproduces_insert_exactly() {
        let mut b = buf("hello\n");
        b.set_cursor(Some(1), Some(3));
        b.insert(&["ab"]).unwrap();
        let after_text = b.text();
        let after_cursor = b.cursor();
        b.undo().unwrap();
        b.redo().unwrap();
        assert_eq!(b.text(), after_text);
        assert_eq!(b.cursor(), after_cursor);
    }

    #[test]
    fn boundary_errors_leave_pointer_alone() {
        let mut b = buf("x\n");
        assert_eq!(b.undo().unwrap_err(), EditError::NothingToUndo);
        assert_eq!(b.redo().unwrap_err(), EditError::NothingToRedo);
        b.insert(&["y"]).unwrap();
        assert_eq!(b.redo().unwrap_err(), EditError::NothingToRedo);
        b.undo().unwrap();
        assert_eq!(b.undo().unwrap_err(), EditError::NothingToUndo);
        // The failed undo must not have consumed the redo entry.
        b.redo().unwrap();
        assert_eq!(b.line(1), Some("yx"));
    }

    #[test]
    fn new_edit_after_undo_truncates_redo_tail() {
        let mut b = buf("\n");
        b.insert(&["aaa"]).unwrap();
        b.insert(&["bbb"]).unwrap();
        b.undo().unwrap();
        assert_eq!(b.redo_depth(), 1);
        b.insert(&["ccc"]).unwrap();
        assert_eq!(b.redo_depth(), 0);
        assert_eq!(b.redo().unwrap_err(), EditError::NothingToRedo);
        assert_eq!(b.line(1), Some("aaaccc"));
    }
}
