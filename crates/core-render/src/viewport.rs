//! The redisplay engine: per-buffer scroll state plus the algorithm that
//! maps document lines onto a bounded screen rectangle.
//!
//! Scrolling is deliberately coarse. Vertically, the view only moves when
//! the cursor crosses the box edge, and then it recenters rather than
//! creeping one line at a time. Horizontally, the offset jumps in fixed
//! strides so long lines do not rescroll on every keystroke.

use anyhow::Result;
use core_text::{Cursor, TextBuffer};
use tracing::debug;

use crate::{Rect, ScreenSink};

pub const DEFAULT_TAB_WIDTH: usize = 8;
/// Horizontal scroll granularity, in columns.
pub const HSCROLL_STRIDE: usize = 40;

/// Shown in place of control characters.
const SUBSTITUTE: char = '?';
/// Shown in the last column when a line continues past the right edge.
const OVERFLOW: char = '$';
/// Shown on rows past the end of the document.
const END_OF_TEXT: char = '~';

/// Per-buffer view state bound to a screen rectangle. Owns nothing of the
/// buffer; it reads the buffer each refresh and keeps only scroll offsets.
pub struct Viewport {
    rect: Rect,
    /// First visible document line, 1-based.
    top_line: usize,
    /// Horizontal offset in rendered columns.
    hscroll: usize,
    dirty: bool,
    tab_width: usize,
    hstride: usize,
}

impl Viewport {
    pub fn new(rect: Rect) -> Self {
        Self::with_options(rect, DEFAULT_TAB_WIDTH, HSCROLL_STRIDE)
    }

    pub fn with_options(rect: Rect, tab_width: usize, hstride: usize) -> Self {
        Self {
            rect,
            top_line: 1,
            hscroll: 0,
            dirty: true,
            tab_width: tab_width.max(1),
            hstride: hstride.max(1),
        }
    }

    pub fn top_line(&self) -> usize {
        self.top_line
    }

    pub fn hscroll(&self) -> usize {
        self.hscroll
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Rebind to a new rectangle (terminal resize). Forces a repaint.
    pub fn rebind(&mut self, rect: Rect) {
        self.rect = rect;
        self.dirty = true;
    }

    /// Force the next refresh to repaint every visible line.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// One redisplay pass: adjust scroll to keep the cursor visible, repaint
    /// visible lines when required (scroll changed, explicitly dirtied, or a
    /// selection is active), refresh the status row, and park the hardware
    /// cursor. On the clean path nothing but the status row and the cursor
    /// position are touched.
    pub fn refresh(
        &mut self,
        buf: &TextBuffer,
        status: &str,
        sink: &mut dyn ScreenSink,
    ) -> Result<()> {
        let height = self.rect.height as usize;
        let width = self.rect.width as usize;
        if height == 0 || width == 0 {
            return Ok(());
        }
        let cursor = buf.cursor();

        if cursor.line < self.top_line || cursor.line >= self.top_line + height {
            self.top_line = cursor.line.saturating_sub(height / 2).max(1);
            self.dirty = true;
            debug!(target: "render.viewport", top = self.top_line, "recentered view");
        }

        let line = buf.line(cursor.line).unwrap_or("");
        let cy = rendered_col(line, cursor.col, self.tab_width);
        let mut hs = self.hscroll;
        while cy < hs {
            hs = hs.saturating_sub(self.hstride);
        }
        while cy >= hs + width {
            hs += self.hstride;
        }
        if hs != self.hscroll {
            self.hscroll = hs;
            self.dirty = true;
            debug!(target: "render.viewport", hscroll = hs, "horizontal stride shift");
        }

        // Selection spans can cross the box edges, so highlighted frames are
        // always repainted in full.
        let selection = buf.selection();
        if self.dirty || selection.is_some() {
            self.paint(buf, selection, sink);
            self.dirty = false;
        }

        let status_row = self.rect.row + self.rect.height;
        sink.move_to(status_row, self.rect.col);
        sink.clear_line();
        let clipped: String = status.chars().take(width).collect();
        sink.print(&clipped);

        let crow = self.rect.row + (cursor.line - self.top_line) as u16;
        let ccol = self.rect.col + (cy - self.hscroll) as u16;
        sink.move_to(crow, ccol);
        sink.flush()
    }

    fn paint(&self, buf: &TextBuffer, selection: Option<(Cursor, Cursor)>, sink: &mut dyn ScreenSink) {
        let width = self.rect.width as usize;
        for row in 0..self.rect.height {
            let li = self.top_line + row as usize;
            sink.move_to(self.rect.row + row, self.rect.col);
            sink.clear_line();
            match buf.line(li) {
                Some(text) => {
                    let span = selection.and_then(|(b, e)| selected_cols(li, text, b, e));
                    render_line(sink, text, self.hscroll, width, self.tab_width, span);
                }
                None => {
                    let mut marker = String::new();
                    marker.push(END_OF_TEXT);
                    sink.print(&marker);
                }
            }
        }
    }
}

/// Rendered (tab-expanded) column of 1-based codepoint column `col`,
/// counted from the start of the line. 0-based.
pub fn rendered_col(text: &str, col: usize, tab_width: usize) -> usize {
    let mut rc = 0usize;
    for ch in text.chars().take(col.saturating_sub(1)) {
        rc += if ch == '\t' { tab_width - (rc % tab_width) } else { 1 };
    }
    rc
}

/// The selected codepoint column range `[from, to)` of line `li`, or `None`
/// when the selection does not touch it.
fn selected_cols(li: usize, text: &str, begin: Cursor, end: Cursor) -> Option<(usize, usize)> {
    if li < begin.line || li > end.line {
        return None;
    }
    let from = if li == begin.line { begin.col } else { 1 };
    let to = if li == end.line {
        end.col
    } else {
        text.chars().count() + 1
    };
    (from < to).then_some((from, to))
}

/// Stream one document line into the sink: tabs expand to the next tab
/// stop, control characters render as the substitute glyph, and the cells
/// in `selection` (1-based codepoint columns, half-open) print in
/// reverse video. When the line runs past the right edge the last column
/// shows the overflow marker.
///
/// Returns the codepoint index of the first character that was not
/// rendered (the char count when everything fit).
pub fn render_line(
    sink: &mut dyn ScreenSink,
    text: &str,
    hscroll: usize,
    width: usize,
    tab_width: usize,
    selection: Option<(usize, usize)>,
) -> usize {
    let limit = hscroll + width;
    let mut cells: Vec<(char, bool)> = Vec::with_capacity(width);
    let mut col = 0usize;
    let mut rendered = 0usize;
    let mut truncated = false;

    for (idx, ch) in text.chars().enumerate() {
        let in_sel = selection.is_some_and(|(f, t)| (f..t).contains(&(idx + 1)));
        let (glyph, span) = if ch == '\t' {
            (' ', tab_width - (col % tab_width))
        } else if ch.is_control() {
            (SUBSTITUTE, 1)
        } else {
            (ch, 1)
        };
        if col + span > limit {
            truncated = true;
            break;
        }
        for _ in 0..span {
            if col >= hscroll {
                cells.push((glyph, in_sel));
            }
            col += 1;
        }
        rendered = idx + 1;
    }

    if truncated {
        // The marker displaces whatever occupied the last column; a
        // character whose final cell lands there no longer counts as
        // rendered.
        if cells.len() == width && rendered > 0 {
            rendered -= 1;
        }
        while cells.len() < width.saturating_sub(1) {
            cells.push((' ', false));
        }
        cells.truncate(width.saturating_sub(1));
        cells.push((OVERFLOW, false));
    }

    let mut run = String::new();
    let mut reverse = false;
    for (glyph, sel) in cells {
        if sel != reverse {
            if !run.is_empty() {
                sink.print(&run);
                run.clear();
            }
            sink.set_reverse(sel);
            reverse = sel;
        }
        run.push(glyph);
    }
    if !run.is_empty() {
        sink.print(&run);
    }
    if reverse {
        sink.set_reverse(false);
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    /// Capturing sink for assertions on emitted operations.
    #[derive(Default)]
    struct TestSink {
        ops: Vec<Op>,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Op {
        MoveTo(u16, u16),
        ClearLine,
        SetReverse(bool),
        Print(String),
        Flush,
    }

    impl ScreenSink for TestSink {
        fn move_to(&mut self, row: u16, col: u16) {
            self.ops.push(Op::MoveTo(row, col));
        }
        fn clear_line(&mut self) {
            self.ops.push(Op::ClearLine);
        }
        fn set_reverse(&mut self, on: bool) {
            self.ops.push(Op::SetReverse(on));
        }
        fn print(&mut self, text: &str) {
            self.ops.push(Op::Print(text.to_owned()));
        }
        fn flush(&mut self) -> Result<()> {
            self.ops.push(Op::Flush);
            Ok(())
        }
    }

    impl TestSink {
        fn clears(&self) -> usize {
            self.ops.iter().filter(|o| **o == Op::ClearLine).count()
        }
        fn printed(&self) -> String {
            self.ops
                .iter()
                .filter_map(|o| match o {
                    Op::Print(s) => Some(s.as_str()),
                    _ => None,
                })
                .collect()
        }
        fn reset(&mut self) {
            self.ops.clear();
        }
    }

    fn line_out(text: &str, hscroll: usize, width: usize) -> (String, usize) {
        let mut sink = TestSink::default();
        let n = render_line(&mut sink, text, hscroll, width, 8, None);
        (sink.printed(), n)
    }

    #[test]
    fn rendered_col_expands_tabs_to_stops() {
        assert_eq!(rendered_col("abc", 1, 8), 0);
        assert_eq!(rendered_col("abc", 4, 8), 3);
        assert_eq!(rendered_col("\tx", 2, 8), 8);
        assert_eq!(rendered_col("a\tx", 3, 8), 8, "tab stops are absolute");
        assert_eq!(rendered_col("ab\tcd\t", 7, 4), 8);
    }

    #[test]
    fn plain_line_renders_verbatim() {
        let (out, n) = line_out("hello", 0, 80);
        assert_eq!(out, "hello");
        assert_eq!(n, 5, "all characters rendered");
    }

    #[test]
    fn tab_expands_and_control_substitutes() {
        let (out, _) = line_out("a\tb", 0, 80);
        assert_eq!(out, "a       b");
        let (out, _) = line_out("x\u{1}y\u{7f}", 0, 80);
        assert_eq!(out, "x?y?");
    }

    #[test]
    fn overflow_marker_in_last_column_with_resume_index() {
        let (out, n) = line_out("abcdefgh", 0, 5);
        assert_eq!(out, "abcd$");
        assert_eq!(n, 4, "index of first unrendered character");
    }

    #[test]
    fn exact_fit_has_no_marker() {
        let (out, n) = line_out("abcde", 0, 5);
        assert_eq!(out, "abcde");
        assert_eq!(n, 5);
    }

    #[test]
    fn marker_displacing_a_tab_cell_uncounts_the_tab() {
        // The tab fills up to the last column, so the marker overwrites its
        // final space and the tab no longer counts as rendered.
        let (out, n) = line_out("a\tbc", 0, 8);
        assert_eq!(out, "a      $");
        assert_eq!(n, 1);
    }

    #[test]
    fn tab_that_cannot_fit_truncates_before_it() {
        let (out, n) = line_out("ab\tz", 0, 6);
        assert_eq!(out, "ab   $");
        assert_eq!(n, 2, "tab itself did not render");
    }

    #[test]
    fn hscroll_slices_the_window() {
        let (out, n) = line_out("0123456789", 4, 3);
        assert_eq!(out, "45$");
        assert_eq!(n, 6, "'6' was displaced by the marker");
        let (out, n) = line_out("0123456", 4, 10);
        assert_eq!(out, "456");
        assert_eq!(n, 7);
    }

    #[test]
    fn hscroll_past_line_end_renders_nothing() {
        let (out, n) = line_out("ab", 40, 10);
        assert_eq!(out, "");
        assert_eq!(n, 2);
    }

    #[test]
    fn selection_toggles_reverse_video() {
        let mut sink = TestSink::default();
        render_line(&mut sink, "abcdef", 0, 80, 8, Some((2, 5)));
        assert_eq!(
            sink.ops,
            vec![
                Op::Print("a".into()),
                Op::SetReverse(true),
                Op::Print("bcd".into()),
                Op::SetReverse(false),
                Op::Print("ef".into()),
            ]
        );
    }

    #[test]
    fn recenter_on_crossing_and_dirty_exactly_once() {
        let text = (1..=100).map(|i| format!("line {i}\n")).collect::<String>();
        let mut buf = TextBuffer::from_text("t", &text);
        let mut vp = Viewport::new(Rect::new(0, 0, 10, 80));
        let mut sink = TestSink::default();
        vp.refresh(&buf, "", &mut sink).unwrap();
        assert_eq!(vp.top_line(), 1);

        // Move within the box: cursor-only refresh, just the status clear.
        sink.reset();
        buf.set_cursor(Some(5), None);
        vp.refresh(&buf, "", &mut sink).unwrap();
        assert_eq!(sink.clears(), 1, "no line repaint inside the box");

        // Cross the bottom edge: recenter and repaint once.
        sink.reset();
        buf.set_cursor(Some(15), None);
        vp.refresh(&buf, "", &mut sink).unwrap();
        assert_eq!(vp.top_line(), 10, "max(1, 15 - 10/2)");
        assert_eq!(sink.clears(), 11, "10 rows + status");

        // Same line again: clean path.
        sink.reset();
        vp.refresh(&buf, "", &mut sink).unwrap();
        assert_eq!(sink.clears(), 1);
    }

    #[test]
    fn recenter_clamps_to_top() {
        let text = (1..=50).map(|i| format!("l{i}\n")).collect::<String>();
        let mut buf = TextBuffer::from_text("t", &text);
        let mut vp = Viewport::new(Rect::new(0, 0, 20, 80));
        let mut sink = TestSink::default();
        buf.set_cursor(Some(30), None);
        vp.refresh(&buf, "", &mut sink).unwrap();
        assert_eq!(vp.top_line(), 20);
        buf.set_cursor(Some(1), None);
        vp.refresh(&buf, "", &mut sink).unwrap();
        assert_eq!(vp.top_line(), 1, "never scrolls above line 1");
    }

    #[test]
    fn horizontal_scroll_moves_in_strides() {
        let long: String = "x".repeat(200);
        let mut buf = TextBuffer::from_text("t", &format!("{long}\n"));
        let mut vp = Viewport::new(Rect::new(0, 0, 5, 60));
        let mut sink = TestSink::default();
        buf.set_cursor(Some(1), Some(75));
        vp.refresh(&buf, "", &mut sink).unwrap();
        assert_eq!(vp.hscroll(), HSCROLL_STRIDE);
        // A small move inside the shifted window does not rescroll.
        buf.set_cursor(Some(1), Some(80));
        sink.reset();
        vp.refresh(&buf, "", &mut sink).unwrap();
        assert_eq!(vp.hscroll(), HSCROLL_STRIDE);
        assert_eq!(sink.clears(), 1);
        // Back to the start snaps the window home.
        buf.set_cursor(Some(1), Some(1));
        vp.refresh(&buf, "", &mut sink).unwrap();
        assert_eq!(vp.hscroll(), 0);
    }

    #[test]
    fn rows_past_end_show_end_of_text_marker() {
        let buf = TextBuffer::from_text("t", "only\n");
        let mut vp = Viewport::new(Rect::new(0, 0, 4, 20));
        let mut sink = TestSink::default();
        vp.refresh(&buf, "", &mut sink).unwrap();
        let tildes = sink
            .ops
            .iter()
            .filter(|o| **o == Op::Print("~".into()))
            .count();
        assert_eq!(tildes, 3);
    }

    #[test]
    fn active_selection_forces_full_repaint() {
        let mut buf = TextBuffer::from_text("t", "aaa\nbbb\nccc\n");
        let mut vp = Viewport::new(Rect::new(0, 0, 5, 20));
        let mut sink = TestSink::default();
        vp.refresh(&buf, "", &mut sink).unwrap();
        buf.set_mark();
        buf.set_cursor(Some(2), Some(2));
        sink.reset();
        vp.refresh(&buf, "", &mut sink).unwrap();
        assert_eq!(sink.clears(), 6, "all rows repaint while marked");
        sink.reset();
        vp.refresh(&buf, "", &mut sink).unwrap();
        assert_eq!(sink.clears(), 6, "every frame, not just the first");
    }

    #[test]
    fn selection_spans_cover_middle_lines_fully() {
        assert_eq!(
            selected_cols(2, "abcd", Cursor::new(1, 3), Cursor::new(3, 2)),
            Some((1, 5))
        );
        assert_eq!(
            selected_cols(1, "abcd", Cursor::new(1, 3), Cursor::new(3, 2)),
            Some((3, 5))
        );
        assert_eq!(
            selected_cols(3, "abcd", Cursor::new(1, 3), Cursor::new(3, 2)),
            Some((1, 2))
        );
        assert_eq!(selected_cols(4, "abcd", Cursor::new(1, 3), Cursor::new(3, 2)), None);
        // Both ends on one line.
        assert_eq!(
            selected_cols(1, "abcd", Cursor::new(1, 2), Cursor::new(1, 4)),
            Some((2, 4))
        );
    }

    #[test]
    fn rebind_dirties_the_view() {
        let buf = TextBuffer::from_text("t", "x\n");
        let mut vp = Viewport::new(Rect::new(0, 0, 3, 20));
        let mut sink = TestSink::default();
        vp.refresh(&buf, "", &mut sink).unwrap();
        sink.reset();
        vp.rebind(Rect::new(0, 0, 4, 30));
        vp.refresh(&buf, "", &mut sink).unwrap();
        assert_eq!(sink.clears(), 5, "resize repaints everything");
    }
}
