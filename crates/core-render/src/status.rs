//! Status line composition.
//!
//! Two-stage pipeline: `compose_status` produces ordered segments,
//! `format_status` renders them into the display string. Keeping the stages
//! apart lets callers inject or reorder segments (buffer counters,
//! transient messages) without string surgery.

use std::borrow::Cow;

/// What the status line needs to know about the current buffer.
pub struct StatusContext<'a> {
    /// Display name, usually the base file name.
    pub name: &'a str,
    /// Unsaved-changes marker.
    pub dirty: bool,
    /// 1-based cursor line.
    pub line: usize,
    /// 1-based cursor column (codepoints).
    pub col: usize,
    pub line_count: usize,
    /// Transient one-shot message (operation result, error text). Empty when
    /// there is nothing to report.
    pub message: &'a str,
}

/// Discrete, order-sensitive status segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSegment<'a> {
    /// Buffer name with the dirty marker folded in.
    Name(Cow<'a, str>),
    Position {
        line: usize,
        col: usize,
        line_count: usize,
    },
    Message(&'a str),
}

pub fn compose_status<'a>(ctx: &StatusContext<'a>) -> Vec<StatusSegment<'a>> {
    let name: Cow<'a, str> = if ctx.dirty {
        format!("{}*", ctx.name).into()
    } else {
        ctx.name.into()
    };
    let mut segments = vec![
        StatusSegment::Name(name),
        StatusSegment::Position {
            line: ctx.line,
            col: ctx.col,
            line_count: ctx.line_count,
        },
    ];
    if !ctx.message.is_empty() {
        segments.push(StatusSegment::Message(ctx.message));
    }
    segments
}

pub fn format_status(segments: &[StatusSegment<'_>]) -> String {
    let mut out = String::new();
    for seg in segments {
        match seg {
            StatusSegment::Name(name) => {
                out.push_str(name);
            }
            StatusSegment::Position {
                line,
                col,
                line_count,
            } => {
                out.push_str(&format!("  Ln {line}/{line_count}, Col {col}"));
            }
            StatusSegment::Message(msg) => {
                out.push_str("  | ");
                out.push_str(msg);
            }
        }
    }
    out
}
