//! Document load and save. Strictly UTF-8: a file that does not decode is
//! refused outright rather than lossily converted, since the buffer
//! invariants (codepoint columns, valid line strings) depend on it.

use core_text::TextBuffer;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("read failed: {0}")]
    Io(#[from] io::Error),
    #[error("file is not valid UTF-8")]
    InvalidUtf8,
}

/// Read `path` into a fresh buffer. A missing file is not an error: editing
/// a new file starts from an empty buffer that gains the path on first
/// save. An empty file is one empty line.
pub fn load_document(path: &Path) -> Result<TextBuffer, LoadError> {
    let name = display_name(path);
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            info!(target: "io", path = %path.display(), "new file");
            return Ok(TextBuffer::new(name));
        }
        Err(err) => {
            error!(target: "io", path = %path.display(), %err, "file open failed");
            return Err(err.into());
        }
    };
    let text = String::from_utf8(bytes).map_err(|_| {
        error!(target: "io", path = %path.display(), "file is not valid UTF-8");
        LoadError::InvalidUtf8
    })?;
    let mut buf = TextBuffer::from_text(name, &text);
    buf.dirty = false;
    info!(target: "io", path = %path.display(), lines = buf.line_count(), "file loaded");
    Ok(buf)
}

/// Serialize the buffer to `path`, one `\n` after every line including the
/// last. Clears the dirty flag on success and returns the line count.
pub fn save_document(path: &Path, buf: &mut TextBuffer) -> io::Result<usize> {
    std::fs::write(path, buf.text().as_bytes()).map_err(|err| {
        error!(target: "io", path = %path.display(), %err, "file write failed");
        err
    })?;
    buf.dirty = false;
    let lines = buf.line_count();
    info!(target: "io", path = %path.display(), lines, "file saved");
    Ok(lines)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("[No Name]")
        .to_owned()
}
