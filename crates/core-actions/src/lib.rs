//! Key-to-operation dispatch over the text core: the editing commands, the
//! binding table that selects them, buffer-list management, and file IO.
//!
//! Everything here is thin orchestration. The buffer owns document
//! semantics; this crate sequences its primitives (a backspace is a
//! wrapped cursor move followed by a forward delete) and turns their
//! results into status messages.

mod buffers;
mod dispatcher;
pub mod io_ops;
mod keymap;

pub use buffers::{BufferEntry, BufferList};
pub use dispatcher::{Dispatch, Editor};
pub use keymap::{action_for, Action};
