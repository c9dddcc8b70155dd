//! Logical key events shared between the input decoder and the dispatch layer.
//!
//! A [`Key`] is either a Unicode character (control characters 0–31 and the
//! 0x7F delete code included) or one of a fixed catalogue of named special
//! keys decoded from terminal escape sequences. The enum representation makes
//! collision with character input impossible at the type level; the
//! [`Key::code`] projection additionally maps every special key into a
//! reserved integer band above the valid Unicode range so that flat lookup
//! tables can be keyed by a single `u32` without ambiguity.

use std::fmt;

/// First code value outside the Unicode scalar range (`0x10FFFF + 1`).
/// Special keys occupy `SPECIAL_KEY_BASE..`, guaranteeing they can never be
/// produced by character input.
pub const SPECIAL_KEY_BASE: u32 = 0x11_0000;

/// A decoded logical key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A Unicode codepoint. Values 0–31 are control characters (`Char('\r')`
    /// is Enter, `Char('\x1b')` is Escape), 127 is the delete code.
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    /// Function key F1–F12.
    F(u8),
    /// A well-formed escape sequence the decoder does not recognize. Never
    /// silently dropped; surfaced so callers can ignore it deliberately.
    Unknown,
}

impl Key {
    /// The escape key as seen on the wire (a bare 0x1B byte).
    pub const ESC: Key = Key::Char('\u{1b}');
    /// Enter as emitted by a raw-mode terminal (carriage return).
    pub const ENTER: Key = Key::Char('\r');
    /// The backspace byte most terminals send for the Backspace key.
    pub const BACKSPACE: Key = Key::Char('\u{7f}');
    pub const TAB: Key = Key::Char('\t');

    /// Project this key into the unified `u32` code space: characters map to
    /// their codepoint value, special keys to fixed slots above
    /// [`SPECIAL_KEY_BASE`].
    pub const fn code(self) -> u32 {
        match self {
            Key::Char(c) => c as u32,
            Key::Up => SPECIAL_KEY_BASE,
            Key::Down => SPECIAL_KEY_BASE + 1,
            Key::Left => SPECIAL_KEY_BASE + 2,
            Key::Right => SPECIAL_KEY_BASE + 3,
            Key::Home => SPECIAL_KEY_BASE + 4,
            Key::End => SPECIAL_KEY_BASE + 5,
            Key::PageUp => SPECIAL_KEY_BASE + 6,
            Key::PageDown => SPECIAL_KEY_BASE + 7,
            Key::Insert => SPECIAL_KEY_BASE + 8,
            Key::Delete => SPECIAL_KEY_BASE + 9,
            Key::Unknown => SPECIAL_KEY_BASE + 10,
            // F1..F12 occupy a contiguous sub-band starting at +16.
            Key::F(n) => SPECIAL_KEY_BASE + 16 + n.saturating_sub(1) as u32,
        }
    }

    /// Inverse of [`Key::code`]. Returns `None` for values that name neither
    /// a Unicode scalar nor an assigned special-key slot.
    pub fn from_code(code: u32) -> Option<Key> {
        if code < SPECIAL_KEY_BASE {
            return char::from_u32(code).map(Key::Char);
        }
        Some(match code - SPECIAL_KEY_BASE {
            0 => Key::Up,
            1 => Key::Down,
            2 => Key::Left,
            3 => Key::Right,
            4 => Key::Home,
            5 => Key::End,
            6 => Key::PageUp,
            7 => Key::PageDown,
            8 => Key::Insert,
            9 => Key::Delete,
            10 => Key::Unknown,
            n @ 16..=27 => Key::F((n - 15) as u8),
            _ => return None,
        })
    }

    /// True for printable character keys (everything a plain `insert` should
    /// accept verbatim; tab is handled separately by the dispatcher).
    pub fn is_printable_char(self) -> bool {
        match self {
            Key::Char(c) => !c.is_control(),
            _ => false,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) if c.is_control() => write!(f, "<{:#04x}>", *c as u32),
            Key::Char(c) => write!(f, "{c}"),
            Key::F(n) => write!(f, "<F{n}>"),
            other => write!(f, "<{other:?}>"),
        }
    }
}
