//! The binding table: a flat slice keyed by [`Key::code`] values, scanned
//! once per keystroke. Printable characters fall through to self-insert, so
//! only control bytes and special keys appear here.

use core_events::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    LineStart,
    LineEnd,
    PageUp,
    PageDown,
    DeleteForward,
    Backspace,
    InsertNewline,
    InsertChar(char),
    SetMark,
    ClearMark,
    Cut,
    Paste,
    Undo,
    Redo,
    Save,
    NextBuffer,
    Quit,
    /// Bound to nothing; reported, never applied.
    Unbound,
}

const CTRL_AT: u32 = 0x00;
const CTRL_B: u32 = 0x02;
const CTRL_Q: u32 = 0x11;
const CTRL_S: u32 = 0x13;
const CTRL_V: u32 = 0x16;
const CTRL_X: u32 = 0x18;
const CTRL_Y: u32 = 0x19;
const CTRL_Z: u32 = 0x1A;
const ESC: u32 = 0x1B;
const ENTER: u32 = 0x0D;
const BACKSPACE: u32 = 0x7F;
const TAB: u32 = 0x09;

static BINDINGS: &[(u32, Action)] = &[
    (Key::Up.code(), Action::MoveUp),
    (Key::Down.code(), Action::MoveDown),
    (Key::Left.code(), Action::MoveLeft),
    (Key::Right.code(), Action::MoveRight),
    (Key::Home.code(), Action::LineStart),
    (Key::End.code(), Action::LineEnd),
    (Key::PageUp.code(), Action::PageUp),
    (Key::PageDown.code(), Action::PageDown),
    (Key::Delete.code(), Action::DeleteForward),
    (BACKSPACE, Action::Backspace),
    (ENTER, Action::InsertNewline),
    (TAB, Action::InsertChar('\t')),
    (CTRL_AT, Action::SetMark),
    (ESC, Action::ClearMark),
    (CTRL_X, Action::Cut),
    (CTRL_V, Action::Paste),
    (CTRL_Z, Action::Undo),
    (CTRL_Y, Action::Redo),
    (CTRL_S, Action::Save),
    (CTRL_B, Action::NextBuffer),
    (CTRL_Q, Action::Quit),
];

/// Resolve a decoded key to its editing action.
pub fn action_for(key: Key) -> Action {
    let code = key.code();
    for (bound, action) in BINDINGS {
        if *bound == code {
            return *action;
        }
    }
    match key {
        Key::Char(c) if !c.is_control() => Action::InsertChar(c),
        _ => Action::Unbound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn special_keys_resolve() {
        assert_eq!(action_for(Key::Up), Action::MoveUp);
        assert_eq!(action_for(Key::PageDown), Action::PageDown);
        assert_eq!(action_for(Key::Delete), Action::DeleteForward);
        assert_eq!(action_for(Key::Home), Action::LineStart);
    }

    #[test]
    fn control_bytes_resolve() {
        assert_eq!(action_for(Key::Char('\u{11}')), Action::Quit);
        assert_eq!(action_for(Key::BACKSPACE), Action::Backspace);
        assert_eq!(action_for(Key::ENTER), Action::InsertNewline);
        assert_eq!(action_for(Key::Char('\0')), Action::SetMark);
    }

    #[test]
    fn printable_chars_self_insert() {
        assert_eq!(action_for(Key::Char('a')), Action::InsertChar('a'));
        assert_eq!(action_for(Key::Char('é')), Action::InsertChar('é'));
        assert_eq!(action_for(Key::TAB), Action::InsertChar('\t'));
    }

    #[test]
    fn unmapped_keys_are_unbound() {
        assert_eq!(action_for(Key::F(7)), Action::Unbound);
        assert_eq!(action_for(Key::Unknown), Action::Unbound);
        assert_eq!(action_for(Key::Insert), Action::Unbound);
    }
}
