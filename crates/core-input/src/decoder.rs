//! Escape-sequence state machine over a [`ByteSource`].
//!
//! Decoding contract:
//! * Never blocks except on the source's own blocking read.
//! * Never discards a byte: every consumed byte surfaces either inside a
//!   recognized key or as an individual raw re-emission.
//! * Stateless between complete key emissions; no event depends on input
//!   older than the escape sequence currently being resolved.
//!
//! The natural expression of this machine is a coroutine suspended at the
//! byte-read boundary; since that is the only suspension point, an explicit
//! state struct with a blocking `next_key` method is equivalent.

use std::collections::VecDeque;
use std::io;

use core_events::Key;
use tracing::trace;

const ESC: u8 = 0x1b;

/// Decodes a raw byte stream into logical keys.
pub struct KeyDecoder<S> {
    src: S,
    /// Bytes from an abandoned escape sequence, queued for direct raw
    /// emission. These must bypass escape interpretation entirely or a
    /// re-emitted ESC would restart the very parse that just failed.
    raw_pending: VecDeque<u8>,
    /// A byte to feed back through the full state machine. Used only for the
    /// double-ESC case, where the second ESC legitimately begins a new
    /// sequence.
    reentry: Option<u8>,
}

impl<S: crate::ByteSource> KeyDecoder<S> {
    pub fn new(src: S) -> Self {
        Self {
            src,
            raw_pending: VecDeque::new(),
            reentry: None,
        }
    }

    /// Decode the next logical key, blocking on the source as needed.
    /// `Ok(None)` means the source is exhausted and nothing is pending.
    pub fn next_key(&mut self) -> io::Result<Option<Key>> {
        if let Some(b) = self.raw_pending.pop_front() {
            return Ok(Some(Key::Char(b as char)));
        }
        let lead = match self.reentry.take() {
            Some(b) => b,
            None => match self.src.read_byte()? {
                Some(b) => b,
                None => return Ok(None),
            },
        };
        if lead != ESC {
            return self.decode_utf8(lead);
        }
        self.decode_escape()
    }

    /// Iterator adapter yielding keys until the source ends.
    pub fn keys(&mut self) -> Keys<'_, S> {
        Keys { decoder: self }
    }

    /// Resolve the stream after an initial ESC byte has been consumed.
    fn decode_escape(&mut self) -> io::Result<Option<Key>> {
        let c1 = match self.src.read_byte()? {
            Some(b) => b,
            // Lone ESC at end of stream is still a keystroke.
            None => return Ok(Some(Key::ESC)),
        };
        if c1 == ESC {
            // Some terminals prefix sequences with a second ESC. Emit the
            // first as a key and re-enter the scanner on the new one.
            self.reentry = Some(c1);
            return Ok(Some(Key::ESC));
        }
        if c1 != b'[' && c1 != b'O' {
            // Not a recognized introducer: ESC surfaces as its own key and
            // c1 as a raw byte, so nothing is lost.
            self.raw_pending.push_back(c1);
            return Ok(Some(Key::ESC));
        }
        let c2 = match self.src.read_byte()? {
            Some(b) => b,
            None => return self.abandon(&[c1]),
        };
        if let Some(key) = lookup_pair(c1, c2) {
            return Ok(Some(key));
        }
        if c1 == b'[' && c2 == b'[' {
            // Linux console encodes F1–F5 as ESC [ [ A..E.
            return match self.src.read_byte()? {
                Some(b @ b'A'..=b'E') => Ok(Some(Key::F(b - b'A' + 1))),
                Some(other) => self.abandon(&[c1, c2, other]),
                None => self.abandon(&[c1, c2]),
            };
        }
        if c1 == b'[' && (c2.is_ascii_digit() || c2 == b';') {
            return self.decode_csi_params(c2);
        }
        self.abandon(&[c1, c2])
    }

    /// Accumulate CSI parameter bytes (`[0-9;]`) until a terminator arrives.
    fn decode_csi_params(&mut self, first: u8) -> io::Result<Option<Key>> {
        let mut params = vec![first];
        loop {
            match self.src.read_byte()? {
                Some(b) if b.is_ascii_digit() || b == b';' => params.push(b),
                Some(b'~') => {
                    return Ok(Some(lookup_tilde(&params).unwrap_or_else(|| {
                        trace!(
                            target: "input.key",
                            params_len = params.len(),
                            "csi_unrecognized"
                        );
                        Key::Unknown
                    })));
                }
                Some(other) => {
                    // Unknown terminator: the whole sequence is abandoned and
                    // every consumed byte re-emitted individually.
                    let mut consumed = vec![b'['];
                    consumed.extend_from_slice(&params);
                    consumed.push(other);
                    return self.abandon(&consumed);
                }
                None => {
                    let mut consumed = vec![b'['];
                    consumed.extend_from_slice(&params);
                    return self.abandon(&consumed);
                }
            }
        }
    }

    /// Re-emit the initial ESC plus every other consumed byte as raw keys.
    fn abandon(&mut self, consumed: &[u8]) -> io::Result<Option<Key>> {
        trace!(target: "input.key", len = consumed.len() + 1, "escape_abandoned");
        self.raw_pending.push_back(ESC);
        self.raw_pending.extend(consumed.iter().copied());
        // Queue is non-empty by construction.
        Ok(self.raw_pending.pop_front().map(|b| Key::Char(b as char)))
    }

    /// Decode a non-ESC lead byte, consuming UTF-8 continuation bytes as the
    /// lead requires. Invalid sequences fall back to byte-by-byte raw keys.
    fn decode_utf8(&mut self, lead: u8) -> io::Result<Option<Key>> {
        if lead < 0x80 {
            return Ok(Some(Key::Char(lead as char)));
        }
        let continuations = match lead {
            0xC0..=0xDF => 1,
            0xE0..=0xEF => 2,
            0xF0..=0xF7 => 3,
            // Stray continuation or invalid lead: surface it raw.
            _ => return Ok(Some(Key::Char(lead as char))),
        };
        let mut buf = vec![lead];
        for _ in 0..continuations {
            match self.src.read_byte()? {
                Some(b) => buf.push(b),
                None => break,
            }
        }
        if let Ok(s) = std::str::from_utf8(&buf) {
            if let Some(c) = s.chars().next() {
                return Ok(Some(Key::Char(c)));
            }
        }
        trace!(target: "input.key", len = buf.len(), "utf8_invalid_raw_fallback");
        self.raw_pending.extend(buf[1..].iter().copied());
        Ok(Some(Key::Char(buf[0] as char)))
    }
}

/// Blocking iterator over decoded keys. I/O errors terminate iteration after
/// being yielded once.
pub struct Keys<'a, S> {
    decoder: &'a mut KeyDecoder<S>,
}

impl<S: crate::ByteSource> Iterator for Keys<'_, S> {
    type Item = io::Result<Key>;

    fn next(&mut self) -> Option<Self::Item> {
        self.decoder.next_key().transpose()
    }
}

/// Complete two-byte sequences (plus SS3 function keys) that need no
/// parameter accumulation.
fn lookup_pair(c1: u8, c2: u8) -> Option<Key> {
    match (c1, c2) {
        (b'[' | b'O', b'A') => Some(Key::Up),
        (b'[' | b'O', b'B') => Some(Key::Down),
        (b'[' | b'O', b'C') => Some(Key::Right),
        (b'[' | b'O', b'D') => Some(Key::Left),
        (b'[' | b'O', b'H') => Some(Key::Home),
        (b'[' | b'O', b'F') => Some(Key::End),
        (b'O', b'P') => Some(Key::F(1)),
        (b'O', b'Q') => Some(Key::F(2)),
        (b'O', b'R') => Some(Key::F(3)),
        (b'O', b'S') => Some(Key::F(4)),
        _ => None,
    }
}

/// `ESC [ <params> ~` sequences. Parameters with modifiers (`;`) are
/// well-formed but unmapped, so callers receive `Key::Unknown` for them.
fn lookup_tilde(params: &[u8]) -> Option<Key> {
    match params {
        b"1" | b"7" => Some(Key::Home),
        b"2" => Some(Key::Insert),
        b"3" => Some(Key::Delete),
        b"4" | b"8" => Some(Key::End),
        b"5" => Some(Key::PageUp),
        b"6" => Some(Key::PageDown),
        b"11" => Some(Key::F(1)),
        b"12" => Some(Key::F(2)),
        b"13" => Some(Key::F(3)),
        b"14" => Some(Key::F(4)),
        b"15" => Some(Key::F(5)),
        b"17" => Some(Key::F(6)),
        b"18" => Some(Key::F(7)),
        b"19" => Some(Key::F(8)),
        b"20" => Some(Key::F(9)),
        b"21" => Some(Key::F(10)),
        b"23" => Some(Key::F(11)),
        b"24" => Some(Key::F(12)),
        _ => None,
    }
}
