//! Blocking terminal input: a one-byte-at-a-time source abstraction and the
//! escape-sequence decoder that turns it into logical [`core_events::Key`]
//! events.
//!
//! The decoder assumes the underlying device is already in raw (unbuffered,
//! unechoed) mode; mode management belongs to the terminal layer, never here.

use std::io;

mod decoder;
pub use decoder::{KeyDecoder, Keys};

/// A blocking source of single bytes. `Ok(None)` signals end of stream.
///
/// Reading one byte at a time is deliberate: escape-sequence decoding is
/// strictly sequential and must not over-read past the bytes it consumes.
pub trait ByteSource {
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

/// Any `io::Read` works as a byte source, which covers `io::Stdin`, files,
/// and in-memory slices in tests.
impl<R: io::Read> ByteSource for R {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

/// Byte source over standard input holding the stdin lock for the life of
/// the editor, so no other reader can interleave with the decoder.
pub struct StdinBytes {
    lock: io::StdinLock<'static>,
}

impl StdinBytes {
    pub fn new() -> Self {
        Self {
            lock: io::stdin().lock(),
        }
    }
}

impl Default for StdinBytes {
    fn default() -> Self {
        Self::new()
    }
}

impl io::Read for StdinBytes {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.lock.read(buf)
    }
}
