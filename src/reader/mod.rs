#![doc = r#"
A cursor over the raw bytes of a Standard MIDI File.

[`Reader`] owns no data: it walks a borrowed byte slice and keeps the running
byte position, which doubles as the per-chunk byte counter used to decide when
a track's declared length has been consumed. All multi-byte *header* integers
(chunk lengths, the header fields) are big-endian and are converted at the
call site with `from_be_bytes`; event *payload* bytes are opaque and always
come back in stream order, untouched.
"#]

mod error;
pub use error::*;

mod vlv;

/// A forward-only cursor over a byte slice with one byte of lookbehind.
///
/// One reader can decode a whole file, or one can be made per track chunk
/// (the chunk's declared length delimits its byte range) to decode tracks
/// independently.
#[derive(Debug, Clone)]
pub struct Reader<'slc> {
    bytes: &'slc [u8],
    position: usize,
}

impl<'slc> Reader<'slc> {
    /// Create a reader positioned at the start of the given bytes.
    pub const fn from_byte_slice(bytes: &'slc [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// The number of bytes consumed so far.
    pub const fn buffer_position(&self) -> usize {
        self.position
    }

    /// Bytes not yet consumed.
    pub const fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    /// Read a single byte.
    pub fn read_byte(&mut self) -> ReadResult<u8> {
        let Some(byte) = self.bytes.get(self.position) else {
            return Err(ReaderError::eof(self.position));
        };
        self.position += 1;
        Ok(*byte)
    }

    /// Read exactly `n` bytes, verbatim, in stream order.
    pub fn read_bytes(&mut self, n: usize) -> ReadResult<&'slc [u8]> {
        let end = self
            .position
            .checked_add(n)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(ReaderError::eof(self.position))?;
        let slice = &self.bytes[self.position..end];
        self.position = end;
        Ok(slice)
    }

    /// Read a fixed-size array, for the big-endian header fields.
    pub fn read_exact_size<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let slice = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    /// Un-consume the last `n` bytes.
    ///
    /// Running status needs this: a data byte in status position was not a
    /// status byte after all and must be re-read as payload.
    pub(crate) fn step_back(&mut self, n: usize) {
        debug_assert!(n <= self.position);
        self.position = self.position.saturating_sub(n);
    }
}

#[test]
fn read_past_end_is_eof() {
    let mut reader = Reader::from_byte_slice(&[0x4D, 0x54]);
    assert_eq!(reader.read_byte().unwrap(), 0x4D);
    let err = reader.read_bytes(2).unwrap_err();
    assert!(err.is_unexpected_eof());
    assert_eq!(err.position(), 1);
}

#[test]
fn step_back_rereads_the_same_byte() {
    let mut reader = Reader::from_byte_slice(&[0x90, 0x40]);
    assert_eq!(reader.read_byte().unwrap(), 0x90);
    reader.step_back(1);
    assert_eq!(reader.buffer_position(), 0);
    assert_eq!(reader.read_byte().unwrap(), 0x90);
}
