#![doc = r#"
MIDI's variable-length value encoding.

Seven bits of payload per byte, most significant group first; a set high bit
means another byte follows. Delta-times, sysex lengths and the text-class and
sequencer-specific meta lengths are all stored this way.
"#]

use super::{ReadResult, Reader, inv_data};
use crate::TrackError;

impl Reader<'_> {
    /// Read one variable-length value.
    ///
    /// The format caps well-formed values at 4 bytes (28 significant bits),
    /// but longer sequences occur in the wild; they are accepted as long as
    /// the decoded value fits in a `u32`. Anything larger fails with
    /// [`TrackError::VlvOutOfRange`] instead of wrapping.
    pub fn read_vlv(&mut self) -> ReadResult<u32> {
        let mut value: u64 = 0;
        loop {
            let byte = self.read_byte()?;
            value = (value << 7) | u64::from(byte & 0x7F);
            if byte & 0x80 == 0 {
                break;
            }
            if value > u64::from(u32::MAX) {
                return Err(inv_data(self, TrackError::VlvOutOfRange(value)));
            }
        }
        u32::try_from(value).map_err(|_| inv_data(self, TrackError::VlvOutOfRange(value)))
    }
}

#[cfg(test)]
fn encode_vlv(mut value: u32) -> Vec<u8> {
    let mut out = vec![(value & 0x7F) as u8];
    value >>= 7;
    while value > 0 {
        out.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
    out.reverse();
    out
}

#[test]
fn vlv_known_values() {
    use pretty_assertions::assert_eq;
    // the worked examples from the SMF specification
    let cases: [(&[u8], u32); 8] = [
        (&[0x00], 0x00),
        (&[0x40], 0x40),
        (&[0x7F], 0x7F),
        (&[0x81, 0x00], 0x80),
        (&[0xC0, 0x00], 0x2000),
        (&[0xFF, 0x7F], 0x3FFF),
        (&[0x81, 0x80, 0x00], 0x4000),
        (&[0xFF, 0xFF, 0xFF, 0x7F], 0x0FFF_FFFF),
    ];
    for (bytes, expected) in cases {
        let mut reader = Reader::from_byte_slice(bytes);
        assert_eq!(reader.read_vlv().unwrap(), expected);
        assert_eq!(reader.buffer_position(), bytes.len());
    }
}

#[test]
fn vlv_round_trip() {
    use pretty_assertions::assert_eq;
    let values = [
        0,
        1,
        0x7F,
        0x80,
        0x3FFF,
        0x4000,
        0x001F_FFFF,
        0x0FFF_FFFF,
        0x1000_0000,
        u32::MAX,
    ];
    for value in values {
        let encoded = encode_vlv(value);
        // the final byte never carries a continuation bit
        assert_eq!(encoded.last().unwrap() & 0x80, 0);
        let mut reader = Reader::from_byte_slice(&encoded);
        assert_eq!(reader.read_vlv().unwrap(), value);
        assert_eq!(reader.buffer_position(), encoded.len());
    }
}

#[test]
fn vlv_accepts_redundant_leading_zeroes() {
    // five bytes, but the value still fits: 0x80 0x80 0x80 0x81 0x00
    let mut reader = Reader::from_byte_slice(&[0x80, 0x80, 0x80, 0x81, 0x00]);
    assert_eq!(reader.read_vlv().unwrap(), 0x80);
}

#[test]
fn vlv_rejects_values_past_u32() {
    let mut reader = Reader::from_byte_slice(&[0xFF, 0xFF, 0xFF, 0xFF, 0x7F]);
    let err = reader.read_vlv().unwrap_err();
    assert!(!err.is_unexpected_eof());
}

#[test]
fn vlv_truncated_is_eof() {
    let mut reader = Reader::from_byte_slice(&[0x81, 0x80]);
    let err = reader.read_vlv().unwrap_err();
    assert!(err.is_unexpected_eof());
}
