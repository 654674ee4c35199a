use num_enum::TryFromPrimitive;

use crate::{
    ChunkError, HeaderError,
    file::Timing,
    reader::{ReadResult, Reader, inv_data},
};

/// The 4-byte marker that opens the header chunk.
pub const HEADER_MARKER: [u8; 4] = *b"MThd";

#[doc = r#"
The decoded header chunk.

The first chunk of every file: the format, the number of track chunks that
follow, and the division that gives meaning to every delta-time. Fixed
layout, read once at file open, immutable afterwards.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawHeaderChunk {
    format: FormatType,
    num_tracks: u16,
    timing: Timing,
}

impl RawHeaderChunk {
    /// Decode a header chunk from a reader positioned at its marker.
    pub fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        let marker: [u8; 4] = reader.read_exact_size()?;
        if marker != HEADER_MARKER {
            return Err(inv_data(
                reader,
                ChunkError::InvalidMarker {
                    expected: HEADER_MARKER,
                    found: marker,
                },
            ));
        }

        let length = u32::from_be_bytes(reader.read_exact_size()?);
        if length < 6 {
            return Err(inv_data(reader, HeaderError::InvalidLength(length)));
        }

        let format = u16::from_be_bytes(reader.read_exact_size()?);
        let format = FormatType::try_from(format)
            .map_err(|_| inv_data(reader, HeaderError::InvalidFormat(format)))?;

        let num_tracks = u16::from_be_bytes(reader.read_exact_size()?);
        let timing = Timing::read(reader)?;

        // some writers pad the header past its 6 defined bytes
        if length > 6 {
            reader.read_bytes(length as usize - 6)?;
        }

        Ok(Self {
            format,
            num_tracks,
            timing,
        })
    }

    /// Returns the format type for the file.
    pub const fn format_type(&self) -> FormatType {
        self.format
    }

    /// The number of track chunks the file declares.
    pub const fn num_tracks(&self) -> u16 {
        self.num_tracks
    }

    /// The division every track's delta-times are interpreted through.
    pub const fn timing(&self) -> Timing {
        self.timing
    }
}

/// The three defined file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum FormatType {
    /// Format 0: one track carrying all channels
    SingleMultiChannel = 0,
    /// Format 1: simultaneous tracks of one song
    Simultaneous = 1,
    /// Format 2: independent single-track patterns
    SequentiallyIndependent = 2,
}

#[test]
fn read_header() {
    use pretty_assertions::assert_eq;
    let bytes = [
        0x4D, 0x54, 0x68, 0x64, // MThd
        0x00, 0x00, 0x00, 0x06, // length 6
        0x00, 0x01, // format 1
        0x00, 0x02, // two tracks
        0x00, 0x60, // 96 tpqn
    ];
    let mut reader = Reader::from_byte_slice(&bytes);
    let header = RawHeaderChunk::read(&mut reader).unwrap();
    assert_eq!(header.format_type(), FormatType::Simultaneous);
    assert_eq!(header.num_tracks(), 2);
    assert_eq!(header.timing(), Timing::TicksPerQuarterNote(96));
    assert_eq!(reader.buffer_position(), bytes.len());
}

#[test]
fn read_header_skips_padding() {
    use pretty_assertions::assert_eq;
    let bytes = [
        0x4D, 0x54, 0x68, 0x64, //
        0x00, 0x00, 0x00, 0x08, // length 8: two surplus bytes
        0x00, 0x00, //
        0x00, 0x01, //
        0x00, 0x60, //
        0xAA, 0xBB, // padding
    ];
    let mut reader = Reader::from_byte_slice(&bytes);
    let header = RawHeaderChunk::read(&mut reader).unwrap();
    assert_eq!(header.format_type(), FormatType::SingleMultiChannel);
    assert_eq!(reader.buffer_position(), bytes.len());
}

#[test]
fn read_header_wrong_marker() {
    let bytes = [
        0x4D, 0x54, 0x72, 0x6B, // MTrk where MThd belongs
        0x00, 0x00, 0x00, 0x06, //
    ];
    let mut reader = Reader::from_byte_slice(&bytes);
    let err = RawHeaderChunk::read(&mut reader).unwrap_err();
    assert!(!err.is_unexpected_eof());
}

#[test]
fn read_header_bad_format() {
    let bytes = [
        0x4D, 0x54, 0x68, 0x64, //
        0x00, 0x00, 0x00, 0x06, //
        0x00, 0x05, // format 5 does not exist
        0x00, 0x01, //
        0x00, 0x60, //
    ];
    let mut reader = Reader::from_byte_slice(&bytes);
    assert!(RawHeaderChunk::read(&mut reader).is_err());
}
