#![doc = r#"
Track chunks and their decoder.

A track chunk is the marker `MTrk`, a 4-byte big-endian payload length, and
then that many bytes of events. [`Track::decode`] drives the event decoder in
a loop bounded by the declared length and hands back the completed track.

Structural failures (a bad marker, bytes running out mid-event) abort the
track and surface as a [`ReaderError`](crate::reader::ReaderError).
Content-level anomalies (an unrecognized meta type, a declared length that
does not match the bytes actually consumed) do not: the events are internally
consistent and worth more to the caller than an abort, so they are returned
along with [`TrackDiagnostic`]s describing what was off.
"#]

mod event;
pub use event::*;

mod meta;
pub use meta::*;

use std::borrow::Cow;

use thiserror::Error;

use crate::{
    ChunkError,
    reader::{ReadResult, Reader, inv_data},
};

/// The 4-byte marker that opens every track chunk.
pub const TRACK_MARKER: [u8; 4] = *b"MTrk";

#[doc = r#"
One decoded track: its ordinal position in the file and its events, in
stream order.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track<'a> {
    id: usize,
    pub(crate) name: Option<Cow<'a, str>>,
    events: Vec<TrackEvent<'a>>,
    diagnostics: Vec<TrackDiagnostic>,
}

impl<'a> Track<'a> {
    /// Decode one track chunk from a reader positioned at its marker.
    ///
    /// `id` is the track's ordinal position in the file.
    pub fn decode(reader: &mut Reader<'a>, id: usize) -> ReadResult<Track<'a>> {
        let marker: [u8; 4] = reader.read_exact_size()?;
        if marker != TRACK_MARKER {
            return Err(inv_data(
                reader,
                ChunkError::InvalidMarker {
                    expected: TRACK_MARKER,
                    found: marker,
                },
            ));
        }
        let declared = u32::from_be_bytes(reader.read_exact_size()?);

        let start = reader.buffer_position();
        let mut events = Vec::new();
        let mut diagnostics = Vec::new();
        let mut running_status: Option<u8> = None;

        while reader.buffer_position() - start < declared as usize {
            let event = TrackEvent::read(reader, &mut running_status)?;
            if let Some(meta) = event.meta()
                && let MetaKind::Unknown(type_byte) = meta.kind()
            {
                diagnostics.push(TrackDiagnostic::UnrecognizedMetaType {
                    type_byte,
                    offset: reader.buffer_position(),
                });
            }
            events.push(event);
        }

        let consumed = reader.buffer_position() - start;
        if consumed != declared as usize {
            diagnostics.push(TrackDiagnostic::ChunkLengthMismatch {
                declared,
                consumed: consumed as u32,
            });
        }

        Ok(Track {
            id,
            name: None,
            events,
            diagnostics,
        })
    }

    /// The track's ordinal position in the file.
    pub const fn id(&self) -> usize {
        self.id
    }

    /// The track name, when the file driver has filled it in from a
    /// SequenceName meta event.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The events, in stream order.
    pub fn events(&self) -> &[TrackEvent<'a>] {
        &self.events
    }

    /// Non-fatal anomalies found while decoding.
    ///
    /// Whether to log them or treat them as fatal is the caller's policy.
    pub fn diagnostics(&self) -> &[TrackDiagnostic] {
        &self.diagnostics
    }
}

/// A content-level anomaly that did not stop the decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackDiagnostic {
    /// The bytes consumed by the event loop differ from the chunk's declared
    /// length. Each event was internally consistent; the frame was not.
    #[error("declared chunk length {declared} but consumed {consumed} bytes")]
    ChunkLengthMismatch {
        /// The length the chunk header declared
        declared: u32,
        /// The bytes the event loop actually consumed
        consumed: u32,
    },
    /// A meta event carried a type byte the decoder does not know. The event
    /// was kept, payload and all.
    #[error("unrecognized meta event type {type_byte:#04x} near offset {offset}")]
    UnrecognizedMetaType {
        /// The unrecognized type byte
        type_byte: u8,
        /// Reader position just after the event
        offset: usize,
    },
}

#[cfg(test)]
fn track_chunk(payload: &[u8]) -> Vec<u8> {
    let mut bytes = TRACK_MARKER.to_vec();
    bytes.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    bytes.extend_from_slice(payload);
    bytes
}

#[test]
fn decode_a_small_track() {
    use pretty_assertions::assert_eq;
    let bytes = track_chunk(&[
        0x00, 0xFF, 0x03, 0x05, b'P', b'i', b'a', b'n', b'o', // name
        0x00, 0xC0, 0x05, // program change
        0x00, 0x90, 0x3C, 0x60, // NoteOn C4
        0x60, 0x3C, 0x00, // running status NoteOn, vel 0
        0x00, 0xFF, 0x2F, 0x00, // end of track
    ]);
    let mut reader = Reader::from_byte_slice(&bytes);
    let track = Track::decode(&mut reader, 3).unwrap();

    assert_eq!(track.id(), 3);
    assert_eq!(track.events().len(), 5);
    assert!(track.diagnostics().is_empty());
    assert_eq!(reader.buffer_position(), bytes.len());
    assert!(track.events().last().unwrap().meta().unwrap().is_end_of_track());
}

#[test]
fn byte_conservation() {
    use pretty_assertions::assert_eq;
    // sum of per-event byte counts must equal the declared chunk length
    let payload = [
        0x81, 0x00, 0x90, 0x40, 0x7F, // two-byte delta
        0x00, 0xF0, 0x02, 0x01, 0x02, //
        0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, //
        0x00, 0xFF, 0x2F, 0x00, //
    ];
    let bytes = track_chunk(&payload);
    let mut reader = Reader::from_byte_slice(&bytes);
    let track = Track::decode(&mut reader, 0).unwrap();
    assert!(track.diagnostics().is_empty());
    assert_eq!(reader.buffer_position() - 8, payload.len());
}

#[test]
fn invalid_marker_yields_no_events() {
    let mut bytes = track_chunk(&[0x00, 0xFF, 0x2F, 0x00]);
    bytes[0] = b'X'; // XTrk
    let mut reader = Reader::from_byte_slice(&bytes);
    let err = Track::decode(&mut reader, 0).unwrap_err();
    assert!(!err.is_unexpected_eof());
    assert_eq!(err.position(), 4);
}

#[test]
fn length_mismatch_is_a_diagnostic_not_an_error() {
    use pretty_assertions::assert_eq;
    // declared length cuts into the NoteOn: the event overruns the frame
    let mut bytes = track_chunk(&[0x00, 0x90, 0x40, 0x7F]);
    bytes[7] = 3; // declare 3 of the 4 payload bytes
    let mut reader = Reader::from_byte_slice(&bytes);
    let track = Track::decode(&mut reader, 0).unwrap();

    assert_eq!(track.events().len(), 1);
    assert_eq!(
        track.diagnostics(),
        &[TrackDiagnostic::ChunkLengthMismatch {
            declared: 3,
            consumed: 4,
        }]
    );
}

#[test]
fn unknown_meta_is_a_diagnostic_and_an_event() {
    use pretty_assertions::assert_eq;
    let bytes = track_chunk(&[
        0x00, 0xFF, 0x60, 0x02, 0xAA, 0xBB, //
        0x00, 0xFF, 0x2F, 0x00, //
    ]);
    let mut reader = Reader::from_byte_slice(&bytes);
    let track = Track::decode(&mut reader, 0).unwrap();

    assert_eq!(track.events().len(), 2);
    let meta = track.events()[0].meta().unwrap();
    assert_eq!(meta.kind(), MetaKind::Unknown(0x60));
    assert_eq!(meta.payload(), &[0xAA, 0xBB]);
    assert!(matches!(
        track.diagnostics(),
        [TrackDiagnostic::UnrecognizedMetaType {
            type_byte: 0x60,
            ..
        }]
    ));
}

#[test]
fn truncated_track_is_fatal() {
    let bytes = track_chunk(&[0x00, 0x90, 0x40]); // NoteOn missing its velocity
    let mut reader = Reader::from_byte_slice(&bytes);
    let err = Track::decode(&mut reader, 0).unwrap_err();
    assert!(err.is_unexpected_eof());
}
