#![doc = r#"
Meta events: file-only annotations embedded in a track chunk.

A meta event is framed as `FF type length data...`. The length is a
variable-length value for the text class (types 0x00-0x07) and for
sequencer-specific (0x7F); every other type stores its length as a single raw
byte. Unrecognized types are kept, payload and all; downstream consumers may
still want the raw bytes.
"#]

use core::fmt;

use num_enum::FromPrimitive;
use std::borrow::Cow;

use crate::{
    SmpteError,
    file::SmpteFps,
    reader::{ReadResult, Reader},
};

/// A decoded meta event: the combined 16-bit code and the raw payload.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetaEvent<'a> {
    code: u16,
    kind: MetaKind,
    data: &'a [u8],
}

impl<'a> MetaEvent<'a> {
    /// Decode the remainder of a meta event. The `0xFF` status byte has
    /// already been consumed.
    pub(crate) fn read(reader: &mut Reader<'a>) -> ReadResult<Self> {
        let meta_type = reader.read_byte()?;
        let kind = MetaKind::from(meta_type);

        let length = if kind.is_text() || kind == MetaKind::SequencerSpecific {
            reader.read_vlv()? as usize
        } else {
            // a single raw byte, not a variable-length value
            usize::from(reader.read_byte()?)
        };
        let data = reader.read_bytes(length)?;

        Ok(Self {
            code: 0xFF00 | u16::from(meta_type),
            kind,
            data,
        })
    }

    /// The status and type bytes as one word, `0xFF00 | type`.
    pub const fn code(&self) -> u16 {
        self.code
    }

    /// The decoded subtype.
    pub const fn kind(&self) -> MetaKind {
        self.kind
    }

    /// The raw payload, in stream order.
    pub const fn payload(&self) -> &'a [u8] {
        self.data
    }

    /// Number of payload bytes.
    pub const fn payload_len(&self) -> usize {
        self.data.len()
    }

    /// True for the track terminator, `FF 2F 00`.
    pub fn is_end_of_track(&self) -> bool {
        self.kind == MetaKind::EndOfTrack
    }

    /// The payload as text, for the text-class types.
    ///
    /// The bytes are kept verbatim in [`payload`](Self::payload); this view
    /// is a lossy UTF-8 rendering for display.
    pub fn text(&self) -> Option<Cow<'a, str>> {
        self.kind.is_text().then(|| String::from_utf8_lossy(self.data))
    }

    /// Microseconds per quarter note, for a well-formed SetTempo event.
    pub fn tempo_micros_per_quarter(&self) -> Option<u32> {
        if self.kind != MetaKind::SetTempo {
            return None;
        }
        let [a, b, c] = *self.data else {
            return None;
        };
        Some(u32::from_be_bytes([0, a, b, c]))
    }

    /// The validated SMPTE offset, if this is an SMPTE offset event.
    pub fn smpte_offset(&self) -> Option<Result<SmpteOffset, SmpteError>> {
        (self.kind == MetaKind::SmpteOffset).then(|| SmpteOffset::parse(self.data))
    }

    /// The time signature, if this is a well-formed time signature event.
    pub fn time_signature(&self) -> Option<TimeSignature> {
        if self.kind != MetaKind::TimeSignature {
            return None;
        }
        let [numerator, denominator_exponent, clocks_per_click, thirty_seconds_per_quarter] =
            *self.data
        else {
            return None;
        };
        Some(TimeSignature {
            numerator,
            denominator_exponent,
            clocks_per_click,
            thirty_seconds_per_quarter,
        })
    }
}

/// The meta event subtype, selected by the type byte after `0xFF`.
///
/// Types the decoder does not recognize land in [`MetaKind::Unknown`] with
/// their type byte; the event itself is still produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MetaKind {
    /// The sequence number, at the start of a track
    SequenceNumber = 0x00,
    /// Free text
    Text = 0x01,
    /// A copyright notice
    Copyright = 0x02,
    /// The sequence or track name
    SequenceName = 0x03,
    /// An instrument name
    InstrumentName = 0x04,
    /// A lyric fragment
    Lyric = 0x05,
    /// A rehearsal or section marker
    Marker = 0x06,
    /// A cue point
    CuePoint = 0x07,
    /// The channel all following metas apply to
    ChannelPrefix = 0x20,
    /// The output port
    MidiPort = 0x21,
    /// The track terminator
    EndOfTrack = 0x2F,
    /// Microseconds per quarter note
    SetTempo = 0x51,
    /// The track's absolute SMPTE start time
    SmpteOffset = 0x54,
    /// The time signature
    TimeSignature = 0x58,
    /// The key signature
    KeySignature = 0x59,
    /// Sequencer-specific data
    SequencerSpecific = 0x7F,
    /// Any type byte not listed above
    #[num_enum(catch_all)]
    Unknown(u8),
}

impl MetaKind {
    /// True for the eight text-class types (0x00-0x07), whose payload length
    /// is a variable-length value.
    pub const fn is_text(&self) -> bool {
        use MetaKind::*;
        matches!(
            self,
            SequenceNumber
                | Text
                | Copyright
                | SequenceName
                | InstrumentName
                | Lyric
                | Marker
                | CuePoint
        )
    }
}

impl fmt::Display for MetaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use MetaKind::*;
        match self {
            SequenceNumber => write!(f, "SequenceNumber"),
            Text => write!(f, "Text"),
            Copyright => write!(f, "Copyright"),
            SequenceName => write!(f, "SequenceName"),
            InstrumentName => write!(f, "InstrumentName"),
            Lyric => write!(f, "Lyric"),
            Marker => write!(f, "Marker"),
            CuePoint => write!(f, "CuePoint"),
            ChannelPrefix => write!(f, "ChannelPrefix"),
            MidiPort => write!(f, "MidiPort"),
            EndOfTrack => write!(f, "EndOfTrack"),
            SetTempo => write!(f, "SetTempo"),
            SmpteOffset => write!(f, "SmpteOffset"),
            TimeSignature => write!(f, "TimeSignature"),
            KeySignature => write!(f, "KeySignature"),
            SequencerSpecific => write!(f, "SequencerSpecific"),
            Unknown(byte) => write!(f, "Unknown({byte:#04x})"),
        }
    }
}

/// A track's absolute start position in SMPTE time code.
///
/// Decoded from the 5-byte SMPTE offset payload:
/// byte 0 is `0rrhhhhh` (frame rate and hours), then minutes, seconds,
/// frames, and fractional frames in hundredths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteOffset {
    /// The frame rate for this offset
    pub fps: SmpteFps,
    /// Hours, 0-23
    pub hour: u8,
    /// Minutes, 0-59
    pub minute: u8,
    /// Seconds, 0-59
    pub second: u8,
    /// Frame within the second; the valid range depends on the rate
    pub frame: u8,
    /// Hundredths of a frame, 0-99
    pub subframe: u8,
}

impl SmpteOffset {
    /// Parse and validate a 5-byte SMPTE offset payload.
    pub const fn parse(data: &[u8]) -> Result<Self, SmpteError> {
        if data.len() != 5 {
            return Err(SmpteError::Length(data.len()));
        }

        // 0 rr hhhhh
        let fps = match data[0] >> 5 {
            0 => SmpteFps::TwentyFour,
            1 => SmpteFps::TwentyFive,
            2 => SmpteFps::TwentyNine,
            3 => SmpteFps::Thirty,
            v => return Err(SmpteError::FrameRate(v)),
        };
        let hour = data[0] & 0b0001_1111;
        if hour > 23 {
            return Err(SmpteError::HourOffset(hour));
        }
        let minute = data[1];
        if minute > 59 {
            return Err(SmpteError::MinuteOffset(minute));
        }
        let second = data[2];
        if second > 59 {
            return Err(SmpteError::SecondOffset(second));
        }
        let frame = data[3];
        let subframe = data[4];
        if subframe > 99 {
            return Err(SmpteError::Subframe(subframe));
        }

        Ok(Self {
            fps,
            hour,
            minute,
            second,
            frame,
            subframe,
        })
    }

    /// The offset as microseconds from zero.
    pub const fn as_micros(&self) -> f64 {
        ((((self.hour as u64 * 3600) + (self.minute as u64) * 60 + self.second as u64) * 1_000_000)
            as f64)
            + ((self.frame as u64) * 1_000_000) as f64 / self.fps.as_f64()
            + ((self.subframe as u32) * 10_000) as f64 / self.fps.as_f64()
    }
}

/// The four fields of a time signature meta event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    /// Beats per bar
    pub numerator: u8,
    /// The denominator as a power of two: 3 means eighth notes
    pub denominator_exponent: u8,
    /// MIDI clocks per metronome click
    pub clocks_per_click: u8,
    /// Notated 32nd notes per MIDI quarter note
    pub thirty_seconds_per_quarter: u8,
}

impl TimeSignature {
    /// The denominator as a plain number: 4 for quarter-note beats.
    pub const fn denominator(&self) -> u32 {
        1u32 << self.denominator_exponent
    }
}

#[test]
fn parse_smpte_offset() {
    use pretty_assertions::assert_eq;
    // the bytes after FF 54 05
    let bytes = [0x41, 0x17, 0x2D, 0x0C, 0x22];
    let offset = SmpteOffset::parse(&bytes).unwrap();

    assert_eq!(offset.fps, SmpteFps::TwentyNine);
    assert_eq!(offset.hour, 1);
    assert_eq!(offset.minute, 23);
    assert_eq!(offset.second, 45);
    assert_eq!(offset.frame, 12);
    assert_eq!(offset.subframe, 34);
}

#[test]
fn parse_invalid_smpte_offset() {
    use pretty_assertions::assert_eq;
    let bytes = [0x7F, 0x17, 0x2D, 0x0C, 0x22];
    let err = SmpteOffset::parse(&bytes).unwrap_err();
    assert_eq!(err, SmpteError::HourOffset(31));

    let bytes = [0x41, 0x50, 0x2D, 0x0C, 0x22];
    let err = SmpteOffset::parse(&bytes).unwrap_err();
    assert_eq!(err, SmpteError::MinuteOffset(80));
}

#[test]
fn meta_kind_catch_all() {
    use pretty_assertions::assert_eq;
    assert_eq!(MetaKind::from(0x03), MetaKind::SequenceName);
    assert_eq!(MetaKind::from(0x2F), MetaKind::EndOfTrack);
    assert_eq!(MetaKind::from(0x60), MetaKind::Unknown(0x60));
    assert!(MetaKind::from(0x07).is_text());
    assert!(!MetaKind::from(0x08).is_text());
}

#[test]
fn read_set_tempo() {
    use pretty_assertions::assert_eq;
    // FF 51 03 07 A1 20 -> 500_000 us per quarter, after the FF
    let mut reader = Reader::from_byte_slice(&[0x51, 0x03, 0x07, 0xA1, 0x20]);
    let event = MetaEvent::read(&mut reader).unwrap();
    assert_eq!(event.kind(), MetaKind::SetTempo);
    assert_eq!(event.code(), 0xFF51);
    assert_eq!(event.payload_len(), 3);
    assert_eq!(event.tempo_micros_per_quarter(), Some(500_000));
}

#[test]
fn read_time_signature() {
    use pretty_assertions::assert_eq;
    // FF 58 04 06 03 24 08 -> 6/8, after the FF
    let mut reader = Reader::from_byte_slice(&[0x58, 0x04, 0x06, 0x03, 0x24, 0x08]);
    let event = MetaEvent::read(&mut reader).unwrap();
    let sig = event.time_signature().unwrap();
    assert_eq!(sig.numerator, 6);
    assert_eq!(sig.denominator(), 8);
    assert_eq!(sig.clocks_per_click, 0x24);
    assert_eq!(sig.thirty_seconds_per_quarter, 8);
}

#[test]
fn read_end_of_track_is_empty() {
    use pretty_assertions::assert_eq;
    let mut reader = Reader::from_byte_slice(&[0x2F, 0x00]);
    let event = MetaEvent::read(&mut reader).unwrap();
    assert!(event.is_end_of_track());
    assert_eq!(event.payload(), &[] as &[u8]);
}

#[test]
fn text_is_lossy_not_interpreted() {
    use pretty_assertions::assert_eq;
    let mut reader = Reader::from_byte_slice(&[0x05, 0x03, 0xFF, 0x61, 0x62]);
    let event = MetaEvent::read(&mut reader).unwrap();
    assert_eq!(event.kind(), MetaKind::Lyric);
    // raw bytes preserved
    assert_eq!(event.payload(), &[0xFF, 0x61, 0x62]);
    // display view replaces the invalid byte
    assert_eq!(event.text().unwrap(), "\u{FFFD}ab");
}
