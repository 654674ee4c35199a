#![doc = r#"
The track event decoder.

A track chunk's payload is a self-describing byte stream of three event
shapes: channel voice messages, system-exclusive blocks, and meta events.
Each event is a delta-time followed by a status byte and a status-dependent
payload. The exception: a channel voice status may be omitted entirely
("running status"), in which case the byte in status position is already the
first data byte of a repeat of the previous channel voice status.

Classification therefore happens strictly after running-status resolution: a
raw byte below 0x80 is indistinguishable from a payload byte except by its
position in the stream.
"#]

use num_enum::TryFromPrimitive;

use super::MetaEvent;
use crate::{
    Note, TrackError,
    reader::{ReadResult, Reader, inv_data},
};

#[doc = r#"
One decoded track event: the delta-time and the classified body.

Created fully populated in one decode step and never mutated; a track's
events are appended in stream order and stay that way.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackEvent<'a> {
    delta_time: u32,
    kind: TrackEventKind<'a>,
}

impl<'a> TrackEvent<'a> {
    /// Decode one event.
    ///
    /// `running_status` is the decoder state carried across events of one
    /// track: the last explicit channel voice status, or `None` before any
    /// has been seen. Consulting it while `None` is a malformed-input error,
    /// [`TrackError::UndefinedRunningStatus`].
    pub fn read(
        reader: &mut Reader<'a>,
        running_status: &mut Option<u8>,
    ) -> ReadResult<TrackEvent<'a>> {
        let delta_time = reader.read_vlv()?;

        let mut status = reader.read_byte()?;
        if status < 0x80 {
            // not a status byte: the first data byte of an implicit repeat.
            // Un-consume it and substitute the running status.
            reader.step_back(1);
            status = running_status
                .ok_or_else(|| inv_data(reader, TrackError::UndefinedRunningStatus))?;
        }
        // only channel voice statuses participate in running status
        if (0x80..=0xEF).contains(&status) {
            *running_status = Some(status);
        }

        let kind = match status {
            0xF0 | 0xF7 => {
                let length = reader.read_vlv()? as usize;
                let data = reader.read_bytes(length)?;
                TrackEventKind::SystemExclusive(SysExEvent { status, data })
            }
            0x80..=0xEF => {
                let kind = VoiceKind::try_from(status >> 4)
                    .map_err(|_| inv_data(reader, TrackError::InvalidStatusByte(status)))?;
                let data = reader.read_bytes(kind.payload_len())?;
                TrackEventKind::ChannelVoice(ChannelVoiceEvent { status, kind, data })
            }
            0xFF => TrackEventKind::Meta(MetaEvent::read(reader)?),
            _ => return Err(inv_data(reader, TrackError::InvalidStatusByte(status))),
        };

        Ok(TrackEvent { delta_time, kind })
    }

    /// Ticks since the previous event in the same track. Zero means
    /// simultaneous.
    pub const fn delta_time(&self) -> u32 {
        self.delta_time
    }

    /// The classified event body.
    pub const fn kind(&self) -> &TrackEventKind<'a> {
        &self.kind
    }

    /// The meta event, if this is one.
    pub const fn meta(&self) -> Option<&MetaEvent<'a>> {
        match &self.kind {
            TrackEventKind::Meta(meta) => Some(meta),
            _ => None,
        }
    }
}

/// The three structurally different event shapes.
///
/// A closed set: the payload framing is fully determined by which variant an
/// event falls into, so nothing downstream ever re-branches on status ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackEventKind<'a> {
    /// A message addressed to one of the 16 channels
    ChannelVoice(ChannelVoiceEvent<'a>),
    /// A manufacturer-defined opaque blob
    SystemExclusive(SysExEvent<'a>),
    /// A file-only annotation
    Meta(MetaEvent<'a>),
}

/// A channel voice message: status byte plus one or two data bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelVoiceEvent<'a> {
    status: u8,
    kind: VoiceKind,
    data: &'a [u8],
}

impl<'a> ChannelVoiceEvent<'a> {
    /// The raw status byte, kept for diagnostics.
    pub const fn status(&self) -> u8 {
        self.status
    }

    /// The message kind, from the status high nibble.
    pub const fn kind(&self) -> VoiceKind {
        self.kind
    }

    /// The channel, 0-15, from the status low nibble.
    pub const fn channel(&self) -> u8 {
        self.status & 0x0F
    }

    /// The data bytes, in stream order.
    pub const fn payload(&self) -> &'a [u8] {
        self.data
    }

    /// Number of data bytes (1 for ProgramChange and ChannelPressure,
    /// otherwise 2).
    pub const fn payload_len(&self) -> usize {
        self.data.len()
    }

    /// The named note, for NoteOff and NoteOn messages.
    pub fn note(&self) -> Option<Note> {
        match self.kind {
            VoiceKind::NoteOff | VoiceKind::NoteOn => Note::from_byte(*self.data.first()?),
            _ => None,
        }
    }

    /// The velocity byte, for NoteOff and NoteOn messages.
    pub fn velocity(&self) -> Option<u8> {
        match self.kind {
            VoiceKind::NoteOff | VoiceKind::NoteOn => self.data.get(1).copied(),
            _ => None,
        }
    }
}

/// The channel voice message kinds, by status high nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum VoiceKind {
    /// `8n kk vv`
    NoteOff = 0x8,
    /// `9n kk vv`; velocity zero releases the key
    NoteOn = 0x9,
    /// `An kk vv`, per-key aftertouch
    PolyphonicPressure = 0xA,
    /// `Bn cc vv`
    ControlChange = 0xB,
    /// `Cn pp`, one data byte
    ProgramChange = 0xC,
    /// `Dn vv`, one data byte, whole-channel aftertouch
    ChannelPressure = 0xD,
    /// `En ll mm`
    PitchBend = 0xE,
}

impl VoiceKind {
    /// How many data bytes this message carries.
    pub const fn payload_len(&self) -> usize {
        match self {
            Self::ProgramChange | Self::ChannelPressure => 1,
            _ => 2,
        }
    }
}

/// A system-exclusive block: `F0` (or `F7` for an escape) followed by a
/// length and that many opaque bytes, kept verbatim in stream order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SysExEvent<'a> {
    status: u8,
    data: &'a [u8],
}

impl<'a> SysExEvent<'a> {
    /// The raw status byte, `0xF0` or `0xF7`.
    pub const fn status(&self) -> u8 {
        self.status
    }

    /// True for the `F7` escape form.
    pub const fn is_escape(&self) -> bool {
        self.status == 0xF7
    }

    /// The blob, untouched.
    pub const fn payload(&self) -> &'a [u8] {
        self.data
    }

    /// Number of payload bytes.
    pub const fn payload_len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
fn read_one(bytes: &[u8], running_status: &mut Option<u8>) -> TrackEvent<'static> {
    // leak keeps the fixtures trivially 'static in tests
    let bytes: &'static [u8] = Box::leak(bytes.to_vec().into_boxed_slice());
    let mut reader = Reader::from_byte_slice(bytes);
    TrackEvent::read(&mut reader, running_status).unwrap()
}

#[test]
fn running_status_inherits_the_previous_voice_status() {
    use pretty_assertions::assert_eq;
    let bytes = [
        0x00, 0x90, 0x40, 0x7F, // delta 0, NoteOn E4 vel 127
        0x0A, 0x41, 0x70, // delta 10, status omitted
    ];
    let mut reader = Reader::from_byte_slice(&bytes);
    let mut running_status = None;

    let first = TrackEvent::read(&mut reader, &mut running_status).unwrap();
    let second = TrackEvent::read(&mut reader, &mut running_status).unwrap();
    assert_eq!(reader.buffer_position(), bytes.len());

    assert_eq!(first.delta_time(), 0);
    assert_eq!(second.delta_time(), 10);
    for (event, key, velocity) in [(&first, 0x40, 0x7F), (&second, 0x41, 0x70)] {
        let TrackEventKind::ChannelVoice(voice) = event.kind() else {
            panic!("expected a channel voice event");
        };
        assert_eq!(voice.kind(), VoiceKind::NoteOn);
        assert_eq!(voice.status(), 0x90);
        assert_eq!(voice.payload(), &[key, velocity]);
    }
}

#[test]
fn running_status_before_any_status_fails() {
    let mut reader = Reader::from_byte_slice(&[0x00, 0x40, 0x7F]);
    let mut running_status = None;
    let err = TrackEvent::read(&mut reader, &mut running_status).unwrap_err();
    assert!(!err.is_unexpected_eof());
}

#[test]
fn meta_and_sysex_do_not_update_running_status() {
    use pretty_assertions::assert_eq;
    let mut running_status = None;
    read_one(&[0x00, 0x90, 0x40, 0x7F], &mut running_status);
    assert_eq!(running_status, Some(0x90));
    read_one(&[0x00, 0xFF, 0x06, 0x01, 0x41], &mut running_status);
    read_one(&[0x00, 0xF0, 0x01, 0x55], &mut running_status);
    assert_eq!(running_status, Some(0x90));
}

#[test]
fn program_change_has_one_data_byte() {
    use pretty_assertions::assert_eq;
    let event = read_one(&[0x00, 0xC0, 0x05], &mut None);
    let TrackEventKind::ChannelVoice(voice) = event.kind() else {
        panic!("expected a channel voice event");
    };
    assert_eq!(voice.kind(), VoiceKind::ProgramChange);
    assert_eq!(voice.payload_len(), 1);
    assert_eq!(voice.payload(), &[0x05]);
    assert_eq!(voice.note(), None);
}

#[test]
fn note_on_has_two_data_bytes() {
    use pretty_assertions::assert_eq;
    let event = read_one(&[0x00, 0x93, 0x3C, 0x60], &mut None);
    let TrackEventKind::ChannelVoice(voice) = event.kind() else {
        panic!("expected a channel voice event");
    };
    assert_eq!(voice.payload_len(), 2);
    assert_eq!(voice.channel(), 3);
    assert_eq!(voice.note().unwrap().to_string(), "C4");
    assert_eq!(voice.velocity(), Some(0x60));
}

#[test]
fn meta_text_event() {
    use pretty_assertions::assert_eq;
    let event = read_one(&[0x00, 0xFF, 0x03, 0x04, b'T', b'e', b's', b't'], &mut None);
    let meta = event.meta().unwrap();
    assert_eq!(meta.kind(), super::MetaKind::SequenceName);
    assert_eq!(meta.code(), 0xFF03);
    assert_eq!(meta.payload_len(), 4);
    assert_eq!(meta.text().unwrap(), "Test");
}

#[test]
fn sysex_payload_keeps_stream_order() {
    use pretty_assertions::assert_eq;
    let event = read_one(&[0x00, 0xF0, 0x03, 0x01, 0x02, 0x03], &mut None);
    let TrackEventKind::SystemExclusive(sysex) = event.kind() else {
        panic!("expected a sysex event");
    };
    assert_eq!(sysex.payload_len(), 3);
    assert_eq!(sysex.payload(), &[0x01, 0x02, 0x03]);
    assert!(!sysex.is_escape());
}

#[test]
fn unknown_meta_type_is_kept() {
    use pretty_assertions::assert_eq;
    let event = read_one(&[0x00, 0xFF, 0x60, 0x02, 0xAA, 0xBB], &mut None);
    let meta = event.meta().unwrap();
    assert_eq!(meta.kind(), super::MetaKind::Unknown(0x60));
    assert_eq!(meta.payload(), &[0xAA, 0xBB]);
}

#[test]
fn truncated_payload_is_eof() {
    let mut reader = Reader::from_byte_slice(&[0x00, 0x90, 0x40]);
    let err = TrackEvent::read(&mut reader, &mut None).unwrap_err();
    assert!(err.is_unexpected_eof());
}
