use mtrk::prelude::*;
use pretty_assertions::assert_eq;

fn header_chunk(format: u16, num_tracks: u16, division: u16) -> Vec<u8> {
    let mut bytes = b"MThd".to_vec();
    bytes.extend_from_slice(&6u32.to_be_bytes());
    bytes.extend_from_slice(&format.to_be_bytes());
    bytes.extend_from_slice(&num_tracks.to_be_bytes());
    bytes.extend_from_slice(&division.to_be_bytes());
    bytes
}

fn track_chunk(payload: &[u8]) -> Vec<u8> {
    let mut bytes = b"MTrk".to_vec();
    bytes.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    bytes.extend_from_slice(payload);
    bytes
}

fn two_track_file() -> Vec<u8> {
    let mut bytes = header_chunk(1, 2, 480);
    // tempo map track
    bytes.extend_from_slice(&track_chunk(&[
        0x00, 0xFF, 0x03, 0x05, b'T', b'e', b'm', b'p', b'o', // name
        0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, // 120 bpm
        0x00, 0xFF, 0x58, 0x04, 0x04, 0x02, 0x18, 0x08, // 4/4
        0x00, 0xFF, 0x2F, 0x00, //
    ]));
    // one bar of notes, leaning on running status
    bytes.extend_from_slice(&track_chunk(&[
        0x00, 0xFF, 0x03, 0x05, b'P', b'i', b'a', b'n', b'o', // name
        0x00, 0xC0, 0x00, // grand piano
        0x00, 0x90, 0x3C, 0x60, // C4 on
        0x00, 0x40, 0x60, // E4 on, running status
        0x83, 0x60, 0x3C, 0x00, // C4 off after 480 ticks, still running
        0x00, 0x40, 0x00, // E4 off
        0x00, 0xFF, 0x2F, 0x00, //
    ]));
    bytes
}

#[test]
fn decode_two_track_file() {
    let bytes = two_track_file();
    let file = MidiFile::parse(&bytes).unwrap();

    assert_eq!(file.format_type(), FormatType::Simultaneous);
    assert_eq!(file.timing(), Timing::TicksPerQuarterNote(480));
    assert_eq!(file.tracks().len(), 2);

    let tempo_track = &file.tracks()[0];
    assert_eq!(tempo_track.id(), 0);
    assert_eq!(tempo_track.name(), Some("Tempo"));
    assert!(tempo_track.diagnostics().is_empty());
    let tempo = tempo_track.events()[1].meta().unwrap();
    assert_eq!(tempo.tempo_micros_per_quarter(), Some(500_000));
    let signature = tempo_track.events()[2].meta().unwrap().time_signature().unwrap();
    assert_eq!((signature.numerator, signature.denominator()), (4, 4));

    let piano = &file.tracks()[1];
    assert_eq!(piano.id(), 1);
    assert_eq!(piano.name(), Some("Piano"));
    assert_eq!(piano.events().len(), 7);
}

#[test]
fn running_status_resolves_per_track() {
    let bytes = two_track_file();
    let file = MidiFile::parse(&bytes).unwrap();
    let piano = &file.tracks()[1];

    let voices: Vec<_> = piano
        .events()
        .iter()
        .filter_map(|event| match event.kind() {
            TrackEventKind::ChannelVoice(voice) => Some(voice),
            _ => None,
        })
        .collect();

    assert_eq!(voices.len(), 5);
    assert_eq!(voices[0].kind(), VoiceKind::ProgramChange);
    // the four note events all resolved to the one explicit 0x90
    for voice in &voices[1..] {
        assert_eq!(voice.status(), 0x90);
        assert_eq!(voice.kind(), VoiceKind::NoteOn);
    }
    assert_eq!(voices[1].note().unwrap().to_string(), "C4");
    assert_eq!(voices[2].note().unwrap().to_string(), "E4");
    assert_eq!(voices[3].velocity(), Some(0));

    // the two-byte delta before the first note-off
    assert_eq!(piano.events()[4].delta_time(), 480);
}

#[test]
fn accumulated_ticks_line_up() {
    let bytes = two_track_file();
    let file = MidiFile::parse(&bytes).unwrap();

    let mut ticks = 0u64;
    for event in file.tracks()[1].events() {
        ticks += u64::from(event.delta_time());
    }
    assert_eq!(ticks, 480);
}

#[test]
fn file_with_sysex_and_unknown_meta() {
    let mut bytes = header_chunk(0, 1, 96);
    bytes.extend_from_slice(&track_chunk(&[
        0x00, 0xF0, 0x03, 0x43, 0x12, 0xF7, // sysex, blob kept in order
        0x00, 0xFF, 0x60, 0x02, 0xAA, 0xBB, // unknown meta
        0x00, 0xFF, 0x7F, 0x03, 0x01, 0x02, 0x03, // sequencer specific, vlv length
        0x00, 0xFF, 0x2F, 0x00, //
    ]));

    let file = MidiFile::parse(&bytes).unwrap();
    let track = &file.tracks()[0];

    let TrackEventKind::SystemExclusive(sysex) = track.events()[0].kind() else {
        panic!("expected sysex");
    };
    assert_eq!(sysex.payload(), &[0x43, 0x12, 0xF7]);

    assert_eq!(track.events()[1].meta().unwrap().kind(), MetaKind::Unknown(0x60));
    assert_eq!(
        track.events()[2].meta().unwrap().kind(),
        MetaKind::SequencerSpecific
    );
    assert_eq!(track.events()[2].meta().unwrap().payload(), &[1, 2, 3]);

    assert_eq!(track.diagnostics().len(), 1);
    assert!(matches!(
        track.diagnostics()[0],
        TrackDiagnostic::UnrecognizedMetaType { type_byte: 0x60, .. }
    ));
}

#[test]
fn missing_track_chunk_is_fatal() {
    // header promises two tracks, file holds one
    let mut bytes = header_chunk(1, 2, 480);
    bytes.extend_from_slice(&track_chunk(&[0x00, 0xFF, 0x2F, 0x00]));

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert!(err.is_unexpected_eof());
}

#[test]
fn corrupt_marker_reports_its_position() {
    let mut bytes = two_track_file();
    // damage the second track's marker: header is 14 bytes, the tempo
    // track is 8 bytes of frame plus 28 of payload
    let second_track = 14 + 8 + 28;
    bytes[second_track] = b'X';

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert!(!err.is_unexpected_eof());
    assert_eq!(err.position(), second_track + 4);
    assert!(matches!(
        err.error_kind(),
        ReaderErrorKind::ParseError(ParseError::Chunk(ChunkError::InvalidMarker { .. }))
    ));
}
