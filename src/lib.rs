#![doc = r#"
# mtrk

Decode Standard MIDI Files into time-stamped, typed event lists per track.

The interesting part of the format is the track chunk: a self-describing
byte stream mixing three structurally different event shapes (channel voice
messages, system-exclusive blobs, meta events), a 7-bit variable-length
integer encoding shared by delta-times and several payload lengths, and the
"running status" shorthand where a status byte is omitted and inherited from
the previous channel voice event. [`file::Track::decode`] handles all of
that; [`MidiFile::parse`](file::MidiFile::parse) drives it across a whole
file.

```rust
use mtrk::prelude::*;

let bytes = [
    0x4D, 0x54, 0x68, 0x64, 0x00, 0x00, 0x00, 0x06, // MThd
    0x00, 0x00, 0x00, 0x01, 0x00, 0x60, // format 0, one track, 96 tpqn
    0x4D, 0x54, 0x72, 0x6B, 0x00, 0x00, 0x00, 0x0B, // MTrk, 11 bytes
    0x00, 0x90, 0x3C, 0x60, // NoteOn C4
    0x00, 0x3C, 0x00, // running status, vel 0
    0x00, 0xFF, 0x2F, 0x00, // end of track
];

let file = MidiFile::parse(&bytes)?;
assert_eq!(file.tracks().len(), 1);
# Ok::<(), mtrk::reader::ReaderError>(())
```

Malformed input never panics: structural failures come back as a
[`ReaderError`](reader::ReaderError) carrying the byte position, and
content-level anomalies ride along as
[`TrackDiagnostic`](file::TrackDiagnostic)s on the decoded track.
"#]
#![warn(missing_docs)]

mod error;
pub use error::*;

pub mod file;

mod note;
pub use note::*;

pub mod reader;

/// Everything needed to decode a file and walk its events.
pub mod prelude {
    pub use crate::{
        ChunkError, HeaderError, Key, Note, Octave, ParseError, SmpteError, TrackError,
        file::{
            ChannelVoiceEvent, FormatType, MetaEvent, MetaKind, MidiFile, RawHeaderChunk,
            SmpteFps, SmpteOffset, SmpteTiming, SysExEvent, TimeSignature, Timing, Track,
            TrackDiagnostic, TrackEvent, TrackEventKind, VoiceKind,
        },
        reader::{ReadResult, Reader, ReaderError, ReaderErrorKind},
    };
}
