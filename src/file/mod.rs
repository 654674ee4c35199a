#![doc = r#"
Rusty representation of a decoded Standard MIDI File.

A file is a header chunk followed by the number of track chunks the header
declares, in file order. [`MidiFile::parse`] walks exactly that: header
first, then each track through [`Track::decode`].
"#]

mod header;
pub use header::*;

mod timing;
pub use timing::*;

mod track;
pub use track::*;

use crate::reader::{ReadResult, Reader};

#[doc = r#"
A fully decoded MIDI file: the header and every track, in file order.

Tracks borrow their payload bytes from the input slice; the file is a
read-only view that downstream formatting and printing traverse.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiFile<'a> {
    header: RawHeaderChunk,
    tracks: Vec<Track<'a>>,
}

impl<'a> MidiFile<'a> {
    /// Parse a byte slice holding a whole Standard MIDI File.
    ///
    /// Structural failures in any chunk abort the parse; per-track
    /// [`diagnostics`](Track::diagnostics) do not.
    pub fn parse(bytes: &'a [u8]) -> ReadResult<Self> {
        let mut reader = Reader::from_byte_slice(bytes);
        let header = RawHeaderChunk::read(&mut reader)?;

        let mut tracks = Vec::with_capacity(usize::from(header.num_tracks()));
        for id in 0..usize::from(header.num_tracks()) {
            let mut track = Track::decode(&mut reader, id)?;
            // the name belongs to the track, but it arrives as an event
            let name = track.events().iter().find_map(|event| {
                let meta = event.meta()?;
                (meta.kind() == MetaKind::SequenceName).then(|| meta.text())?
            });
            track.name = name;
            tracks.push(track);
        }

        Ok(Self { header, tracks })
    }

    /// The decoded header chunk.
    pub const fn header(&self) -> &RawHeaderChunk {
        &self.header
    }

    /// Returns the format type for the file.
    pub const fn format_type(&self) -> FormatType {
        self.header.format_type()
    }

    /// Returns the division every delta-time is interpreted through.
    pub const fn timing(&self) -> Timing {
        self.header.timing()
    }

    /// The decoded tracks, in file order.
    pub fn tracks(&self) -> &[Track<'a>] {
        &self.tracks
    }

    /// Executes the provided function for each track in file order.
    pub fn for_each_track<F>(&self, func: F)
    where
        F: FnMut(&Track<'a>),
    {
        self.tracks.iter().for_each(func);
    }
}
