use thiserror::Error;

#[doc = r#"
Content-level parse failures.

These describe *what* was malformed; [`ReaderError`](crate::reader::ReaderError)
wraps them with *where* in the byte stream the decoder was when it gave up.
"#]
#[derive(Debug, Error)]
pub enum ParseError {
    /// A chunk-framing error
    #[error("Chunk: {0}")]
    Chunk(#[from] ChunkError),
    /// A header chunk error
    #[error("Header: {0}")]
    Header(#[from] HeaderError),
    /// A track event error
    #[error("Track: {0}")]
    Track(#[from] TrackError),
    /// An SMPTE offset payload error
    #[error("Smpte: {0}")]
    Smpte(#[from] SmpteError),
}

/// Errors in the 8-byte frame that introduces every chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChunkError {
    /// The 4-byte marker was not the one required at this position.
    ///
    /// Fatal for the current chunk. The caller decides whether to abort the
    /// file or skip the chunk.
    #[error("invalid chunk marker: expected {expected:?}, found {found:?}")]
    InvalidMarker {
        /// The marker required here ("MThd" or "MTrk")
        expected: [u8; 4],
        /// The four bytes actually present
        found: [u8; 4],
    },
}

/// Errors in the header chunk's fixed fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// The declared header length cannot hold the three header fields.
    #[error("header chunk length {0} is shorter than the 6 required bytes")]
    InvalidLength(u32),
    /// The format word was not 0, 1 or 2.
    #[error("unknown file format {0}")]
    InvalidFormat(u16),
    /// The SMPTE division byte named an undefined frame rate.
    #[error("invalid SMPTE frames per second: {0}")]
    InvalidSmpteFps(i8),
}

/// Errors raised by the track event decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TrackError {
    /// A data byte sat in status position before any channel voice status
    /// had been seen, so there is no running status to fall back on.
    #[error("running status required before any status byte was seen")]
    UndefinedRunningStatus,
    /// A status byte outside every defined range.
    #[error("invalid status byte {0:#04x}")]
    InvalidStatusByte(u8),
    /// A variable-length value decoded to more than 32 bits.
    #[error("variable-length value {0:#x} does not fit in 32 bits")]
    VlvOutOfRange(u64),
}

/// Validation errors for the 5-byte SMPTE offset meta payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SmpteError {
    /// The payload was not exactly 5 bytes.
    #[error("SMPTE offset payload must be 5 bytes, got {0}")]
    Length(usize),
    /// The frame-rate bits named an undefined rate.
    #[error("invalid SMPTE frame rate code {0}")]
    FrameRate(u8),
    /// Hours above 23.
    #[error("SMPTE hour {0} out of range")]
    HourOffset(u8),
    /// Minutes above 59.
    #[error("SMPTE minute {0} out of range")]
    MinuteOffset(u8),
    /// Seconds above 59.
    #[error("SMPTE second {0} out of range")]
    SecondOffset(u8),
    /// Fractional frames above 99.
    #[error("SMPTE subframe {0} out of range")]
    Subframe(u8),
}
