use super::Reader;
use crate::ParseError;
use thiserror::Error;

#[doc = r#"
A set of errors that can occur while reading bytes into the midi representation
"#]
#[derive(Debug, Error)]
#[error("Reading at position {position}, {kind}")]
pub struct ReaderError {
    position: usize,
    pub(crate) kind: ReaderErrorKind,
}

/// A kind of error that a reader can produce
#[derive(Debug, Error)]
pub enum ReaderErrorKind {
    /// Parsing errors
    #[error("Parsing {0}")]
    ParseError(#[from] ParseError),
    /// The byte source ran out mid-field.
    #[error("Unexpected end of input")]
    UnexpectedEof,
}

impl ReaderError {
    /// Create a reader error from a position and kind
    pub const fn new(position: usize, kind: ReaderErrorKind) -> Self {
        Self { position, kind }
    }

    /// True if the underlying bytes were exhausted before a field was complete
    pub const fn is_unexpected_eof(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::UnexpectedEof)
    }

    /// Returns the error kind of the reader.
    pub fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }

    /// Returns the position where the read error occurred.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Create a new invalid data error
    pub const fn parse_error(position: usize, error: ParseError) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::ParseError(error),
        }
    }

    /// Create a new unexpected end-of-input error
    pub const fn eof(position: usize) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::UnexpectedEof,
        }
    }
}

/// The Read Result type (see [`ReaderError`])
pub type ReadResult<T> = Result<T, ReaderError>;

pub(crate) fn inv_data(reader: &Reader<'_>, v: impl Into<ParseError>) -> ReaderError {
    ReaderError::parse_error(reader.buffer_position(), v.into())
}
