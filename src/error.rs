use std::string::FromUtf8Error;

use thiserror::Error;

/// Result of decoding an IFD or one of its entries.
pub type IfdResult<T> = Result<T, IfdError>;

/// A decode failure, tagged with the byte offset of the directory entry
/// (or directory-level field) that produced it.
#[derive(Debug, Error)]
#[error("{kind} (entry at byte offset {offset})")]
pub struct IfdError {
    offset: usize,
    kind: ErrorKind,
}

impl IfdError {
    pub(crate) fn new(offset: usize, kind: ErrorKind) -> Self {
        IfdError { offset, kind }
    }

    /// Byte offset of the entry (or trailing field) that failed to decode.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// What went wrong.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

/// Decode error kinds.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A read reached past the end of the source buffer.
    #[error("read of {len} bytes at offset {at} is out of bounds (buffer is {buffer_len} bytes)")]
    OutOfBounds {
        at: usize,
        len: usize,
        buffer_len: usize,
    },

    /// An ASCII-typed value was not valid UTF-8.
    #[error("tag value is not a valid string: {0}")]
    InvalidString(#[from] FromUtf8Error),

    /// A date-classified tag held a string that is not an EXIF date-time.
    #[error("invalid date-time string {raw:?}")]
    InvalidDate {
        raw: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A date-classified tag held a non-string value.
    #[error("date tag does not hold a string value")]
    DateNotAscii,
}
