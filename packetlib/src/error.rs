//! Error types.

use std::fmt;

use thiserror::Error;

/// Variable-length field of a wire frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Origin node identity.
    Source,
    /// Destination identifier.
    Destination,
    /// Application payload.
    Payload,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Source => write!(f, "source"),
            Field::Destination => write!(f, "destination"),
            Field::Payload => write!(f, "payload"),
        }
    }
}

/// Errors produced while framing, parsing or transmitting packets.
#[derive(Debug, Error)]
pub enum Error {
    /// Trailing checksum byte disagrees with the recomputed XOR.
    #[error("checksum mismatch: frame carries {actual:#04x}, computed {expected:#04x}")]
    ChecksumMismatch {
        /// Checksum computed over the frame body.
        expected: u8,
        /// Checksum stored in the frame.
        actual: u8,
    },

    /// Frame is too short for its declared layout or otherwise malformed.
    #[error("framing error at offset {offset}: {reason}")]
    Framing {
        /// Byte offset where parsing stopped.
        offset: usize,
        /// What was wrong.
        reason: &'static str,
    },

    /// A field does not fit in its single length byte.
    #[error("{field} is {len} bytes, the limit is 255")]
    OversizeField {
        /// Offending field.
        field: Field,
        /// Its length in bytes.
        len: usize,
    },

    /// The underlying transport failed.
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a framing error at a specific offset.
    pub fn framing(offset: usize, reason: &'static str) -> Self {
        Error::Framing { offset, reason }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
