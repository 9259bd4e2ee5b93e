use std::{error, fmt, io};

/// Reasons a [`Mapping`](crate::mapping::Mapping) failed to construct.
///
/// Kept as a nested enum (rather than flattened into [`Error`]) because the
/// spec calls these out as "a distinct error kind" from the rest of the
/// taxonomy: they can only occur while building a `Mapping`, never while
/// encoding or decoding through an already-built one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingError {
    /// The alphabet did not contain exactly 64 bytes.
    WrongAlphabetSize { actual: usize },
    /// An alphabet byte was outside the printable-ASCII range.
    NonAsciiAlphabetByte { index: usize, byte: u8 },
    /// The same byte appeared twice in the alphabet.
    DuplicateAlphabetByte { byte: u8 },
    /// A user-supplied 256-entry `decmap` was not a permutation of `0..256`.
    NotAPermutation,
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MappingError::WrongAlphabetSize { actual } => {
                write!(f, "alphabet must contain exactly 64 bytes, got {}", actual)
            }
            MappingError::NonAsciiAlphabetByte { index, byte } => write!(
                f,
                "alphabet byte {} (0x{:02x} at index {}) is not printable ASCII",
                byte, byte, index
            ),
            MappingError::DuplicateAlphabetByte { byte } => {
                write!(f, "alphabet byte 0x{:02x} appears more than once", byte)
            }
            MappingError::NotAPermutation => {
                write!(f, "decmap is not a permutation of 0..256")
            }
        }
    }
}

impl error::Error for MappingError {}

/// All failure modes exposed by this crate.
///
/// This is a flat taxonomy of *kinds*, matching the behavior described for
/// each failing operation rather than one error type per call site.
#[derive(Debug)]
pub enum Error {
    /// A mapping failed to construct. Wraps [`MappingError`] for the detail.
    InvalidMapping(MappingError),
    /// The builder's terminator collides with the alphabet or whitespace set.
    InvalidTerminator,
    /// The builder's line-break string is empty or contains a non-whitespace byte.
    InvalidLineBreak,
    /// The builder's whitespace set contains a non-ASCII byte or a duplicate.
    InvalidWhitespace,
    /// Decode encountered a byte (or code point) outside alphabet/whitespace/terminator.
    InvalidCharacter { index: usize, byte: u32 },
    /// A terminator appeared where the optimistic-length formula or the stream
    /// grammar does not allow one.
    MisplacedTerminator { index: usize },
    /// Block decode in terminated mode found no terminator at the expected position.
    MissingTerminator,
    /// Block decode's data region length was `≡ 1 (mod 4)`, which cannot be
    /// split into whole output bytes.
    InvalidLength,
    /// Stream decode in terminated mode reached end-of-stream before the
    /// required terminator.
    UnexpectedEndOfStream,
    /// A write was attempted on a stream encoder that has already been closed.
    StreamClosed,
    /// The predicted encoded length does not fit in `usize` on this platform.
    BytesTooLong,
    /// An underlying sink or source failed to read or write.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidMapping(e) => write!(f, "invalid mapping: {}", e),
            Error::InvalidTerminator => write!(f, "terminator collides with alphabet or whitespace"),
            Error::InvalidLineBreak => write!(f, "line break must be a non-empty whitespace-only string"),
            Error::InvalidWhitespace => write!(f, "whitespace set contains a non-ASCII or duplicate byte"),
            Error::InvalidCharacter { index, byte } => {
                write!(f, "invalid character 0x{:02x} at offset {}", byte, index)
            }
            Error::MisplacedTerminator { index } => {
                write!(f, "misplaced terminator at offset {}", index)
            }
            Error::MissingTerminator => write!(f, "expected a terminator but found none"),
            Error::InvalidLength => write!(f, "encoded data region has an invalid length"),
            Error::UnexpectedEndOfStream => write!(f, "stream ended before the expected terminator"),
            Error::StreamClosed => write!(f, "write on a closed stream encoder"),
            Error::BytesTooLong => write!(f, "encoded length exceeds the platform size limit"),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::InvalidMapping(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<MappingError> for Error {
    fn from(e: MappingError) -> Self {
        Error::InvalidMapping(e)
    }
}
