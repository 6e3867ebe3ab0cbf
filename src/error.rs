//! Custom error types for mail-store.

use std::fmt;
use std::io;

/// Main error type for mail store operations.
#[derive(Debug)]
pub enum Error {
    /// I/O errors (snapshot file, network)
    Io(io::Error),
    /// A snapshot exists but could not be parsed
    DataCorruption(String),
    /// The record set could not be serialized
    Encode(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::DataCorruption(msg) => write!(f, "corrupt mail snapshot: {msg}"),
            Self::Encode(msg) => write!(f, "encode error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<Error> for io::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::Io(io_err) => io_err,
            other => Self::other(other.to_string()),
        }
    }
}

/// Result type alias for mail-store operations.
pub type Result<T> = std::result::Result<T, Error>;
