//! Error types for the bookcipher library.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors produced by the bookcipher library.
#[derive(Debug)]
pub enum BookCipherError {
    /// A source text or codebook file could not be read or written.
    Io {
        /// Path of the file being accessed.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// A persisted codebook could not be serialized or parsed.
    Serialization(serde_json::Error),
    /// A decoded coordinate points outside the corpus.
    CoordinateNotFound(String),
    /// A string is not a `page-line-position` coordinate.
    MalformedCoordinate(String),
    /// A persisted reverse codebook has gaps in its page or line numbering.
    InvalidCorpus(String),
    /// Line or page capacity is zero.
    InvalidCapacity,
    /// A menu selection was not one of the offered options.
    InvalidSelection {
        /// The text that was entered.
        input: String,
        /// Whether the text was a number at all.
        numeric: bool,
    },
}

impl fmt::Display for BookCipherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookCipherError::Io { path, source } => {
                write!(f, "I/O error on {}: {}", path.display(), source)
            }
            BookCipherError::Serialization(err) => {
                write!(f, "Codebook serialization failed: {}", err)
            }
            BookCipherError::CoordinateNotFound(coordinate) => {
                write!(f, "Coordinate {} does not exist in the corpus", coordinate)
            }
            BookCipherError::MalformedCoordinate(text) => {
                write!(f, "'{}' is not a page-line-position coordinate", text)
            }
            BookCipherError::InvalidCorpus(reason) => {
                write!(f, "Reverse codebook is not a valid corpus: {}", reason)
            }
            BookCipherError::InvalidCapacity => {
                write!(f, "Line and page capacity must be greater than zero")
            }
            BookCipherError::InvalidSelection { numeric: true, .. } => {
                write!(f, "Invalid selection. Please choose 1, 2, or 3.")
            }
            BookCipherError::InvalidSelection { numeric: false, .. } => {
                write!(f, "Improper selection. Please enter a number.")
            }
        }
    }
}

impl std::error::Error for BookCipherError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BookCipherError::Io { source, .. } => Some(source),
            BookCipherError::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for BookCipherError {
    fn from(err: serde_json::Error) -> Self {
        BookCipherError::Serialization(err)
    }
}

impl BookCipherError {
    /// Wraps an I/O failure together with the path that caused it.
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        BookCipherError::Io {
            path: path.into(),
            source,
        }
    }
}
