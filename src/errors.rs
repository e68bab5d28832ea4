/*!
 * Error types for subforge.
 *
 * Every library operation returns a `SubtitleError` carrying enough context
 * (format, path, offending literal) to be logged or shown to a user as-is,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias for library results
pub type SubtitleResult<T> = Result<T, SubtitleError>;

/// Broad category of a failure, independent of the concrete variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing, unreadable or unwritable file
    Io,
    /// Structural problem in the subtitle content
    Format,
    /// Unknown theme or unsupported format name
    NotFound,
    /// Bad or empty caller-supplied argument
    InvalidInput,
}

/// Errors that can occur during subtitle parsing, conversion and styling
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// File could not be read or written
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File the operation was working on
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// A time literal does not match the format's syntax
    #[error("Invalid {format} timestamp: '{value}'")]
    InvalidTimestamp {
        /// Format whose syntax was expected
        format: &'static str,
        /// Offending literal
        value: String,
    },

    /// A required header or section marker is absent
    #[error("Missing {format} signature: expected '{expected}'")]
    MissingSignature {
        /// Format being parsed
        format: &'static str,
        /// Marker that was expected
        expected: &'static str,
    },

    /// A line could not be interpreted
    #[error("Malformed {format} content at line {line}: {message}")]
    Malformed {
        /// Format being parsed
        format: &'static str,
        /// 1-based line number
        line: usize,
        /// What was wrong with it
        message: String,
    },

    /// An entry ends before it starts
    #[error("Invalid time range at line {line}: end {end_ms}ms is before start {start_ms}ms")]
    InvalidTimeRange {
        /// 1-based line number of the timing line
        line: usize,
        /// Parsed start time
        start_ms: u64,
        /// Parsed end time
        end_ms: u64,
    },

    /// Format name or file extension maps to no known format
    #[error("Unsupported subtitle format: {0}")]
    UnsupportedFormat(String),

    /// Theme name is not in the catalogue
    #[error("Theme not found: {0}")]
    ThemeNotFound(String),

    /// Caller supplied an empty or unparseable argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl SubtitleError {
    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } => ErrorKind::Io,
            Self::InvalidTimestamp { .. }
            | Self::MissingSignature { .. }
            | Self::Malformed { .. }
            | Self::InvalidTimeRange { .. } => ErrorKind::Format,
            Self::UnsupportedFormat(_) | Self::ThemeNotFound(_) => ErrorKind::NotFound,
            Self::InvalidArgument(_) => ErrorKind::InvalidInput,
        }
    }
}
