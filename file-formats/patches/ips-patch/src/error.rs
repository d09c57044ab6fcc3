//! Error types for IPS patch handling

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for patch operations
pub type Result<T> = std::result::Result<T, PatchError>;

/// Errors raised while decoding or encoding the IPS byte layout
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The stream does not start with the `PATCH` magic
    #[error("Invalid patch header: expected 'PATCH', found '{}'", String::from_utf8_lossy(.found))]
    InvalidHeader {
        /// The bytes found where the magic was expected
        found: Vec<u8>,
    },

    /// A record runs past the end of the stream
    #[error("Unexpected end of patch data at byte {position}: {needed} more byte(s) required")]
    UnexpectedEof {
        /// Cursor position where decoding stopped
        position: usize,
        /// Number of bytes the current field needed beyond what was left
        needed: usize,
    },

    /// A run-length record declares a run of zero bytes
    #[error("Run-length record at offset 0x{offset:06X} has zero length")]
    ZeroLengthRun {
        /// Target offset of the offending record
        offset: u32,
    },

    /// A record was requested after the `EOF` sentinel was consumed
    #[error("Patch stream already reached its EOF marker")]
    AfterEndOfStream,

    /// Offset does not fit into the 24-bit field
    #[error("Offset 0x{0:X} does not fit into 24 bits")]
    OffsetOutOfRange(u64),

    /// Offset would be encoded as the `EOF` sentinel
    #[error("Offset 0x454F46 cannot be encoded: it reads back as the EOF marker")]
    OffsetCollidesWithEof,

    /// Standard record payload is empty or longer than 0xFFFF bytes
    #[error("Invalid record length {0}: standard records carry 1..=65535 bytes")]
    InvalidRecordLength(usize),
}

/// Errors raised by patch application and its file-level helpers
#[derive(Error, Debug)]
pub enum PatchError {
    /// The patch stream failed the header check; nothing was applied
    #[error("Invalid patch file: {0}")]
    InvalidHeader(#[source] FormatError),

    /// A record failed to decode while applying
    #[error("Malformed patch: {0}")]
    Malformed(#[source] FormatError),

    /// An input file could not be read
    #[error("Cannot read {}: {source}", .path.display())]
    SourceUnreadable {
        /// Path of the input
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The output file could not be written
    #[error("Cannot write {}: {source}", .path.display())]
    DestinationUnwritable {
        /// Path of the output
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
}

impl PatchError {
    /// Create a SourceUnreadable error
    pub fn source_unreadable<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        PatchError::SourceUnreadable {
            path: path.into(),
            source,
        }
    }

    /// Create a DestinationUnwritable error
    pub fn destination_unwritable<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        PatchError::DestinationUnwritable {
            path: path.into(),
            source,
        }
    }

    /// The decode error behind this failure, if any
    pub fn format_error(&self) -> Option<&FormatError> {
        match self {
            PatchError::InvalidHeader(e) | PatchError::Malformed(e) => Some(e),
            _ => None,
        }
    }

    /// Check if the failure came from file I/O rather than the patch contents
    pub fn is_io_error(&self) -> bool {
        matches!(
            self,
            PatchError::SourceUnreadable { .. } | PatchError::DestinationUnwritable { .. }
        )
    }
}

impl From<FormatError> for PatchError {
    fn from(error: FormatError) -> Self {
        match error {
            FormatError::InvalidHeader { .. } => PatchError::InvalidHeader(error),
            other => PatchError::Malformed(other),
        }
    }
}
