//! IPS record model and format constants
//!
//! An IPS stream is the 5-byte `PATCH` magic followed by records and the
//! 3-byte `EOF` sentinel. All integers are big-endian:
//!
//! ```text
//! standard:   offset:u24  size:u16 (!= 0)  data:[u8; size]
//! run-length: offset:u24  size:u16 (== 0)  length:u16 (!= 0)  value:u8
//! ```

use std::fmt;

/// Magic bytes at the start of every IPS stream
pub const HEADER_MAGIC: &[u8; 5] = b"PATCH";

/// Sentinel that terminates the record list
pub const EOF_MARKER: &[u8; 3] = b"EOF";

/// Largest offset representable in the 24-bit offset field
pub const MAX_OFFSET: u32 = 0x00FF_FFFF;

/// Offset whose big-endian encoding is the `EOF` sentinel
pub const EOF_OFFSET: u32 = 0x0045_4F46;

/// Largest payload of a standard record, and longest run
pub const MAX_RECORD_LEN: usize = 0xFFFF;

/// Size of the offset + size fields shared by both record layouts
pub const RECORD_PREFIX_LEN: usize = 5;

/// Size of a run-length record on disk
pub const RUN_LENGTH_RECORD_LEN: usize = RECORD_PREFIX_LEN + 3;

/// A single decoded IPS record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchRecord {
    /// Copy `data` into the target starting at `offset`
    Standard {
        /// Target offset (24-bit)
        offset: u32,
        /// Literal payload, 1..=0xFFFF bytes
        data: Vec<u8>,
    },
    /// Write `length` copies of `value` starting at `offset`
    RunLength {
        /// Target offset (24-bit)
        offset: u32,
        /// Number of bytes to fill, never zero
        length: u16,
        /// Fill value
        value: u8,
    },
    /// The `EOF` sentinel
    EndOfStream,
}

/// Record type without its payload, for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Literal copy
    Standard,
    /// Run-length fill
    RunLength,
    /// End-of-stream sentinel
    EndOfStream,
}

impl PatchRecord {
    /// Target offset, or `None` for the sentinel
    pub fn offset(&self) -> Option<u32> {
        match self {
            PatchRecord::Standard { offset, .. } | PatchRecord::RunLength { offset, .. } => {
                Some(*offset)
            }
            PatchRecord::EndOfStream => None,
        }
    }

    /// Number of target bytes this record overwrites
    pub fn written_len(&self) -> usize {
        match self {
            PatchRecord::Standard { data, .. } => data.len(),
            PatchRecord::RunLength { length, .. } => *length as usize,
            PatchRecord::EndOfStream => 0,
        }
    }

    /// One past the last target byte written, or `None` for the sentinel
    pub fn end(&self) -> Option<usize> {
        self.offset()
            .map(|offset| offset as usize + self.written_len())
    }

    /// Size of this record in the patch stream
    pub fn encoded_len(&self) -> usize {
        match self {
            PatchRecord::Standard { data, .. } => RECORD_PREFIX_LEN + data.len(),
            PatchRecord::RunLength { .. } => RUN_LENGTH_RECORD_LEN,
            PatchRecord::EndOfStream => EOF_MARKER.len(),
        }
    }

    /// The record type
    pub fn kind(&self) -> RecordKind {
        match self {
            PatchRecord::Standard { .. } => RecordKind::Standard,
            PatchRecord::RunLength { .. } => RecordKind::RunLength,
            PatchRecord::EndOfStream => RecordKind::EndOfStream,
        }
    }

    /// Check if this is the end-of-stream sentinel
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, PatchRecord::EndOfStream)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Standard => write!(f, "standard"),
            RecordKind::RunLength => write!(f, "rle"),
            RecordKind::EndOfStream => write!(f, "eof"),
        }
    }
}

impl fmt::Display for PatchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchRecord::Standard { offset, data } => {
                write!(f, "standard @ 0x{offset:06X}: {} byte(s)", data.len())
            }
            PatchRecord::RunLength {
                offset,
                length,
                value,
            } => write!(f, "rle @ 0x{offset:06X}: {length} x 0x{value:02X}"),
            PatchRecord::EndOfStream => write!(f, "EOF"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eof_offset_matches_marker() {
        let bytes = EOF_OFFSET.to_be_bytes();
        assert_eq!(&bytes[1..], EOF_MARKER);
    }

    #[test]
    fn test_record_extent() {
        let standard = PatchRecord::Standard {
            offset: 0x10,
            data: vec![1, 2, 3],
        };
        assert_eq!(standard.offset(), Some(0x10));
        assert_eq!(standard.written_len(), 3);
        assert_eq!(standard.end(), Some(0x13));
        assert_eq!(standard.encoded_len(), 8);

        let rle = PatchRecord::RunLength {
            offset: MAX_OFFSET,
            length: 0xFFFF,
            value: 0xAA,
        };
        assert_eq!(rle.end(), Some(MAX_OFFSET as usize + 0xFFFF));
        assert_eq!(rle.encoded_len(), RUN_LENGTH_RECORD_LEN);

        assert_eq!(PatchRecord::EndOfStream.end(), None);
        assert_eq!(PatchRecord::EndOfStream.written_len(), 0);
        assert!(PatchRecord::EndOfStream.is_end_of_stream());
    }

    #[test]
    fn test_display() {
        let rle = PatchRecord::RunLength {
            offset: 2,
            length: 3,
            value: b'Z',
        };
        assert_eq!(rle.to_string(), "rle @ 0x000002: 3 x 0x5A");
        assert_eq!(rle.kind().to_string(), "rle");
    }
}
