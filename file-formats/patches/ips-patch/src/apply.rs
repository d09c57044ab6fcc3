//! Patch application logic
//!
//! Records are applied to the target as they are decoded. A failure part-way
//! through a patch leaves every earlier record applied: [`PatchApplier::apply_to`]
//! does not stage or roll back. Callers that need all-or-nothing semantics use
//! [`apply_atomic`], which patches a scratch copy and swaps it in on success.

use crate::buffer::PatchableBuffer;
use crate::error::{PatchError, Result};
use crate::reader::PatchRecordReader;
use crate::record::PatchRecord;

/// Summary of one patch application
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Standard records applied
    pub standard_records: usize,
    /// Run-length records applied
    pub run_length_records: usize,
    /// Total target bytes overwritten (overlaps counted twice)
    pub bytes_written: usize,
    /// Image length before patching
    pub base_len: usize,
    /// Image length after patching
    pub final_len: usize,
}

impl ApplyReport {
    /// Total records applied
    pub fn records(&self) -> usize {
        self.standard_records + self.run_length_records
    }

    /// Check if patching extended the image
    pub fn grew(&self) -> bool {
        self.final_len > self.base_len
    }
}

/// Drives a [`PatchRecordReader`] over a patch and writes each record into a
/// [`PatchableBuffer`]
#[derive(Debug)]
pub struct PatchApplier<'a> {
    reader: PatchRecordReader<'a>,
}

impl<'a> PatchApplier<'a> {
    /// Prepare to apply `patch`, checking its header
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::InvalidHeader`] if `patch` does not start with
    /// the `PATCH` magic.
    pub fn new(patch: &'a [u8]) -> Result<Self> {
        let mut reader = PatchRecordReader::new(patch);
        reader.read_header().map_err(PatchError::InvalidHeader)?;
        Ok(Self { reader })
    }

    /// Apply every record to `buffer` in place
    ///
    /// Not transactional: when a record fails to decode, the records before
    /// it remain applied to `buffer`.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::Malformed`] on the first record that fails to
    /// decode.
    pub fn apply_to(mut self, buffer: &mut PatchableBuffer) -> Result<ApplyReport> {
        let mut report = ApplyReport {
            base_len: buffer.len(),
            ..ApplyReport::default()
        };

        loop {
            let record = self.reader.next_record().map_err(PatchError::Malformed)?;
            log::trace!("{record}");

            match record {
                PatchRecord::EndOfStream => break,
                PatchRecord::Standard { offset, data } => {
                    buffer.write(offset as usize, &data);
                    report.standard_records += 1;
                    report.bytes_written += data.len();
                }
                PatchRecord::RunLength {
                    offset,
                    length,
                    value,
                } => {
                    buffer.write_fill(offset as usize, length as usize, value);
                    report.run_length_records += 1;
                    report.bytes_written += length as usize;
                }
            }
        }

        report.final_len = buffer.len();

        if self.reader.remaining() > 0 {
            log::debug!(
                "Ignoring {} trailing byte(s) after EOF marker",
                self.reader.remaining()
            );
        }
        log::debug!(
            "Applied {} record(s) ({} standard, {} rle): {} -> {} bytes",
            report.records(),
            report.standard_records,
            report.run_length_records,
            report.base_len,
            report.final_len
        );

        Ok(report)
    }

    /// Apply every record to `base_image` and return the patched image
    pub fn apply(self, base_image: Vec<u8>) -> Result<(Vec<u8>, ApplyReport)> {
        let mut buffer = PatchableBuffer::new(base_image);
        let report = self.apply_to(&mut buffer)?;
        Ok((buffer.into_bytes(), report))
    }
}

/// Apply an IPS patch to a base image
///
/// # Examples
///
/// ```
/// let base = b"AAAAAAAAAA".to_vec();
/// let patch = b"PATCH\x00\x00\x02\x00\x03XYZEOF";
///
/// let patched = ips_patch::apply(base, patch)?;
/// assert_eq!(patched, b"AAXYZAAAAA");
/// # Ok::<(), ips_patch::PatchError>(())
/// ```
///
/// # Errors
///
/// - [`PatchError::InvalidHeader`] if the `PATCH` magic is missing
/// - [`PatchError::Malformed`] if a record is truncated or invalid
pub fn apply(base_image: Vec<u8>, patch: &[u8]) -> Result<Vec<u8>> {
    apply_with_report(base_image, patch).map(|(patched, _)| patched)
}

/// Like [`apply`], also returning an [`ApplyReport`]
pub fn apply_with_report(base_image: Vec<u8>, patch: &[u8]) -> Result<(Vec<u8>, ApplyReport)> {
    PatchApplier::new(patch)?.apply(base_image)
}

/// Apply `patch` to `buffer` only if every record applies
///
/// The patch is applied to a copy of `buffer`; the copy replaces `buffer`
/// once the `EOF` marker is reached. On error `buffer` is left untouched.
pub fn apply_atomic(buffer: &mut PatchableBuffer, patch: &[u8]) -> Result<ApplyReport> {
    let applier = PatchApplier::new(patch)?;
    let mut scratch = buffer.clone();
    let report = applier.apply_to(&mut scratch)?;
    *buffer = scratch;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatError;

    #[test]
    fn test_standard_record_scenario() {
        let patched = apply(b"AAAAAAAAAA".to_vec(), b"PATCH\x00\x00\x02\x00\x03XYZEOF").unwrap();
        assert_eq!(patched, b"AAXYZAAAAA");
    }

    #[test]
    fn test_run_length_record_scenario() {
        let patched = apply(
            b"AAAAAAAAAA".to_vec(),
            b"PATCH\x00\x00\x02\x00\x00\x00\x03ZEOF",
        )
        .unwrap();
        assert_eq!(patched, b"AAZZZAAAAA");
    }

    #[test]
    fn test_empty_patch_is_identity() {
        let base = vec![0x00, 0x01, 0xFE, 0xFF];
        let (patched, report) = apply_with_report(base.clone(), b"PATCHEOF").unwrap();
        assert_eq!(patched, base);
        assert_eq!(report.records(), 0);
        assert!(!report.grew());
    }

    #[test]
    fn test_report_counts() {
        let patch = b"PATCH\x00\x00\x00\x00\x02AB\x00\x00\x08\x00\x00\x00\x04\xEEEOF";
        let (patched, report) = apply_with_report(vec![0; 4], patch).unwrap();
        assert_eq!(patched, b"AB\0\0\0\0\0\0\xEE\xEE\xEE\xEE");
        assert_eq!(
            report,
            ApplyReport {
                standard_records: 1,
                run_length_records: 1,
                bytes_written: 6,
                base_len: 4,
                final_len: 12,
            }
        );
        assert!(report.grew());
    }

    #[test]
    fn test_invalid_header() {
        let err = apply(b"ROM".to_vec(), b"IPS32\x00\x00\x00\x00\x01XEOF").unwrap_err();
        assert!(matches!(
            err,
            PatchError::InvalidHeader(FormatError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn test_zero_length_run_is_malformed() {
        let err = apply(vec![0; 4], b"PATCH\x00\x00\x01\x00\x00\x00\x00\x41EOF").unwrap_err();
        assert!(matches!(
            err,
            PatchError::Malformed(FormatError::ZeroLengthRun { offset: 1 })
        ));
    }

    #[test]
    fn test_failure_keeps_earlier_records() {
        let patch = b"PATCH\x00\x00\x00\x00\x01X\x00\x00\x02\x00\x05YY";
        let mut buffer = PatchableBuffer::new(b"....".to_vec());

        let err = PatchApplier::new(patch)
            .unwrap()
            .apply_to(&mut buffer)
            .unwrap_err();

        assert!(matches!(
            err,
            PatchError::Malformed(FormatError::UnexpectedEof { .. })
        ));
        assert_eq!(buffer.as_slice(), b"X...");
    }

    #[test]
    fn test_atomic_failure_leaves_buffer_untouched() {
        let patch = b"PATCH\x00\x00\x00\x00\x01X\x00\x00\x02\x00\x05YY";
        let mut buffer = PatchableBuffer::new(b"....".to_vec());

        assert!(apply_atomic(&mut buffer, patch).is_err());
        assert_eq!(buffer.as_slice(), b"....");

        let report = apply_atomic(&mut buffer, b"PATCH\x00\x00\x00\x00\x01XEOF").unwrap();
        assert_eq!(report.standard_records, 1);
        assert_eq!(buffer.as_slice(), b"X...");
    }

    #[test]
    fn test_later_records_overwrite_earlier_ones() {
        let patch = b"PATCH\x00\x00\x00\x00\x04AAAA\x00\x00\x01\x00\x00\x00\x02BEOF";
        assert_eq!(apply(Vec::new(), patch).unwrap(), b"ABBA");
    }
}
