//! IPS stream encoder

use byteorder::{BigEndian, ByteOrder};

use crate::error::FormatError;
use crate::record::{EOF_MARKER, EOF_OFFSET, HEADER_MAGIC, MAX_OFFSET, MAX_RECORD_LEN, PatchRecord};

/// Builds an IPS patch from records
///
/// Records are validated as they are added so that the finished stream
/// always decodes back to the same records.
///
/// # Examples
///
/// ```
/// use ips_patch::PatchWriter;
///
/// let mut writer = PatchWriter::new();
/// writer.standard(2, b"XYZ")?;
/// writer.run_length(8, 2, b'!')?;
/// let patch = writer.finish();
///
/// let patched = ips_patch::apply(b"AAAAAAAAAA".to_vec(), &patch)?;
/// assert_eq!(patched, b"AAXYZAAA!!");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct PatchWriter {
    buf: Vec<u8>,
    records: usize,
}

impl PatchWriter {
    /// Start a new patch with the `PATCH` header already written
    pub fn new() -> Self {
        Self {
            buf: HEADER_MAGIC.to_vec(),
            records: 0,
        }
    }

    /// Append a standard record copying `data` to `offset`
    pub fn standard(&mut self, offset: u32, data: &[u8]) -> Result<&mut Self, FormatError> {
        check_offset(offset)?;
        if data.is_empty() || data.len() > MAX_RECORD_LEN {
            return Err(FormatError::InvalidRecordLength(data.len()));
        }

        self.put_prefix(offset, data.len() as u16);
        self.buf.extend_from_slice(data);
        self.records += 1;
        Ok(self)
    }

    /// Append a run-length record filling `length` bytes at `offset`
    pub fn run_length(
        &mut self,
        offset: u32,
        length: u16,
        value: u8,
    ) -> Result<&mut Self, FormatError> {
        check_offset(offset)?;
        if length == 0 {
            return Err(FormatError::ZeroLengthRun { offset });
        }

        self.put_prefix(offset, 0);
        self.put_u16(length);
        self.buf.push(value);
        self.records += 1;
        Ok(self)
    }

    /// Append any record; `EndOfStream` is ignored since
    /// [`finish`](Self::finish) writes the marker
    pub fn record(&mut self, record: &PatchRecord) -> Result<&mut Self, FormatError> {
        match record {
            PatchRecord::Standard { offset, data } => self.standard(*offset, data),
            PatchRecord::RunLength {
                offset,
                length,
                value,
            } => self.run_length(*offset, *length, *value),
            PatchRecord::EndOfStream => Ok(self),
        }
    }

    /// Number of records written so far
    pub fn len(&self) -> usize {
        self.records
    }

    /// Check if no records were written
    pub fn is_empty(&self) -> bool {
        self.records == 0
    }

    /// Append the `EOF` marker and return the encoded patch
    pub fn finish(mut self) -> Vec<u8> {
        self.buf.extend_from_slice(EOF_MARKER);
        self.buf
    }

    fn put_prefix(&mut self, offset: u32, size: u16) {
        let mut field = [0u8; 3];
        BigEndian::write_u24(&mut field, offset);
        self.buf.extend_from_slice(&field);
        self.put_u16(size);
    }

    fn put_u16(&mut self, value: u16) {
        let mut field = [0u8; 2];
        BigEndian::write_u16(&mut field, value);
        self.buf.extend_from_slice(&field);
    }
}

impl Default for PatchWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn check_offset(offset: u32) -> Result<(), FormatError> {
    if offset > MAX_OFFSET {
        return Err(FormatError::OffsetOutOfRange(u64::from(offset)));
    }
    if offset == EOF_OFFSET {
        return Err(FormatError::OffsetCollidesWithEof);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::PatchRecordReader;

    #[test]
    fn test_empty_patch() {
        let writer = PatchWriter::new();
        assert!(writer.is_empty());
        assert_eq!(writer.finish(), b"PATCHEOF");
    }

    #[test]
    fn test_encoding_layout() {
        let mut writer = PatchWriter::new();
        writer
            .standard(0x010203, b"AB")
            .unwrap()
            .run_length(0x000010, 0x0102, 0xFF)
            .unwrap();
        assert_eq!(writer.len(), 2);
        assert_eq!(
            writer.finish(),
            b"PATCH\x01\x02\x03\x00\x02AB\x00\x00\x10\x00\x00\x01\x02\xFFEOF"
        );
    }

    #[test]
    fn test_encoding_field_limits() {
        let mut writer = PatchWriter::new();
        writer
            .standard(MAX_OFFSET, &[0xAA])
            .unwrap()
            .run_length(0, u16::MAX, 0x5A)
            .unwrap();
        let patch = writer.finish();

        assert_eq!(&patch[5..11], b"\xFF\xFF\xFF\x00\x01\xAA");
        assert_eq!(&patch[11..19], b"\x00\x00\x00\x00\x00\xFF\xFF\x5A");
        assert_eq!(&patch[19..], EOF_MARKER);
    }

    #[test]
    fn test_rejects_eof_offset() {
        let mut writer = PatchWriter::new();
        assert_eq!(
            writer.standard(EOF_OFFSET, b"x").unwrap_err(),
            FormatError::OffsetCollidesWithEof
        );
        assert_eq!(
            writer.run_length(EOF_OFFSET, 1, 0).unwrap_err(),
            FormatError::OffsetCollidesWithEof
        );
        assert!(writer.is_empty());
    }

    #[test]
    fn test_rejects_invalid_records() {
        let mut writer = PatchWriter::new();
        assert_eq!(
            writer.standard(MAX_OFFSET + 1, b"x").unwrap_err(),
            FormatError::OffsetOutOfRange(0x0100_0000)
        );
        assert_eq!(
            writer.standard(0, b"").unwrap_err(),
            FormatError::InvalidRecordLength(0)
        );
        assert_eq!(
            writer.standard(0, &vec![0; MAX_RECORD_LEN + 1]).unwrap_err(),
            FormatError::InvalidRecordLength(MAX_RECORD_LEN + 1)
        );
        assert_eq!(
            writer.run_length(3, 0, 0).unwrap_err(),
            FormatError::ZeroLengthRun { offset: 3 }
        );
    }

    #[test]
    fn test_written_records_decode() {
        let records = vec![
            PatchRecord::Standard {
                offset: MAX_OFFSET,
                data: vec![0x42; MAX_RECORD_LEN],
            },
            PatchRecord::RunLength {
                offset: EOF_OFFSET - 1,
                length: 7,
                value: 0,
            },
        ];

        let mut writer = PatchWriter::new();
        for record in &records {
            writer.record(record).unwrap();
        }
        writer.record(&PatchRecord::EndOfStream).unwrap();
        let patch = writer.finish();

        let mut reader = PatchRecordReader::new(&patch);
        reader.read_header().unwrap();
        let decoded: Vec<_> = reader.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(decoded, records);
    }
}
