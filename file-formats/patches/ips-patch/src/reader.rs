//! Sequential decoder for IPS record streams

use byteorder::{BigEndian, ByteOrder};

use crate::error::FormatError;
use crate::record::{EOF_MARKER, HEADER_MAGIC, PatchRecord};

/// Decodes IPS records from an in-memory patch
///
/// The reader keeps a single cursor into the patch bytes. The header must be
/// checked with [`read_header`](Self::read_header) before the first call to
/// [`next_record`](Self::next_record).
///
/// # Examples
///
/// ```
/// use ips_patch::{PatchRecord, PatchRecordReader};
///
/// let patch = b"PATCH\x00\x00\x02\x00\x01ZEOF";
/// let mut reader = PatchRecordReader::new(patch);
/// reader.read_header()?;
///
/// assert_eq!(
///     reader.next_record()?,
///     PatchRecord::Standard { offset: 2, data: b"Z".to_vec() }
/// );
/// assert_eq!(reader.next_record()?, PatchRecord::EndOfStream);
/// # Ok::<(), ips_patch::FormatError>(())
/// ```
#[derive(Debug, Clone)]
pub struct PatchRecordReader<'a> {
    data: &'a [u8],
    position: usize,
    finished: bool,
}

impl<'a> PatchRecordReader<'a> {
    /// Create a reader positioned at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            finished: false,
        }
    }

    /// Check the 5-byte `PATCH` magic
    ///
    /// A stream shorter than the magic also fails with `InvalidHeader`,
    /// carrying whatever bytes were present.
    pub fn read_header(&mut self) -> Result<(), FormatError> {
        let available = self.remaining().min(HEADER_MAGIC.len());
        let found = &self.data[self.position..self.position + available];
        if found != HEADER_MAGIC {
            return Err(FormatError::InvalidHeader {
                found: found.to_vec(),
            });
        }

        self.position += HEADER_MAGIC.len();
        log::debug!("IPS header found, {} byte(s) of records follow", self.remaining());
        Ok(())
    }

    /// Decode the next record
    ///
    /// The `EOF` sentinel is detected by peeking at the next three bytes
    /// before they are consumed as an offset. After the sentinel has been
    /// returned the reader is finished and further calls fail with
    /// [`FormatError::AfterEndOfStream`].
    pub fn next_record(&mut self) -> Result<PatchRecord, FormatError> {
        if self.finished {
            return Err(FormatError::AfterEndOfStream);
        }

        if self.peek(EOF_MARKER.len())? == EOF_MARKER {
            self.position += EOF_MARKER.len();
            self.finished = true;
            return Ok(PatchRecord::EndOfStream);
        }

        let offset = BigEndian::read_u24(self.take(3)?);
        let size = BigEndian::read_u16(self.take(2)?);

        if size == 0 {
            let length = BigEndian::read_u16(self.take(2)?);
            let value = self.take(1)?[0];
            if length == 0 {
                return Err(FormatError::ZeroLengthRun { offset });
            }
            return Ok(PatchRecord::RunLength {
                offset,
                length,
                value,
            });
        }

        let data = self.take(size as usize)?.to_vec();
        Ok(PatchRecord::Standard { offset, data })
    }

    /// Consume the reader into an iterator over its data records
    ///
    /// The iterator stops after the `EOF` sentinel (which is not yielded) or
    /// after the first error.
    pub fn records(self) -> Records<'a> {
        Records {
            reader: self,
            done: false,
        }
    }

    /// Current cursor position
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes left after the cursor
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Check if the `EOF` sentinel has been consumed
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn peek(&self, len: usize) -> Result<&'a [u8], FormatError> {
        let remaining = self.remaining();
        if remaining < len {
            return Err(FormatError::UnexpectedEof {
                position: self.position,
                needed: len - remaining,
            });
        }
        Ok(&self.data[self.position..self.position + len])
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], FormatError> {
        let bytes = self.peek(len)?;
        self.position += len;
        Ok(bytes)
    }
}

/// Iterator over the data records of a patch, see [`PatchRecordReader::records`]
#[derive(Debug, Clone)]
pub struct Records<'a> {
    reader: PatchRecordReader<'a>,
    done: bool,
}

impl<'a> Records<'a> {
    /// The underlying reader, e.g. to inspect trailing bytes once exhausted
    pub fn reader(&self) -> &PatchRecordReader<'a> {
        &self.reader
    }
}

impl Iterator for Records<'_> {
    type Item = Result<PatchRecord, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.reader.next_record() {
            Ok(PatchRecord::EndOfStream) => {
                self.done = true;
                None
            }
            Ok(record) => Some(Ok(record)),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for Records<'_> {}
