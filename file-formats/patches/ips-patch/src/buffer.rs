//! Growable target image for patch application

/// In-memory image that records are written into
///
/// Writes past the current end extend the image; any gap between the old
/// end and the write offset is zero-filled. The image never shrinks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchableBuffer {
    data: Vec<u8>,
}

impl PatchableBuffer {
    /// Wrap the base image
    pub fn new(initial: Vec<u8>) -> Self {
        Self { data: initial }
    }

    /// Overwrite `bytes.len()` bytes starting at `offset`
    ///
    /// # Examples
    ///
    /// ```
    /// use ips_patch::PatchableBuffer;
    ///
    /// let mut buffer = PatchableBuffer::new(b"AB".to_vec());
    /// buffer.write(4, b"CD");
    /// assert_eq!(buffer.as_slice(), b"AB\0\0CD");
    /// ```
    pub fn write(&mut self, offset: usize, bytes: &[u8]) {
        let end = offset + bytes.len();
        self.ensure_len(end);
        self.data[offset..end].copy_from_slice(bytes);
    }

    /// Overwrite `length` bytes starting at `offset` with `value`
    pub fn write_fill(&mut self, offset: usize, length: usize, value: u8) {
        let end = offset + length;
        self.ensure_len(end);
        self.data[offset..end].fill(value);
    }

    /// Current image length
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the image is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// View the current image
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Take the final image
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    fn ensure_len(&mut self, len: usize) {
        if len > self.data.len() {
            self.data.resize(len, 0);
        }
    }
}

impl From<Vec<u8>> for PatchableBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl AsRef<[u8]> for PatchableBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}
