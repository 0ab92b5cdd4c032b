//! PageBuffer - one block's worth of bytes plus the value codec.
//!
//! Encodings (all little-endian):
//! ```text
//! int:    [i32; 4 bytes]
//! bytes:  [len: i32][len bytes]
//! string: [len: i32][len bytes of UTF-8]
//! ```
//! `len` is the byte length of the payload, not a character count.

use crate::common::config::{BLOCK_SIZE, INT_SIZE};

/// A block-sized byte array (4KB, 4KB-aligned).
///
/// The typed accessors read and write at caller-chosen offsets. The buffer
/// records no layout of its own: reading an offset that was never written
/// with the matching setter returns garbage.
///
/// # Panics
/// Every accessor panics if the value would extend past the end of the
/// buffer.
///
/// # Example
/// ```
/// use blockfile::PageBuffer;
///
/// let mut buf = PageBuffer::new();
/// buf.set_int(0, -7);
/// buf.set_string(4, "hello");
/// assert_eq!(buf.get_int(0), -7);
/// assert_eq!(buf.get_string(4), "hello");
/// ```
#[repr(align(4096))]
pub struct PageBuffer {
    data: [u8; BLOCK_SIZE],
}

impl PageBuffer {
    /// A zero-filled block.
    #[inline]
    pub fn new() -> Self {
        Self {
            data: [0u8; BLOCK_SIZE],
        }
    }

    /// The raw block bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// The raw block bytes, for loading from disk.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Zero every byte of the block.
    pub fn reset(&mut self) {
        self.data.fill(0);
    }

    /// Decode the `i32` at `offset`.
    pub fn get_int(&self, offset: usize) -> i32 {
        let mut bytes = [0u8; INT_SIZE];
        bytes.copy_from_slice(&self.data[offset..offset + INT_SIZE]);
        i32::from_le_bytes(bytes)
    }

    /// Encode `value` at `offset`.
    pub fn set_int(&mut self, offset: usize, value: i32) {
        self.data[offset..offset + INT_SIZE].copy_from_slice(&value.to_le_bytes());
    }

    /// Decode the length-prefixed blob at `offset`.
    pub fn get_bytes(&self, offset: usize) -> &[u8] {
        // A negative prefix is garbage; widening it keeps the slice out of range.
        let len = self.get_int(offset) as u32 as usize;
        let start = offset + INT_SIZE;
        &self.data[start..start + len]
    }

    /// Encode `value` at `offset` as a length prefix followed by its bytes.
    pub fn set_bytes(&mut self, offset: usize, value: &[u8]) {
        let start = offset + INT_SIZE;
        assert!(
            start + value.len() <= BLOCK_SIZE,
            "{} bytes at offset {} overflow the page",
            value.len(),
            offset
        );
        self.set_int(offset, value.len() as i32);
        self.data[start..start + value.len()].copy_from_slice(value);
    }

    /// Decode the string at `offset`.
    ///
    /// Invalid UTF-8 is replaced rather than rejected.
    pub fn get_string(&self, offset: usize) -> String {
        String::from_utf8_lossy(self.get_bytes(offset)).into_owned()
    }

    /// Encode `value` at `offset` as its UTF-8 bytes.
    pub fn set_string(&mut self, offset: usize, value: &str) {
        self.set_bytes(offset, value.as_bytes());
    }
}

impl Default for PageBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// Tests snapshot buffers; library code copies blocks through `as_slice`.
#[cfg(test)]
impl Clone for PageBuffer {
    fn clone(&self) -> Self {
        Self { data: self.data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_size_and_alignment() {
        assert_eq!(std::mem::size_of::<PageBuffer>(), BLOCK_SIZE);
        assert_eq!(std::mem::align_of::<PageBuffer>(), 4096);
    }

    #[test]
    fn test_buffer_new_is_zeroed() {
        let buf = PageBuffer::new();
        assert!(buf.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_buffer_reset() {
        let mut buf = PageBuffer::new();
        buf.as_mut_slice()[0] = 0xFF;
        buf.as_mut_slice()[100] = 0xAB;

        buf.reset();

        assert_eq!(buf.as_slice()[0], 0);
        assert_eq!(buf.as_slice()[100], 0);
    }

    #[test]
    fn test_int_byte_layout() {
        let mut buf = PageBuffer::new();
        buf.set_int(8, 0x04030201);

        assert_eq!(&buf.as_slice()[8..12], &[0x01, 0x02, 0x03, 0x04]);
        assert_eq!(buf.get_int(8), 0x04030201);
    }

    #[test]
    fn test_int_extremes() {
        let mut buf = PageBuffer::new();
        buf.set_int(0, i32::MIN);
        buf.set_int(BLOCK_SIZE - INT_SIZE, i32::MAX);

        assert_eq!(buf.get_int(0), i32::MIN);
        assert_eq!(buf.get_int(BLOCK_SIZE - INT_SIZE), i32::MAX);
        assert_eq!(&buf.as_slice()[..4], &[0x00, 0x00, 0x00, 0x80]);
    }

    #[test]
    fn test_string_prefix_is_byte_length() {
        let mut buf = PageBuffer::new();
        // 2 characters, 5 bytes
        buf.set_string(0, "é€");

        assert_eq!(buf.get_int(0), 5);
        assert_eq!(buf.get_string(0), "é€");
    }

    #[test]
    fn test_empty_string() {
        let mut buf = PageBuffer::new();
        buf.set_int(0, 99);
        buf.set_string(0, "");

        assert_eq!(buf.get_int(0), 0);
        assert_eq!(buf.get_string(0), "");
    }

    #[test]
    fn test_bytes_at_end_of_buffer() {
        let mut buf = PageBuffer::new();
        let offset = BLOCK_SIZE - INT_SIZE - 3;
        buf.set_bytes(offset, &[7, 8, 9]);

        assert_eq!(buf.get_bytes(offset), &[7, 8, 9]);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let mut buf = PageBuffer::new();
        buf.set_bytes(0, &[b'a', 0xFF, b'b']);

        assert_eq!(buf.get_string(0), "a\u{FFFD}b");
    }

    #[test]
    #[should_panic]
    fn test_int_past_end_panics() {
        let buf = PageBuffer::new();
        buf.get_int(BLOCK_SIZE - 2);
    }

    #[test]
    #[should_panic(expected = "overflow the page")]
    fn test_bytes_past_end_panics() {
        let mut buf = PageBuffer::new();
        buf.set_bytes(BLOCK_SIZE - 6, &[0; 3]);
    }

    #[test]
    fn test_buffer_clone_is_independent() {
        let mut buf = PageBuffer::new();
        buf.set_int(0, 42);

        let cloned = buf.clone();
        buf.set_int(0, 7);
        assert_eq!(cloned.get_int(0), 42);
    }
}
