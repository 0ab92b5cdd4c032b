//! Block identifier type.

use std::fmt;

use super::config::BLOCK_SIZE;

/// Identifies one block of a named file.
///
/// A `BlockId` is only an address: it does not hold the block's bytes,
/// that is the job of a [`Page`](crate::Page). Block numbers are zero-based
/// and block N starts at byte `N × BLOCK_SIZE` of the file.
///
/// # Example
/// ```
/// use blockfile::BlockId;
///
/// let block = BlockId::new("students.tbl", 3);
/// assert_eq!(block.file_name(), "students.tbl");
/// assert_eq!(block.number(), 3);
/// assert_eq!(block.to_string(), "[file students.tbl, block 3]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId {
    file_name: String,
    number: u64,
}

impl BlockId {
    /// Create a new BlockId.
    pub fn new(file_name: impl Into<String>, number: u64) -> Self {
        Self {
            file_name: file_name.into(),
            number,
        }
    }

    /// Name of the file the block lives in.
    #[inline]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Position of the block within its file.
    #[inline]
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Byte offset of the first byte of this block.
    #[inline]
    pub fn byte_offset(&self) -> u64 {
        self.number * BLOCK_SIZE as u64
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[file {}, block {}]", self.file_name, self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_id_new() {
        let blk = BlockId::new("test.dat", 42);
        assert_eq!(blk.file_name(), "test.dat");
        assert_eq!(blk.number(), 42);
    }

    #[test]
    fn test_block_id_equality() {
        assert_eq!(BlockId::new("a", 1), BlockId::new("a", 1));
        assert_ne!(BlockId::new("a", 1), BlockId::new("b", 1));
        assert_ne!(BlockId::new("a", 1), BlockId::new("a", 2));
    }

    #[test]
    fn test_block_id_ordering() {
        assert!(BlockId::new("a", 1) < BlockId::new("a", 2));
        assert!(BlockId::new("a", 9) < BlockId::new("b", 0));
    }

    #[test]
    fn test_block_id_byte_offset() {
        assert_eq!(BlockId::new("a", 0).byte_offset(), 0);
        assert_eq!(BlockId::new("a", 3).byte_offset(), 3 * 4096);
    }

    #[test]
    fn test_block_id_display() {
        assert_eq!(
            format!("{}", BlockId::new("test.dat", 7)),
            "[file test.dat, block 7]"
        );
    }
}
