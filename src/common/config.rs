//! Configuration constants for blockfile.

/// Size of a block in bytes (4KB).
///
/// Every file managed by a [`FileManager`](crate::FileManager) is a sequence of
/// blocks of exactly this size, and every [`Page`](crate::Page) buffer holds
/// exactly one block.
///
/// # File Layout
/// Block N of a file starts at byte offset `N × BLOCK_SIZE`. There is no file
/// header, magic number, or checksum.
pub const BLOCK_SIZE: usize = 4096;

/// Encoded size of an integer in bytes (little-endian `i32`).
pub const INT_SIZE: usize = 4;

/// Worst-case number of bytes a single character occupies in UTF-8.
pub const MAX_BYTES_PER_CHAR: usize = 4;
