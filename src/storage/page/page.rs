//! Page - an in-memory copy of one block, bound to a file manager.
//!
//! A [`Page`] owns a [`PageBuffer`] and a shared handle to the
//! [`FileManager`] that moves it to and from disk. Callers fill it with the
//! typed setters, persist it with [`write`](Page::write) or
//! [`append`](Page::append), and load it back with [`read`](Page::read).

use std::sync::Arc;

use parking_lot::RwLock;

use crate::common::config::{BLOCK_SIZE, INT_SIZE, MAX_BYTES_PER_CHAR};
use crate::common::{BlockId, Error, Result};
use crate::storage::file_manager::FileManager;

use super::buffer::PageBuffer;

/// A block-sized buffer with typed accessors and block I/O.
///
/// # Thread Safety
/// The buffer sits behind a `RwLock`:
/// - `get_*` take the read lock and may run in parallel
/// - `set_*`, `read`, `write`, and `append` take the write lock
///
/// Separate pages never block each other. Two pages writing the same block
/// are ordered by the [`FileManager`], not by the pages.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use blockfile::{FileManager, Page};
///
/// let fm = Arc::new(FileManager::new("data").unwrap());
/// let page = Page::new(Arc::clone(&fm));
/// page.set_int(0, 123);
/// let block = page.append("test.dat").unwrap();
///
/// let other = Page::new(fm);
/// other.read(&block).unwrap();
/// assert_eq!(other.get_int(0), 123);
/// ```
pub struct Page {
    buffer: RwLock<Box<PageBuffer>>,
    file_manager: Arc<FileManager>,
}

impl Page {
    /// Create a zeroed page bound to `file_manager`.
    pub fn new(file_manager: Arc<FileManager>) -> Self {
        Self {
            buffer: RwLock::new(Box::default()),
            file_manager,
        }
    }

    /// Create a page whose first bytes are a copy of `bytes`.
    ///
    /// # Errors
    /// Returns `Error::BufferSize` if `bytes` is longer than a block.
    pub fn from_bytes(file_manager: Arc<FileManager>, bytes: &[u8]) -> Result<Self> {
        if bytes.len() > BLOCK_SIZE {
            return Err(Error::BufferSize {
                expected: BLOCK_SIZE,
                actual: bytes.len(),
            });
        }
        let page = Self::new(file_manager);
        page.buffer.write().as_mut_slice()[..bytes.len()].copy_from_slice(bytes);
        Ok(page)
    }

    /// Worst-case bytes needed to store a string of `char_count` characters.
    ///
    /// `set_string` records the exact encoded length, which never exceeds
    /// this, so a slot of this width always fits.
    pub const fn str_size(char_count: usize) -> usize {
        INT_SIZE + char_count * MAX_BYTES_PER_CHAR
    }

    /// Load the contents of `block` into this page.
    ///
    /// Returns the number of bytes read. When the block lies past the end of
    /// the file the count is short and the remaining bytes keep their old
    /// values.
    pub fn read(&self, block: &BlockId) -> Result<usize> {
        let mut buffer = self.buffer.write();
        self.file_manager.read(block, buffer.as_mut_slice())
    }

    /// Persist this page to `block`.
    pub fn write(&self, block: &BlockId) -> Result<()> {
        let buffer = self.buffer.write();
        self.file_manager.write(block, buffer.as_slice())
    }

    /// Persist this page as a new block at the end of `file_name`.
    pub fn append(&self, file_name: &str) -> Result<BlockId> {
        let buffer = self.buffer.write();
        self.file_manager.append(file_name, buffer.as_slice())
    }

    /// Get the integer at `offset`.
    ///
    /// If no integer was stored there, the value is meaningless.
    ///
    /// # Panics
    /// Panics if `offset + INT_SIZE > BLOCK_SIZE`.
    pub fn get_int(&self, offset: usize) -> i32 {
        self.buffer.read().get_int(offset)
    }

    /// Store an integer at `offset`.
    ///
    /// # Panics
    /// Panics if `offset + INT_SIZE > BLOCK_SIZE`.
    pub fn set_int(&self, offset: usize, value: i32) {
        self.buffer.write().set_int(offset, value);
    }

    /// Get a copy of the length-prefixed blob at `offset`.
    pub fn get_bytes(&self, offset: usize) -> Vec<u8> {
        self.buffer.read().get_bytes(offset).to_vec()
    }

    /// Store a length-prefixed blob at `offset`.
    pub fn set_bytes(&self, offset: usize, value: &[u8]) {
        self.buffer.write().set_bytes(offset, value);
    }

    /// Get the string at `offset`.
    ///
    /// # Panics
    /// Panics if the recorded length runs past the end of the page.
    pub fn get_string(&self, offset: usize) -> String {
        self.buffer.read().get_string(offset)
    }

    /// Store a string at `offset`.
    ///
    /// # Panics
    /// Panics if `offset + INT_SIZE + value.len() > BLOCK_SIZE`.
    pub fn set_string(&self, offset: usize, value: &str) {
        self.buffer.write().set_string(offset, value);
    }

    /// Copy out the whole page.
    pub fn contents(&self) -> Vec<u8> {
        self.buffer.read().as_slice().to_vec()
    }

    /// Zero the whole page.
    pub fn reset(&self) {
        self.buffer.write().reset();
    }

    /// The file manager this page does I/O through.
    #[inline]
    pub fn file_manager(&self) -> &Arc<FileManager> {
        &self.file_manager
    }
}
