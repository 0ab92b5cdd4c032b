//! File Manager - block-aligned file I/O for a storage directory.
//!
//! The [`FileManager`] handles all direct file operations:
//! - Reading and writing whole blocks
//! - Appending new blocks to the end of a file
//! - Owning the OS file handles for every file in the directory

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use log::{debug, info, trace, warn};
use parking_lot::Mutex;

use crate::common::config::BLOCK_SIZE;
use crate::common::{BlockId, Error, Result};
use crate::storage::stats::FileStats;

/// An open file plus the lock that serializes seek+transfer on it.
///
/// `None` once the handle has been closed. A closed handle is never
/// published in the map again, so a caller that finds it empty goes back to
/// the map for the current one.
struct FileHandle {
    file: Mutex<Option<File>>,
}

/// Manages block I/O for every file in one directory.
///
/// # File Layout
/// Each file is a flat sequence of fixed-size blocks:
/// ```text
/// ┌─────────┬─────────┬─────────┬─────────┬─────────┐
/// │ Block 0 │ Block 1 │ Block 2 │  ...    │ Block N │
/// │ (4KB)   │ (4KB)   │ (4KB)   │         │ (4KB)   │
/// └─────────┴─────────┴─────────┴─────────┴─────────┘
/// Offset:  0      4096     8192    ...    N×4096
/// ```
///
/// Files only grow by whole blocks, so a file's length is always a multiple
/// of `BLOCK_SIZE`. A file found violating this is reported as
/// [`Error::MisalignedFile`] rather than silently mis-numbered.
///
/// # Thread Safety
/// `FileManager` is `Send + Sync` and is meant to be shared behind an `Arc`.
/// - The handle map is a `DashMap`; opening a handle goes through the entry
///   API, so exactly one handle is ever published per file name.
/// - Each handle carries a `Mutex`; a seek and the transfer that follows it
///   happen under that lock, as do the length query and write of an append.
/// - `close` empties a handle under its lock before unpublishing it, so at
///   most one live handle exists per file name at any moment.
///
/// # Handle Lifetime
/// Handles are opened lazily and cached until [`close`](Self::close) or
/// [`close_all`](Self::close_all) is called, or the manager is dropped. A
/// long-running process that never closes files holds one descriptor per
/// distinct file name it has touched.
pub struct FileManager {
    directory: PathBuf,
    is_new: bool,
    files: DashMap<String, Arc<FileHandle>>,
    stats: FileStats,
}

impl FileManager {
    /// Open the storage directory, creating it if it doesn't exist.
    ///
    /// Files already in the directory are left as they are.
    ///
    /// # Errors
    /// Returns `Error::DirectoryInit` if the directory cannot be created.
    pub fn new<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();
        let is_new = !directory.exists();

        fs::create_dir_all(&directory).map_err(|source| Error::DirectoryInit {
            path: directory.clone(),
            source,
        })?;

        info!(
            "Open storage directory {} (new: {})",
            directory.display(),
            is_new
        );

        Ok(Self {
            directory,
            is_new,
            files: DashMap::new(),
            stats: FileStats::new(),
        })
    }

    /// Read a block into `buf`.
    ///
    /// Reads up to `buf.len()` bytes starting at the block's offset and
    /// returns how many were read. A short count means the block extends past
    /// the end of the file; the tail of `buf` is left untouched.
    ///
    /// # Errors
    /// Returns `Error::FileNotFound` if the file was never created,
    /// `Error::BufferSize` if `buf` is larger than a block.
    pub fn read(&self, block: &BlockId, buf: &mut [u8]) -> Result<usize> {
        check_buffer(buf.len())?;

        let read = self.with_file(block.file_name(), false, |file| {
            file.seek(SeekFrom::Start(block.byte_offset()))?;
            Ok(read_full(file, buf)?)
        })?;
        self.stats.record_read();

        if read < buf.len() {
            warn!("Short read of {}: {} of {} bytes", block, read, buf.len());
        } else {
            trace!("Read {}", block);
        }
        Ok(read)
    }

    /// Write `buf` to a block.
    ///
    /// Overwrites whatever was there. If the block lies past the end of the
    /// file, the gap is zero-filled and the file is extended to the end of
    /// the block.
    ///
    /// # Errors
    /// Returns `Error::FileNotFound` if the file was never created,
    /// `Error::BufferSize` if `buf` is larger than a block, and
    /// `Error::MisalignedFile` if the file is not a whole number of blocks.
    pub fn write(&self, block: &BlockId, buf: &[u8]) -> Result<()> {
        check_buffer(buf.len())?;

        self.with_file(block.file_name(), false, |file| {
            let len = file.metadata()?.len();
            ensure_aligned(block.file_name(), len)?;

            let offset = block.byte_offset();
            file.seek(SeekFrom::Start(offset))?;
            file.write_all(buf)?;
            if offset + buf.len() as u64 > len {
                pad_to_block_end(file, offset, buf.len())?;
            }
            Ok(())
        })?;
        self.stats.record_write();

        trace!("Write {}", block);
        Ok(())
    }

    /// Append `buf` as a new block at the end of a file, creating the file
    /// if needed.
    ///
    /// Returns the address of the new block. Buffers shorter than a block are
    /// zero-padded on disk.
    ///
    /// # Errors
    /// Returns `Error::BufferSize` if `buf` is larger than a block and
    /// `Error::MisalignedFile` if the file is not a whole number of blocks.
    pub fn append(&self, file_name: &str, buf: &[u8]) -> Result<BlockId> {
        check_buffer(buf.len())?;

        let block = self.with_file(file_name, true, |file| {
            let len = file.metadata()?.len();
            ensure_aligned(file_name, len)?;

            file.seek(SeekFrom::Start(len))?;
            file.write_all(buf)?;
            pad_to_block_end(file, len, buf.len())?;
            Ok(BlockId::new(file_name, len / BLOCK_SIZE as u64))
        })?;
        self.stats.record_append();

        trace!("Append {}", block);
        Ok(block)
    }

    /// Number of blocks in a file.
    ///
    /// A file that doesn't exist has zero blocks; this call never creates it.
    ///
    /// # Errors
    /// Returns `Error::MisalignedFile` if the file is not a whole number of
    /// blocks.
    pub fn length(&self, file_name: &str) -> Result<u64> {
        let cached = match self.cached(file_name) {
            Some(handle) => handle
                .file
                .lock()
                .as_ref()
                .map(|file| file.metadata().map(|m| m.len()))
                .transpose()?,
            None => None,
        };
        let len = match cached {
            Some(len) => len,
            None => match fs::metadata(self.directory.join(file_name)) {
                Ok(metadata) => metadata.len(),
                Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
                Err(e) => return Err(e.into()),
            },
        };
        ensure_aligned(file_name, len)?;
        Ok(len / BLOCK_SIZE as u64)
    }

    /// Flush a file's data and metadata to disk.
    ///
    /// Does nothing if the file has no open handle.
    pub fn sync(&self, file_name: &str) -> Result<()> {
        if let Some(handle) = self.cached(file_name) {
            if let Some(file) = handle.file.lock().as_ref() {
                file.sync_all()?;
            }
        }
        Ok(())
    }

    /// Release the cached handle for a file.
    ///
    /// Returns `true` if a handle was open. Waits for the transfer in flight
    /// on the handle, if any; the next access reopens the file.
    pub fn close(&self, file_name: &str) -> bool {
        let Some(handle) = self.cached(file_name) else {
            return false;
        };

        let mut file = handle.file.lock();
        let closed = file.take().is_some();
        // Unpublish while still holding the lock so no second handle can be
        // opened before this one is empty.
        self.files
            .remove_if(file_name, |_, published| Arc::ptr_eq(published, &handle));
        drop(file);

        if closed {
            debug!("Close file {}", file_name);
        }
        closed
    }

    /// Release every cached handle.
    pub fn close_all(&self) {
        let names: Vec<String> = self.files.iter().map(|e| e.key().clone()).collect();
        let closed = names.iter().filter(|name| self.close(name)).count();
        debug!("Close {} files in {}", closed, self.directory.display());
    }

    /// Number of files with a cached handle.
    #[inline]
    pub fn open_file_count(&self) -> usize {
        self.files.len()
    }

    /// Whether the directory was created by this manager.
    #[inline]
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// The storage directory.
    #[inline]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Size of every block in bytes.
    #[inline]
    pub const fn block_size(&self) -> usize {
        BLOCK_SIZE
    }

    /// I/O counters for this manager.
    #[inline]
    pub fn stats(&self) -> &FileStats {
        &self.stats
    }

    /// Run `op` on the live handle for a file, opening it on first use.
    ///
    /// Only `create` callers may bring a new file into existence.
    fn with_file<T>(
        &self,
        file_name: &str,
        create: bool,
        mut op: impl FnMut(&mut File) -> Result<T>,
    ) -> Result<T> {
        loop {
            let handle = self.handle(file_name, create)?;
            let mut file = handle.file.lock();
            if let Some(file) = file.as_mut() {
                return op(file);
            }
            trace!("Handle for {} closed while waiting, reopening", file_name);
        }
    }

    fn cached(&self, file_name: &str) -> Option<Arc<FileHandle>> {
        self.files.get(file_name).map(|h| Arc::clone(h.value()))
    }

    fn handle(&self, file_name: &str, create: bool) -> Result<Arc<FileHandle>> {
        if let Some(handle) = self.cached(file_name) {
            return Ok(handle);
        }

        let handle = self
            .files
            .entry(file_name.to_string())
            .or_try_insert_with(|| self.open_file(file_name, create))?;
        Ok(Arc::clone(handle.value()))
    }

    fn open_file(&self, file_name: &str, create: bool) -> Result<Arc<FileHandle>> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(create)
            .truncate(false)
            .open(self.directory.join(file_name))
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => Error::FileNotFound(file_name.to_string()),
                _ => Error::Io(e),
            })?;
        self.stats.record_open();

        debug!("Open file {}", file_name);
        Ok(Arc::new(FileHandle {
            file: Mutex::new(Some(file)),
        }))
    }
}

fn check_buffer(len: usize) -> Result<()> {
    if len > BLOCK_SIZE {
        return Err(Error::BufferSize {
            expected: BLOCK_SIZE,
            actual: len,
        });
    }
    Ok(())
}

fn ensure_aligned(file_name: &str, len: u64) -> Result<()> {
    if len % BLOCK_SIZE as u64 != 0 {
        warn!("File {} has misaligned length {}", file_name, len);
        return Err(Error::MisalignedFile {
            file: file_name.to_string(),
            len,
        });
    }
    Ok(())
}

/// Grow the file to the end of the block starting at `offset` when a
/// partial buffer was written there.
fn pad_to_block_end(file: &File, offset: u64, written: usize) -> io::Result<()> {
    if written < BLOCK_SIZE {
        file.set_len(offset + BLOCK_SIZE as u64)?;
    }
    Ok(())
}

/// Read until `buf` is full or EOF.
fn read_full(file: &mut File, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
