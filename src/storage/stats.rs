//! File manager I/O statistics.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters kept by a [`FileManager`](super::FileManager).
///
/// All fields are atomic so concurrent callers can bump them without locks.
/// `Ordering::Relaxed` is enough: each counter is independent and readers
/// only need eventually consistent totals.
///
/// # Example
/// ```
/// use blockfile::FileStats;
/// use std::sync::atomic::Ordering;
///
/// let stats = FileStats::new();
/// stats.blocks_read.fetch_add(1, Ordering::Relaxed);
/// assert_eq!(stats.blocks_read.load(Ordering::Relaxed), 1);
/// ```
#[derive(Debug)]
pub struct FileStats {
    /// Number of block reads issued.
    pub blocks_read: AtomicU64,

    /// Number of block writes issued (not counting appends).
    pub blocks_written: AtomicU64,

    /// Number of blocks appended to the end of a file.
    pub blocks_appended: AtomicU64,

    /// Number of OS file handles opened.
    pub files_opened: AtomicU64,
}

impl FileStats {
    /// Create a new stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self {
            blocks_read: AtomicU64::new(0),
            blocks_written: AtomicU64::new(0),
            blocks_appended: AtomicU64::new(0),
            files_opened: AtomicU64::new(0),
        }
    }

    /// Get a non-atomic copy of the current counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            blocks_read: self.blocks_read.load(Ordering::Relaxed),
            blocks_written: self.blocks_written.load(Ordering::Relaxed),
            blocks_appended: self.blocks_appended.load(Ordering::Relaxed),
            files_opened: self.files_opened.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.blocks_read.store(0, Ordering::Relaxed);
        self.blocks_written.store(0, Ordering::Relaxed);
        self.blocks_appended.store(0, Ordering::Relaxed);
        self.files_opened.store(0, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_read(&self) {
        self.blocks_read.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_write(&self) {
        self.blocks_written.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_append(&self) {
        self.blocks_appended.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_open(&self) {
        self.files_opened.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for FileStats {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time copy of [`FileStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub blocks_read: u64,
    pub blocks_written: u64,
    pub blocks_appended: u64,
    pub files_opened: u64,
}

impl StatsSnapshot {
    /// Total number of blocks transferred in either direction.
    pub fn total_io(&self) -> u64 {
        self.blocks_read + self.blocks_written + self.blocks_appended
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ read: {}, written: {}, appended: {}, total: {}, opened: {} }}",
            self.blocks_read,
            self.blocks_written,
            self.blocks_appended,
            self.total_io(),
            self.files_opened
        )
    }
}
