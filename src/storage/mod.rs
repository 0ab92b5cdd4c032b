//! Storage layer - block I/O and page buffers.
//!
//! This module handles persistent storage:
//! - [`FileManager`] - Block-aligned file I/O
//! - [`page`] - Page buffers and typed accessors
//! - [`FileStats`] - I/O counters

mod file_manager;
pub mod page;
mod stats;

pub use file_manager::FileManager;
pub use stats::{FileStats, StatsSnapshot};
