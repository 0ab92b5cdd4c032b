//! blockfile - block-addressed file storage for a disk-resident database.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │        Buffer pool / WAL / transactions (built on top)          │
//! └─────────────────────────────────────────────────────────────────┘
//!                                ↓
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Page (storage/page/)                                           │
//! │    4KB PageBuffer + typed int/string/bytes accessors            │
//! └─────────────────────────────────────────────────────────────────┘
//!                                ↓
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  FileManager (storage/)                                         │
//! │    one cached handle per file, block-aligned read/write/append  │
//! └─────────────────────────────────────────────────────────────────┘
//!                                ↓
//!                  <dir>/<file>: Block 0 | Block 1 | ...
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (BlockId, Error, config)
//! - [`storage`] - File I/O and page buffers
//!
//! # Quick Start
//! ```no_run
//! use std::sync::Arc;
//! use blockfile::{BlockId, FileManager, Page};
//!
//! let fm = Arc::new(FileManager::new("my_database").unwrap());
//!
//! let page = Page::new(Arc::clone(&fm));
//! page.set_string(0, "hello");
//! let block: BlockId = page.append("greetings.tbl").unwrap();
//!
//! page.reset();
//! page.read(&block).unwrap();
//! assert_eq!(page.get_string(0), "hello");
//! ```

pub mod common;
pub mod storage;

// Re-export commonly used items at crate root for convenience
pub use common::config::{BLOCK_SIZE, INT_SIZE};
pub use common::{BlockId, Error, Result};

pub use storage::page::{Page, PageBuffer};
pub use storage::{FileManager, FileStats, StatsSnapshot};
