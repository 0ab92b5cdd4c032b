//! Page types.
//!
//! This module contains:
//! - [`PageBuffer`] - The raw 4KB data container and value codec
//! - [`Page`] - A lockable buffer bound to a [`FileManager`](crate::FileManager)

mod buffer;
#[allow(clippy::module_inception)]
mod page;

pub use buffer::PageBuffer;
pub use page::Page;
