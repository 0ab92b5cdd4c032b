//! Common types shared across blockfile.
//!
//! This module contains:
//! - Configuration constants
//! - Error types
//! - [`BlockId`], the address of a block on disk

mod block_id;
pub mod config;
pub mod error;

pub use block_id::BlockId;
pub use error::{Error, Result};
