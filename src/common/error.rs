//! Error types for blockfile.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors surfaced by the storage layer.
///
/// Nothing here is retried automatically. Misuse of page offsets is not an
/// error value: those accessors document their preconditions and panic.
#[derive(Debug, Error)]
pub enum Error {
    /// The storage directory could not be created or scanned.
    #[error("cannot initialize directory {}: {source}", .path.display())]
    DirectoryInit {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// I/O error from open, seek, read, write, or metadata calls.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A read or write targeted a file that has never been created.
    ///
    /// Only `append` creates files.
    #[error("file {0} not found")]
    FileNotFound(String),

    /// A file's length is not a whole number of blocks.
    #[error("file {file} has length {len}, which is not a multiple of the block size")]
    MisalignedFile { file: String, len: u64 },

    /// A transfer buffer is larger than one block.
    #[error("buffer of {actual} bytes exceeds block size {expected}")]
    BufferSize { expected: usize, actual: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::FileNotFound("t.dat".to_string());
        assert_eq!(format!("{}", err), "file t.dat not found");

        let err = Error::MisalignedFile {
            file: "t.dat".to_string(),
            len: 100,
        };
        assert_eq!(
            format!("{}", err),
            "file t.dat has length 100, which is not a multiple of the block size"
        );

        let err = Error::BufferSize {
            expected: 4096,
            actual: 5000,
        };
        assert_eq!(format!("{}", err), "buffer of 5000 bytes exceeds block size 4096");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();

        match err {
            Error::Io(_) => {} // Success
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_directory_init_has_source() {
        use std::error::Error as _;

        let err = Error::DirectoryInit {
            path: PathBuf::from("/nope"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
        assert!(format!("{}", err).starts_with("cannot initialize directory /nope"));
    }
}
