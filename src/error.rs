// src/error.rs
//! Error types for block, view and search operations

use std::io;
use thiserror::Error;

/// Errors that can occur during buffer operations.
///
/// Every error is reported synchronously to the immediate caller. Nothing in
/// this crate retries on its own, and short reads or writes are reported via
/// byte counts rather than as errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// An append or read was attempted on a block with no free space
    #[error("buffer is full")]
    BufferFull,
    /// The source reported zero bytes available
    #[error("end of stream")]
    EndOfStream,
    /// The underlying read or write failed
    #[error("I/O error: {message}")]
    Io {
        /// Platform error code, when the platform supplied one
        code: Option<i32>,
        /// Human readable description
        message: String,
    },
    /// Slice bounds are reversed or outside the sequence
    #[error("invalid range {start}..{stop} for length {len}")]
    Range {
        /// Requested start offset
        start: usize,
        /// Requested stop offset
        stop: usize,
        /// Length of the sequence being sliced
        len: usize,
    },
    /// A single index is outside the sequence after negative wrapping
    #[error("index {index} out of range for length {len}")]
    Index {
        /// Requested index, before wrapping
        index: isize,
        /// Length of the sequence being indexed
        len: usize,
    },
    /// `split` was called with a zero-length separator
    #[error("empty separator")]
    EmptySeparator,
    /// A lookup that requires a match found none
    #[error("subsequence not found")]
    NotFound,
    /// The operation is not available for this representation
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
    /// A view group was built from zero views
    #[error("a view group needs at least one view")]
    EmptyGroup,
}

impl BufferError {
    /// Returns the platform error code carried by an [`Io`](Self::Io) error.
    pub fn os_code(&self) -> Option<i32> {
        match self {
            Self::Io { code, .. } => *code,
            _ => None,
        }
    }
}

/// Convert BufferError to std::io::Error
impl From<BufferError> for io::Error {
    fn from(err: BufferError) -> Self {
        use io::ErrorKind;
        match err {
            BufferError::Io {
                code: Some(code), ..
            } => io::Error::from_raw_os_error(code),
            BufferError::Io {
                code: None,
                message,
            } => io::Error::other(message),
            BufferError::BufferFull => io::Error::new(ErrorKind::WriteZero, err),
            BufferError::EndOfStream => io::Error::new(ErrorKind::UnexpectedEof, err),
            BufferError::Range { .. } | BufferError::Index { .. } | BufferError::EmptySeparator => {
                io::Error::new(ErrorKind::InvalidInput, err)
            }
            BufferError::NotFound => io::Error::new(ErrorKind::NotFound, err),
            BufferError::Unsupported(_) => io::Error::new(ErrorKind::Unsupported, err),
            BufferError::EmptyGroup => io::Error::new(ErrorKind::InvalidInput, err),
        }
    }
}

/// Convert std::io::Error to BufferError, keeping the OS error code
impl From<io::Error> for BufferError {
    fn from(err: io::Error) -> Self {
        BufferError::Io {
            code: err.raw_os_error(),
            message: err.to_string(),
        }
    }
}

// BufferError -> anyhow::Error comes from anyhow's blanket impl over std::error::Error.

/// Allow using ? with anyhow::Error
#[cfg(feature = "anyhow")]
impl From<anyhow::Error> for BufferError {
    fn from(err: anyhow::Error) -> Self {
        BufferError::Io {
            code: None,
            message: err.to_string(),
        }
    }
}

/// Result type alias for buffer operations
///
/// Note: When using with other Result types (like anyhow::Result),
/// either qualify the type (`zerobuf::Result<T>`) or use the conversion traits.
pub type Result<T> = std::result::Result<T, BufferError>;

/// Extension trait for converting Results between different error types
pub trait ResultExt<T> {
    /// Convert to anyhow::Result
    #[cfg(feature = "anyhow")]
    fn into_anyhow(self) -> anyhow::Result<T>;

    /// Convert to io::Result
    fn into_io(self) -> io::Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    #[cfg(feature = "anyhow")]
    fn into_anyhow(self) -> anyhow::Result<T> {
        self.map_err(|e| e.into())
    }

    fn into_io(self) -> io::Result<T> {
        self.map_err(|e| e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_io() {
        let io_err: io::Error = BufferError::BufferFull.into();
        assert_eq!(io_err.kind(), io::ErrorKind::WriteZero);

        let io_err: io::Error = BufferError::EndOfStream.into();
        assert_eq!(io_err.kind(), io::ErrorKind::UnexpectedEof);

        let io_err: io::Error = BufferError::Unsupported("multi-byte group search").into();
        assert_eq!(io_err.kind(), io::ErrorKind::Unsupported);
    }

    #[test]
    fn test_os_code_round_trip() {
        let err = BufferError::from(io::Error::from_raw_os_error(9));
        assert_eq!(err.os_code(), Some(9));

        let back: io::Error = err.into();
        assert_eq!(back.raw_os_error(), Some(9));
    }

    #[test]
    fn test_display() {
        let err = BufferError::Range {
            start: 3,
            stop: 2,
            len: 6,
        };
        assert_eq!(err.to_string(), "invalid range 3..2 for length 6");
        assert_eq!(BufferError::EmptySeparator.to_string(), "empty separator");
    }

    #[test]
    fn test_result_ext() {
        let result: Result<u32> = Ok(42);
        assert_eq!(result.into_io().unwrap(), 42);

        let result: Result<u32> = Err(BufferError::NotFound);
        assert_eq!(result.into_io().unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[cfg(feature = "anyhow")]
    #[test]
    fn test_anyhow_conversion() {
        let anyhow_err: anyhow::Error = BufferError::EmptySeparator.into();
        assert!(anyhow_err.to_string().contains("empty separator"));
    }
}
