use std::io;

use thiserror::Error;

use crate::buffer::ReparseTag;

// https://docs.microsoft.com/en-us/windows/desktop/debug/system-error-codes
pub(crate) const ERROR_NOT_A_REPARSE_POINT: i32 = 0x1126;

/// Errors returned by reparse point operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The path carries no reparse point. This is a normal outcome, callers are
    /// expected to check for it.
    #[error("not a reparse point")]
    NotAReparsePoint,

    /// The operation has no meaning for records with this tag.
    #[error("operation not supported for reparse tag {0}")]
    Unsupported(ReparseTag),

    /// The reparse buffer violates its own declared offsets or lengths.
    #[error("malformed reparse record: {0}")]
    MalformedRecord(&'static str),

    /// Rejected before any I/O was attempted.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The output buffer cannot hold the requested name. Sizes are in UTF-16 units.
    #[error("buffer too small: {needed} UTF-16 units needed, {capacity} available")]
    BufferTooSmall { needed: usize, capacity: usize },

    #[error("I/O error: {0}")]
    Io(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn is_not_a_reparse_point(&self) -> bool {
        matches!(self, Error::NotAReparsePoint)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        // The attribute may vanish between the attribute query and the control request.
        if err.raw_os_error() == Some(ERROR_NOT_A_REPARSE_POINT) {
            Error::NotAReparsePoint
        } else {
            Error::Io(err)
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(e) => e,
            #[cfg(windows)]
            Error::NotAReparsePoint => io::Error::from_raw_os_error(ERROR_NOT_A_REPARSE_POINT),
            err @ (Error::InvalidArgument(_) | Error::BufferTooSmall { .. }) => {
                io::Error::new(io::ErrorKind::InvalidInput, err)
            }
            err @ Error::MalformedRecord(_) => io::Error::new(io::ErrorKind::InvalidData, err),
            err => io::Error::new(io::ErrorKind::Other, err),
        }
    }
}
