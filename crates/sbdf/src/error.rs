//! Top-level error type for SBDF table I/O.

use thiserror::Error;

pub use sbdf_format::{FormatError, UsageError};

/// Errors that can occur while reading or writing SBDF tables.
#[derive(Debug, Error)]
pub enum Error {
    /// The byte stream violates the SBDF format.
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// The API was used incorrectly.
    #[error("invalid usage: {0}")]
    Usage(#[from] UsageError),

    /// The underlying byte sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
