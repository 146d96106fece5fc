use thiserror::Error;

use crate::drive::error::DriveError;

/// Failures of a single file-transfer attempt.
///
/// Every variant except `Cancelled` is treated as transient: the retry loop
/// waits for connectivity and tries again until the attempt ceiling.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Metadata request failed: {0}")]
    Metadata(#[from] DriveError),

    #[error("Drive reports no byte size for {id}")]
    MissingSize { id: String },

    #[error("HTTP error {status} downloading {path}")]
    HttpStatus { status: u16, path: String },

    #[error("Request error downloading {path}: {source}")]
    Http {
        source: reqwest::Error,
        path: String,
    },

    #[error("Stream error downloading {path} after {bytes_written} bytes: {source}")]
    Stream {
        source: std::io::Error,
        path: String,
        bytes_written: u64,
    },

    #[error("Size mismatch for {path}: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        path: String,
        expected: u64,
        actual: u64,
    },

    #[error("Disk error: {0}")]
    Disk(#[from] std::io::Error),

    #[error("Download of {0} cancelled")]
    Cancelled(String),
}

impl TransferError {
    pub fn is_retryable(&self) -> bool {
        !matches!(self, TransferError::Cancelled(_))
    }
}
