use thiserror::Error;

use crate::auth::error::AuthError;

/// Metadata and listing failures. These are never retried locally.
#[derive(Debug, Error)]
pub enum DriveError {
    #[error("Drive API error (HTTP {status}) for {context}: {message}")]
    Api {
        status: u16,
        context: String,
        message: String,
    },

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
