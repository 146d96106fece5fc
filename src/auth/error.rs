use std::path::PathBuf;

use thiserror::Error;

/// Failures while obtaining a bearer token.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(
        "No access token available. Pass --access-token, set SDRIVE_ACCESS_TOKEN, \
         or write {{\"access_token\": \"...\"}} to {}",
        .0.display()
    )]
    MissingToken(PathBuf),

    #[error("Token file {path} has no access_token")]
    EmptyToken { path: PathBuf },

    #[error("Failed to read token file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse token file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
