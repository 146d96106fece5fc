//! Bearer-token sources for the Drive API.
//!
//! Acquiring and refreshing OAuth credentials happens outside this tool. A
//! [`TokenSource`] only hands out the current access token, either one given
//! on the command line or one kept fresh on disk by an external helper.

pub mod error;

use std::path::{Path, PathBuf};

use serde::Deserialize;

use self::error::AuthError;

#[async_trait::async_trait]
pub trait TokenSource: Send + Sync {
    /// Current access token, without the `Bearer ` prefix.
    async fn access_token(&self) -> Result<String, AuthError>;
}

/// A fixed token supplied via `--access-token` / `SDRIVE_ACCESS_TOKEN`.
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StaticToken").field(&"<redacted>").finish()
    }
}

#[async_trait::async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> Result<String, AuthError> {
        Ok(self.0.clone())
    }
}

#[derive(Deserialize)]
struct TokenFileContents {
    #[serde(default)]
    access_token: Option<String>,
}

/// Token stored as JSON on disk. Re-read on every call so an external
/// refresher can rotate it while a long download runs.
#[derive(Debug)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl TokenSource for TokenFile {
    async fn access_token(&self) -> Result<String, AuthError> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| AuthError::Read {
                path: self.path.clone(),
                source,
            })?;
        let parsed: TokenFileContents =
            serde_json::from_str(&contents).map_err(|source| AuthError::Parse {
                path: self.path.clone(),
                source,
            })?;
        parsed
            .access_token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::EmptyToken {
                path: self.path.clone(),
            })
    }
}

/// Pick the token source: an explicit token wins, otherwise the token file,
/// which must already exist.
pub fn select_token_source(
    access_token: Option<String>,
    token_file: &Path,
) -> Result<Box<dyn TokenSource>, AuthError> {
    if let Some(token) = access_token {
        tracing::debug!("Using access token from command line / environment");
        return Ok(Box::new(StaticToken::new(token)));
    }
    if token_file.exists() {
        tracing::debug!("Using access token from {}", token_file.display());
        return Ok(Box::new(TokenFile::new(token_file)));
    }
    Err(AuthError::MissingToken(token_file.to_path_buf()))
}
