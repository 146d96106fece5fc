use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::error::DriveError;
use super::responses::{FileListResponse, FileResource};
use super::types::{ChildPage, RemoteItem};
use super::DriveService;
use crate::auth::TokenSource;

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/drive/v3";

const METADATA_FIELDS: &str = "id, name, mimeType, size";
const LIST_FIELDS: &str = "nextPageToken, files(id, name, mimeType, size)";

/// Connect and per-read timeout for every request. A stalled body read
/// surfaces as an error instead of hanging the transfer.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the HTTP client shared by API calls and content downloads.
///
/// No overall request timeout is set: content streams of large files run
/// for as long as bytes keep arriving.
pub fn build_http_client() -> reqwest::Result<Client> {
    build_http_client_with_timeout(REQUEST_TIMEOUT)
}

pub fn build_http_client_with_timeout(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(concat!("sdrive/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(timeout)
        .read_timeout(timeout)
        .build()
}

/// Drive v3 REST client authenticated by a [`TokenSource`].
pub struct HttpDriveClient {
    http: Client,
    api_base: String,
    tokens: Box<dyn TokenSource>,
}

impl std::fmt::Debug for HttpDriveClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDriveClient")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl HttpDriveClient {
    pub fn new(http: Client, tokens: Box<dyn TokenSource>) -> Self {
        Self::with_api_base(http, tokens, DEFAULT_API_BASE)
    }

    pub fn with_api_base(
        http: Client,
        tokens: Box<dyn TokenSource>,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        context: &str,
    ) -> Result<T, DriveError> {
        let token = self.tokens.access_token().await?;
        let response = request.bearer_auth(token).send().await?;
        let response = check_status(response, context).await?;
        Ok(response.json().await?)
    }
}

/// Map a non-2xx response to [`DriveError::Api`], pulling the message out of
/// Drive's `{"error": {"message": ...}}` envelope when present.
async fn check_status(response: Response, context: &str) -> Result<Response, DriveError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or(body);
    Err(DriveError::Api {
        status: status.as_u16(),
        context: context.to_string(),
        message,
    })
}

#[async_trait::async_trait]
impl DriveService for HttpDriveClient {
    async fn metadata(&self, id: &str) -> Result<RemoteItem, DriveError> {
        let url = format!("{}/files/{}", self.api_base, id);
        tracing::debug!("GET {} (metadata)", url);
        let request = self.http.get(&url).query(&[
            ("fields", METADATA_FIELDS),
            ("supportsAllDrives", "true"),
        ]);
        let resource: FileResource = self
            .send_json(request, &format!("metadata of {}", id))
            .await?;
        Ok(resource.into())
    }

    async fn list_children(
        &self,
        parent_id: &str,
        page_token: Option<&str>,
    ) -> Result<ChildPage, DriveError> {
        let url = format!("{}/files", self.api_base);
        let query = format!("'{}' in parents and trashed=false", parent_id);
        tracing::debug!(parent = parent_id, page_token = ?page_token, "Listing children");
        let mut request = self.http.get(&url).query(&[
            ("q", query.as_str()),
            ("fields", LIST_FIELDS),
            ("supportsAllDrives", "true"),
            ("includeItemsFromAllDrives", "true"),
        ]);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }
        let list: FileListResponse = self
            .send_json(request, &format!("children of {}", parent_id))
            .await?;
        Ok(ChildPage {
            items: list.files.into_iter().map(RemoteItem::from).collect(),
            next_page_token: list.next_page_token.filter(|t| !t.is_empty()),
        })
    }

    async fn bearer_token(&self) -> Result<String, DriveError> {
        Ok(self.tokens.access_token().await?)
    }

    fn content_url(&self, id: &str) -> String {
        format!("{}/files/{}?alt=media&supportsAllDrives=true", self.api_base, id)
    }
}
