//! Google Drive v3 access: the metadata/listing interface the download
//! engine is written against, plus its reqwest-backed implementation.

pub mod client;
pub mod error;
pub mod responses;
pub mod types;

pub use client::HttpDriveClient;
pub use types::{ChildPage, ItemKind, RemoteItem};

use self::error::DriveError;

/// Authenticated access to Drive metadata and content URLs.
#[async_trait::async_trait]
pub trait DriveService: Send + Sync {
    /// Fetch `{id, name, mimeType, size}` for a single item.
    async fn metadata(&self, id: &str) -> Result<RemoteItem, DriveError>;

    /// One page of the non-trashed direct children of `parent_id`.
    async fn list_children(
        &self,
        parent_id: &str,
        page_token: Option<&str>,
    ) -> Result<ChildPage, DriveError>;

    /// Bearer token for raw content requests.
    async fn bearer_token(&self) -> Result<String, DriveError>;

    /// URL serving the raw bytes of `id`; honors `Range`.
    fn content_url(&self, id: &str) -> String;
}

/// Collect every direct child of `parent_id`, following continuation tokens
/// until the last page. Order is the provider's.
pub async fn list_all_children(
    drive: &dyn DriveService,
    parent_id: &str,
) -> Result<Vec<RemoteItem>, DriveError> {
    let mut all_items = Vec::new();
    let mut page_token: Option<String> = None;
    loop {
        let page = drive
            .list_children(parent_id, page_token.as_deref())
            .await?;
        all_items.extend(page.items);
        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }
    Ok(all_items)
}
