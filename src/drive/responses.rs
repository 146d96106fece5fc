use serde::Deserialize;

use super::types::{ItemKind, RemoteItem, FOLDER_MIME_TYPE};

/// A `files` resource as returned by `files.get` and inside `files.list`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResource {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mime_type: String,
    /// Drive encodes int64 fields as JSON strings.
    #[serde(default)]
    pub size: Option<String>,
}

/// Response of `files.list`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListResponse {
    #[serde(default)]
    pub files: Vec<FileResource>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl From<FileResource> for RemoteItem {
    fn from(res: FileResource) -> Self {
        let kind = if res.mime_type == FOLDER_MIME_TYPE {
            ItemKind::Folder
        } else {
            ItemKind::File
        };
        let size = match kind {
            ItemKind::Folder => None,
            ItemKind::File => res.size.as_deref().and_then(|s| s.trim().parse().ok()),
        };
        RemoteItem {
            id: res.id,
            name: res.name,
            kind,
            size,
        }
    }
}
