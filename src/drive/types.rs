/// MIME type Drive assigns to folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    File,
    Folder,
}

/// Snapshot of one Drive item. `name` is used verbatim as a local path
/// segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteItem {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    /// Declared byte size; always `None` for folders and for files Drive
    /// reports no size for (native Docs, Sheets, ...).
    pub size: Option<u64>,
}

impl RemoteItem {
    pub fn is_folder(&self) -> bool {
        self.kind == ItemKind::Folder
    }
}

/// One page of a children listing.
#[derive(Debug, Default)]
pub struct ChildPage {
    pub items: Vec<RemoteItem>,
    pub next_page_token: Option<String>,
}
