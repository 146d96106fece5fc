//! In-memory collaborators for engine tests. File content is served by a
//! wiremock server at `{base}/content/{id}`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use reqwest::Client;
use tokio_util::sync::CancellationToken;

use super::progress::{FilePosition, FileProgress, ProgressReporter};
use super::{DownloadConfig, Downloader};
use crate::connectivity::Connectivity;
use crate::drive::error::DriveError;
use crate::drive::{ChildPage, DriveService, ItemKind, RemoteItem};

/// Remote hierarchy served by [`FakeDrive`].
pub struct RemoteTree {
    base: String,
    items: HashMap<String, RemoteItem>,
    children: HashMap<String, Vec<String>>,
    failing_listings: Vec<String>,
    page_size: usize,
}

impl RemoteTree {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.to_string(),
            items: HashMap::new(),
            children: HashMap::new(),
            failing_listings: Vec::new(),
            page_size: 2,
        }
    }

    fn insert(mut self, parent: Option<&str>, item: RemoteItem) -> Self {
        if let Some(parent) = parent {
            self.children
                .entry(parent.to_string())
                .or_default()
                .push(item.id.clone());
        }
        self.items.insert(item.id.clone(), item);
        self
    }

    pub fn file(self, id: &str, name: &str, size: u64) -> Self {
        self.insert(None, file_item(id, name, Some(size)))
    }

    pub fn sizeless_file(self, id: &str, name: &str) -> Self {
        self.insert(None, file_item(id, name, None))
    }

    pub fn folder(self, id: &str, name: &str) -> Self {
        self.insert(None, folder_item(id, name))
    }

    pub fn file_in(self, parent: &str, id: &str, name: &str, size: u64) -> Self {
        self.insert(Some(parent), file_item(id, name, Some(size)))
    }

    pub fn sizeless_file_in(self, parent: &str, id: &str, name: &str) -> Self {
        self.insert(Some(parent), file_item(id, name, None))
    }

    pub fn folder_in(self, parent: &str, id: &str, name: &str) -> Self {
        self.insert(Some(parent), folder_item(id, name))
    }

    pub fn failing_listing(mut self, parent: &str) -> Self {
        self.failing_listings.push(parent.to_string());
        self
    }
}

fn file_item(id: &str, name: &str, size: Option<u64>) -> RemoteItem {
    RemoteItem {
        id: id.to_string(),
        name: name.to_string(),
        kind: ItemKind::File,
        size,
    }
}

fn folder_item(id: &str, name: &str) -> RemoteItem {
    RemoteItem {
        id: id.to_string(),
        name: name.to_string(),
        kind: ItemKind::Folder,
        size: None,
    }
}

pub struct FakeDrive {
    tree: RemoteTree,
    metadata_calls: Mutex<HashMap<String, u32>>,
    list_calls: AtomicU32,
}

impl FakeDrive {
    pub fn metadata_calls(&self, id: &str) -> u32 {
        self.metadata_calls
            .lock()
            .unwrap()
            .get(id)
            .copied()
            .unwrap_or(0)
    }

    pub fn list_calls(&self) -> u32 {
        self.list_calls.load(Ordering::SeqCst)
    }
}

fn not_found(context: String) -> DriveError {
    DriveError::Api {
        status: 404,
        context,
        message: "not found".into(),
    }
}

#[async_trait::async_trait]
impl DriveService for FakeDrive {
    async fn metadata(&self, id: &str) -> Result<RemoteItem, DriveError> {
        *self
            .metadata_calls
            .lock()
            .unwrap()
            .entry(id.to_string())
            .or_default() += 1;
        self.tree
            .items
            .get(id)
            .cloned()
            .ok_or_else(|| not_found(format!("metadata of {}", id)))
    }

    async fn list_children(
        &self,
        parent_id: &str,
        page_token: Option<&str>,
    ) -> Result<ChildPage, DriveError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.tree.failing_listings.iter().any(|p| p == parent_id) {
            return Err(DriveError::Api {
                status: 500,
                context: format!("children of {}", parent_id),
                message: "backend error".into(),
            });
        }
        let ids = self
            .tree
            .children
            .get(parent_id)
            .cloned()
            .unwrap_or_default();
        let start: usize = page_token.map(|t| t.parse().unwrap()).unwrap_or(0);
        let end = (start + self.tree.page_size).min(ids.len());
        let items = ids[start..end]
            .iter()
            .map(|id| self.tree.items[id].clone())
            .collect();
        Ok(ChildPage {
            items,
            next_page_token: (end < ids.len()).then(|| end.to_string()),
        })
    }

    async fn bearer_token(&self) -> Result<String, DriveError> {
        Ok("test-token".to_string())
    }

    fn content_url(&self, id: &str) -> String {
        format!("{}/content/{}", self.tree.base, id)
    }
}

#[derive(Default)]
pub struct CountingConnectivity {
    waits: AtomicU32,
}

impl CountingConnectivity {
    pub fn waits(&self) -> u32 {
        self.waits.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Connectivity for CountingConnectivity {
    async fn wait_for_connection(&self) {
        self.waits.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
pub struct StartEvent {
    pub name: String,
    pub total: u64,
    pub completed: u64,
    pub position: Option<FilePosition>,
}

#[derive(Default)]
struct Recorded {
    starts: Vec<StartEvent>,
    updates: Vec<(u64, Option<f64>)>,
    finished: usize,
}

#[derive(Default, Clone)]
pub struct RecordingReporter {
    events: Arc<Mutex<Recorded>>,
}

impl RecordingReporter {
    pub fn starts(&self) -> Vec<StartEvent> {
        self.events.lock().unwrap().starts.clone()
    }

    pub fn updates(&self) -> Vec<(u64, Option<f64>)> {
        self.events.lock().unwrap().updates.clone()
    }

    pub fn finished(&self) -> usize {
        self.events.lock().unwrap().finished
    }
}

impl ProgressReporter for RecordingReporter {
    fn start_file(
        &self,
        name: &str,
        total: u64,
        completed: u64,
        position: Option<FilePosition>,
    ) -> Box<dyn FileProgress> {
        self.events.lock().unwrap().starts.push(StartEvent {
            name: name.to_string(),
            total,
            completed,
            position,
        });
        Box::new(self.clone())
    }
}

impl FileProgress for RecordingReporter {
    fn update(&self, completed: u64, _total: u64, throughput: Option<f64>) {
        self.events
            .lock()
            .unwrap()
            .updates
            .push((completed, throughput));
    }

    fn finish(&self) {
        self.events.lock().unwrap().finished += 1;
    }

    fn abandon(&self) {}
}

/// Owns every collaborator so tests can build a [`Downloader`] and inspect
/// the fakes afterwards.
pub struct Harness {
    pub drive: FakeDrive,
    pub http: Client,
    pub connectivity: CountingConnectivity,
    pub progress: RecordingReporter,
    pub config: DownloadConfig,
    pub shutdown: CancellationToken,
}

impl Harness {
    pub fn new(tree: RemoteTree) -> Self {
        Self {
            drive: FakeDrive {
                tree,
                metadata_calls: Mutex::new(HashMap::new()),
                list_calls: AtomicU32::new(0),
            },
            http: Client::new(),
            connectivity: CountingConnectivity::default(),
            progress: RecordingReporter::default(),
            config: DownloadConfig::default(),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn downloader(&self) -> Downloader<'_> {
        Downloader::new(
            &self.drive,
            &self.http,
            &self.connectivity,
            &self.progress,
            &self.config,
            self.shutdown.clone(),
        )
    }
}
