use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::api::{ApiClient, ListFilesQuery};
use crate::core::error::{message_or, Result, SfsError};
use crate::core::types::{file_key, FileInfo, PaginatedResponse};
use crate::shell::{save_with_dialog, FileSink, SaveDialog};

/// Page size used when `load_files` is not given one
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

const LOAD_FALLBACK: &str = "Failed to load files";
const DELETE_FALLBACK: &str = "Failed to delete file";

/// Observable state of the file browser
#[derive(Debug, Clone, PartialEq)]
pub struct FilesState {
    /// Files of the current page
    pub files: Vec<FileInfo>,
    pub loading: bool,
    /// Last load failure, empty when none
    pub error: String,
    /// `collection/name` of the delete in flight
    pub deleting: Option<String>,
    /// `collection/name` of the download in flight
    pub downloading: Option<String>,
    pub page: u32,
    pub total_pages: u32,
    pub total: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Default for FilesState {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            loading: false,
            error: String::new(),
            deleting: None,
            downloading: None,
            page: 1,
            total_pages: 1,
            total: 0,
            has_next: false,
            has_prev: false,
        }
    }
}

impl FilesState {
    fn apply_page(&mut self, response: PaginatedResponse<FileInfo>) {
        self.page = response.page;
        self.total_pages = response.total_pages;
        self.total = response.total;
        self.has_next = response.has_next;
        self.has_prev = response.has_prev;
        self.files = response.items;
    }
}

/// Options for `load_files`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadFilesOptions {
    /// `None` lists every collection
    pub collection: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl LoadFilesOptions {
    pub fn collection(collection: impl Into<String>) -> Self {
        Self {
            collection: Some(collection.into()),
            ..Self::default()
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Filter remembered from the last `load_files`, reused for pagination
#[derive(Debug, Clone, Default)]
struct ListingFilter {
    collection: Option<String>,
    limit: Option<u32>,
}

/// File browser state holder
#[derive(Clone)]
pub struct FileManager {
    client: ApiClient,
    dialog: Arc<dyn SaveDialog>,
    sink: Arc<dyn FileSink>,
    state: Arc<watch::Sender<FilesState>>,
    filter: Arc<Mutex<ListingFilter>>,
}

impl FileManager {
    pub fn new(client: ApiClient, dialog: Arc<dyn SaveDialog>, sink: Arc<dyn FileSink>) -> Self {
        let (tx, _rx) = watch::channel(FilesState::default());
        Self {
            client,
            dialog,
            sink,
            state: Arc::new(tx),
            filter: Arc::new(Mutex::new(ListingFilter::default())),
        }
    }

    /// Copy of the current state
    pub fn state(&self) -> FilesState {
        self.state.borrow().clone()
    }

    /// Receive every subsequent state change
    pub fn subscribe(&self) -> watch::Receiver<FilesState> {
        self.state.subscribe()
    }

    /// Load one page of files.
    ///
    /// Failures land in `error`; the previously loaded page is kept.
    pub async fn load_files(&self, options: LoadFilesOptions) {
        {
            let mut filter = self.filter.lock();
            filter.collection = options.collection.clone();
            filter.limit = options.limit;
        }

        self.state.send_modify(|state| {
            state.loading = true;
            state.error.clear();
        });

        let query = ListFilesQuery {
            collection: options.collection,
            page: Some(options.page.unwrap_or(1)),
            limit: Some(options.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_PAGE_LIMIT)),
        };

        match self.client.list_files(&query).await {
            Ok(response) => {
                tracing::debug!(
                    collection = ?query.collection,
                    page = response.page,
                    count = response.items.len(),
                    "Files loaded"
                );
                self.state.send_modify(|state| {
                    state.apply_page(response);
                    state.loading = false;
                });
            }
            Err(e) => {
                let message = message_or(&e, LOAD_FALLBACK);
                tracing::warn!(collection = ?query.collection, error = %message, "Failed to load files");
                self.state.send_modify(|state| {
                    state.error = message;
                    state.loading = false;
                });
            }
        }
    }

    /// Load the following page, if there is one
    pub async fn next_page(&self) {
        let state = self.state();
        if state.has_next {
            self.load_adjacent(state.page.saturating_add(1)).await;
        }
    }

    /// Load the preceding page, if there is one
    pub async fn prev_page(&self) {
        let state = self.state();
        if state.has_prev {
            self.load_adjacent(state.page.saturating_sub(1).max(1)).await;
        }
    }

    async fn load_adjacent(&self, page: u32) {
        let filter = self.filter.lock().clone();
        self.load_files(LoadFilesOptions {
            collection: filter.collection,
            page: Some(page),
            limit: filter.limit,
        })
        .await;
    }

    /// Delete a file and drop it from the loaded page on success
    pub async fn delete_file(&self, collection: &str, name: &str) -> Result<()> {
        let key = file_key(collection, name);
        self.state.send_modify(|state| state.deleting = Some(key.clone()));

        let result = self.client.delete_file(collection, name).await;

        self.state.send_modify(|state| {
            if let Ok(job) = &result {
                state.files.retain(|file| file.path != key);
                tracing::info!(path = %key, job_id = %job.job_id, "File deletion scheduled");
            }
            state.deleting = None;
        });

        result
            .map(|_| ())
            .map_err(|e| SfsError::normalized(&e, DELETE_FALLBACK))
    }

    /// Download a file and save it where the user chooses.
    ///
    /// The dialog suggests `default_path`, else the bare file name. Cancelling
    /// writes nothing and is not an error.
    pub async fn download_file(
        &self,
        collection: &str,
        name: &str,
        default_path: Option<&str>,
    ) -> Result<()> {
        let key = file_key(collection, name);
        self.state.send_modify(|state| state.downloading = Some(key.clone()));

        let result = self.fetch_and_save(collection, name, default_path).await;

        self.state.send_modify(|state| state.downloading = None);
        if let Err(e) = &result {
            tracing::warn!(path = %key, error = %e, "Download failed");
        }
        result
    }

    async fn fetch_and_save(
        &self,
        collection: &str,
        name: &str,
        default_path: Option<&str>,
    ) -> Result<()> {
        let bytes = self.client.download_file(collection, name).await?;
        let suggestion = default_path.unwrap_or(name);
        save_with_dialog(self.dialog.as_ref(), self.sink.as_ref(), suggestion, &bytes).await?;
        Ok(())
    }

    /// Case-insensitive match on path or name, over the loaded page only
    pub fn filter_files(&self, query: &str) -> Vec<FileInfo> {
        let state = self.state.borrow();
        if query.is_empty() {
            return state.files.clone();
        }

        let needle = query.to_lowercase();
        state
            .files
            .iter()
            .filter(|file| file.matches_lowercase(&needle))
            .cloned()
            .collect()
    }
}
