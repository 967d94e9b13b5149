use std::sync::Arc;

use tokio::sync::watch;

use crate::api::{ApiClient, SearchQuery};
use crate::core::error::{message_or, Result};
use crate::core::types::{bare_file_name, PaginatedResponse, SearchResult};
use crate::shell::{save_with_dialog, FileSink, SaveDialog};

const SEARCH_FALLBACK: &str = "Search failed";

/// Observable state of a search session
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub results: Vec<SearchResult>,
    pub searching: bool,
    /// Last search failure, empty when none
    pub error: String,
    pub page: u32,
    pub total_pages: u32,
    pub total: u64,
    pub has_next: bool,
    pub has_prev: bool,
    /// Collections picked in the UI; empty means all
    pub selected_collections: Vec<String>,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            searching: false,
            error: String::new(),
            page: 1,
            total_pages: 1,
            total: 0,
            has_next: false,
            has_prev: false,
            selected_collections: Vec::new(),
        }
    }
}

impl SearchState {
    fn apply_page(&mut self, response: PaginatedResponse<SearchResult>) {
        self.page = response.page;
        self.total_pages = response.total_pages;
        self.total = response.total;
        self.has_next = response.has_next;
        self.has_prev = response.has_prev;
        self.results = response.items;
    }

    fn reset_results(&mut self) {
        let selected = std::mem::take(&mut self.selected_collections);
        *self = Self {
            selected_collections: selected,
            ..Self::default()
        };
    }
}

/// Search state holder
#[derive(Clone)]
pub struct SearchSession {
    client: ApiClient,
    dialog: Arc<dyn SaveDialog>,
    sink: Arc<dyn FileSink>,
    state: Arc<watch::Sender<SearchState>>,
}

impl SearchSession {
    pub fn new(client: ApiClient, dialog: Arc<dyn SaveDialog>, sink: Arc<dyn FileSink>) -> Self {
        let (tx, _rx) = watch::channel(SearchState::default());
        Self {
            client,
            dialog,
            sink,
            state: Arc::new(tx),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Copy of the current state
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Receive every subsequent state change
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Run a search and store the resulting page.
    ///
    /// Blank queries are ignored. `page` of `None` or zero re-runs the
    /// current page. Failures land in `error`.
    pub async fn search(&self, query: &str, limit: u32, score_threshold: f64, page: Option<u32>) {
        if query.trim().is_empty() {
            return;
        }

        let search_all = self.client.settings().snapshot().search_all_collections;
        let (selected, current_page) = {
            let state = self.state.borrow();
            (state.selected_collections.clone(), state.page)
        };
        let collections = if search_all || selected.is_empty() {
            None
        } else {
            Some(selected)
        };
        let page = page.filter(|p| *p > 0).unwrap_or(current_page);

        self.state.send_modify(|state| {
            state.searching = true;
            state.error.clear();
        });

        let request = SearchQuery::new(query)
            .with_collections(collections)
            .with_limit(limit)
            .with_page(page)
            .with_score_threshold(score_threshold);

        match self.client.search(&request).await {
            Ok(response) => {
                tracing::debug!(page = response.page, total = response.total, "Search completed");
                self.state.send_modify(|state| {
                    state.apply_page(response);
                    state.searching = false;
                });
            }
            Err(e) => {
                let message = message_or(&e, SEARCH_FALLBACK);
                tracing::warn!(page, error = %message, "Search failed");
                self.state.send_modify(|state| {
                    state.error = message;
                    state.searching = false;
                });
            }
        }
    }

    pub fn set_selected_collections(&self, collections: Vec<String>) {
        self.state
            .send_modify(|state| state.selected_collections = collections);
    }

    /// Download the file behind a search result.
    ///
    /// The dialog suggests `<download_path>/<name>` when a download path is
    /// given, else the bare name.
    pub async fn download_file(
        &self,
        collection: &str,
        file_path: &str,
        download_path: Option<&str>,
    ) -> Result<()> {
        let name = bare_file_name(file_path);
        let result = self.fetch_and_save(collection, name, download_path).await;
        if let Err(e) = &result {
            tracing::warn!(collection, file = name, error = %e, "Download failed");
        }
        result
    }

    async fn fetch_and_save(
        &self,
        collection: &str,
        name: &str,
        download_path: Option<&str>,
    ) -> Result<()> {
        let bytes = self.client.download_file(collection, name).await?;
        let suggestion = match download_path.filter(|p| !p.is_empty()) {
            Some(dir) => format!("{}/{}", dir, name),
            None => name.to_string(),
        };
        save_with_dialog(self.dialog.as_ref(), self.sink.as_ref(), &suggestion, &bytes).await?;
        Ok(())
    }

    /// Drop results, error and pagination; the collection selection stays
    pub fn clear_results(&self) {
        self.state.send_modify(SearchState::reset_results);
    }

    /// Advance the page number without fetching
    pub fn next_page(&self) {
        self.state.send_if_modified(|state| {
            if state.has_next {
                state.page = state.page.saturating_add(1);
                true
            } else {
                false
            }
        });
    }

    /// Step the page number back without fetching
    pub fn prev_page(&self) {
        self.state.send_if_modified(|state| {
            if state.has_prev && state.page > 1 {
                state.page -= 1;
                true
            } else {
                false
            }
        });
    }
}
