//! Collections overview
//!
//! Read-through view of the distinct collections known to the backend.

use std::sync::Arc;

use tokio::sync::watch;

use crate::api::ApiClient;
use crate::core::error::message_or;

const LOAD_FALLBACK: &str = "Failed to load collections";

/// Observable state of the collections view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionsState {
    pub collections: Vec<String>,
    pub loading: bool,
    pub error: String,
}

/// Collections state holder
#[derive(Clone)]
pub struct CollectionsView {
    client: ApiClient,
    state: Arc<watch::Sender<CollectionsState>>,
}

impl CollectionsView {
    pub fn new(client: ApiClient) -> Self {
        let (tx, _rx) = watch::channel(CollectionsState::default());
        Self {
            client,
            state: Arc::new(tx),
        }
    }

    pub fn state(&self) -> CollectionsState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CollectionsState> {
        self.state.subscribe()
    }

    /// Refresh the collection list; failures land in `error`
    pub async fn load_collections(&self) {
        self.state.send_modify(|state| {
            state.loading = true;
            state.error.clear();
        });

        match self.client.list_collections().await {
            Ok(response) => {
                tracing::debug!(count = response.collections.len(), "Collections loaded");
                self.state.send_modify(|state| {
                    state.collections = response.collections;
                    state.loading = false;
                });
            }
            Err(e) => {
                let message = message_or(&e, LOAD_FALLBACK);
                tracing::warn!(error = %message, "Failed to load collections");
                self.state.send_modify(|state| {
                    state.error = message;
                    state.loading = false;
                });
            }
        }
    }

    /// Whether `name` is the configured default collection
    pub fn is_default(&self, name: &str) -> bool {
        self.client.settings().snapshot().default_collection == name
    }
}
