//! Settings Store
//!
//! Shared handle over the current `Settings`:
//! - Setters mutate memory only; `save_settings` persists explicitly
//! - `load_settings` applies the stored object over the current values
//! - Every change is published on a `watch` channel

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;

use super::settings::{Settings, SettingsPatch, Theme};
use super::storage::{SettingsBackend, SettingsResult};
use crate::core::config::StorageHost;

/// Settings store shared by the API client and the state holders
#[derive(Clone)]
pub struct SettingsStore {
    state: Arc<watch::Sender<Settings>>,
    backend: Arc<dyn SettingsBackend>,
}

impl SettingsStore {
    /// Create a store holding default settings
    pub fn new(backend: Arc<dyn SettingsBackend>) -> Self {
        Self::with_settings(backend, Settings::default())
    }

    /// Create a store holding the given settings
    pub fn with_settings(backend: Arc<dyn SettingsBackend>, settings: Settings) -> Self {
        let (tx, _rx) = watch::channel(settings);
        Self {
            state: Arc::new(tx),
            backend,
        }
    }

    /// Copy of the current settings
    pub fn snapshot(&self) -> Settings {
        self.state.borrow().clone()
    }

    /// Receive every subsequent change
    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.state.subscribe()
    }

    /// Host capability of the storage backend
    pub fn storage_host(&self) -> StorageHost {
        self.backend.host()
    }

    /// Apply an in-memory change
    pub fn update<F>(&self, updater: F)
    where
        F: FnOnce(&mut Settings),
    {
        self.state.send_modify(updater);
    }

    pub fn set_api_url(&self, url: impl Into<String>) {
        let url = url.into();
        self.update(|s| s.api_url = url);
    }

    pub fn set_api_key(&self, key: impl Into<String>) {
        let key = key.into();
        self.update(|s| s.api_key = key);
    }

    pub fn set_download_path(&self, path: impl Into<String>) {
        let path = path.into();
        self.update(|s| s.download_path = path);
    }

    pub fn set_theme(&self, theme: Theme) {
        self.update(|s| s.theme = theme);
    }

    pub fn set_search_limit(&self, limit: u32) {
        self.update(|s| s.search_limit = limit);
    }

    pub fn set_search_score_threshold(&self, threshold: f64) {
        self.update(|s| s.search_score_threshold = threshold);
    }

    pub fn set_default_collection(&self, collection: impl Into<String>) {
        let collection = collection.into();
        self.update(|s| s.default_collection = collection);
    }

    pub fn set_search_all_collections(&self, enabled: bool) {
        self.update(|s| s.search_all_collections = enabled);
    }

    /// Persist the connection subset (`apiUrl`, `apiKey`, `downloadPath`, `theme`)
    pub async fn save_settings(&self) -> SettingsResult<()> {
        let persisted = self.snapshot().persisted();
        let value = serde_json::to_value(&persisted)?;
        self.backend.write(&value).await?;

        tracing::info!(location = %self.backend.location(), "Settings saved");
        Ok(())
    }

    /// Apply persisted settings over the current values.
    ///
    /// An absent stored value leaves the current settings untouched. Desktop
    /// storage failures are logged and swallowed; local storage failures are
    /// returned.
    pub async fn load_settings(&self) -> SettingsResult<()> {
        let loaded = self.read_patch().await;

        let patch = match loaded {
            Ok(Some(patch)) => patch,
            Ok(None) => {
                tracing::debug!(location = %self.backend.location(), "No stored settings, keeping defaults");
                return Ok(());
            }
            Err(e) if self.backend.host() == StorageHost::Desktop => {
                tracing::warn!(
                    location = %self.backend.location(),
                    error = %e,
                    "Failed to load settings from desktop store"
                );
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        self.update(|settings| patch.apply(settings));
        tracing::info!(location = %self.backend.location(), "Settings loaded");
        Ok(())
    }

    async fn read_patch(&self) -> SettingsResult<Option<SettingsPatch>> {
        match self.backend.read().await? {
            Some(Value::Null) | None => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }
}
