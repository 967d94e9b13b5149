//! Settings Storage Backends
//!
//! Provides durable storage for the persisted settings subset:
//! - `DesktopStore`: JSON document `settings.json`, value under key `"settings"`
//! - `LocalStorage`: browser-style string key/value document, key `"sfs-settings"`
//! - `MemoryBackend`: in-process storage for embedding and tests
//!
//! Writes to disk are atomic (temp file + rename).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::core::config::StorageHost;

/// Document key used by the desktop settings store
pub const DESKTOP_STORE_KEY: &str = "settings";

/// File name of the desktop settings store
pub const DESKTOP_STORE_FILE: &str = "settings.json";

/// Key used in local storage
pub const LOCAL_STORAGE_KEY: &str = "sfs-settings";

/// File backing the local storage emulation
pub const LOCAL_STORAGE_FILE: &str = "local_storage.json";

/// Settings error types
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid settings: {0}")]
    Invalid(String),

    #[error("Settings store corrupted at {path}: {reason}")]
    Corrupted { path: PathBuf, reason: String },
}

/// Settings result type
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Durable storage for the persisted settings object
#[async_trait]
pub trait SettingsBackend: Send + Sync {
    /// Which host capability this backend serves
    fn host(&self) -> StorageHost;

    /// Human-readable location, for logs
    fn location(&self) -> String;

    /// Read the stored settings object; `None` when nothing is stored
    async fn read(&self) -> SettingsResult<Option<Value>>;

    /// Replace the stored settings object
    async fn write(&self, value: &Value) -> SettingsResult<()>;
}

/// Pick the backend for the given host, once, at startup
pub fn select_backend(host: StorageHost, dir: &Path) -> Arc<dyn SettingsBackend> {
    match host {
        StorageHost::Desktop => Arc::new(DesktopStore::new(dir.join(DESKTOP_STORE_FILE))),
        StorageHost::Browser => Arc::new(LocalStorage::new(dir.join(LOCAL_STORAGE_FILE))),
    }
}

/// Desktop settings store: a JSON document of named entries
pub struct DesktopStore {
    path: PathBuf,
}

impl DesktopStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SettingsBackend for DesktopStore {
    fn host(&self) -> StorageHost {
        StorageHost::Desktop
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn read(&self) -> SettingsResult<Option<Value>> {
        let document = read_document(&self.path).await?;
        Ok(document
            .and_then(|mut doc| doc.remove(DESKTOP_STORE_KEY))
            .filter(|value| !value.is_null()))
    }

    async fn write(&self, value: &Value) -> SettingsResult<()> {
        let mut document = read_document(&self.path).await?.unwrap_or_default();
        document.insert(DESKTOP_STORE_KEY.to_string(), value.clone());
        write_document(&self.path, &document).await
    }
}

/// Browser-style local storage: string values under string keys
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw `getItem`
    pub async fn get_item(&self, key: &str) -> SettingsResult<Option<String>> {
        let document = read_document(&self.path).await?;
        match document.and_then(|mut doc| doc.remove(key)) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(SettingsError::Corrupted {
                path: self.path.clone(),
                reason: format!("entry '{}' is not a string: {}", key, other),
            }),
        }
    }

    /// Raw `setItem`
    pub async fn set_item(&self, key: &str, value: String) -> SettingsResult<()> {
        let mut document = read_document(&self.path).await?.unwrap_or_default();
        document.insert(key.to_string(), Value::String(value));
        write_document(&self.path, &document).await
    }
}

#[async_trait]
impl SettingsBackend for LocalStorage {
    fn host(&self) -> StorageHost {
        StorageHost::Browser
    }

    fn location(&self) -> String {
        format!("{}#{}", self.path.display(), LOCAL_STORAGE_KEY)
    }

    async fn read(&self) -> SettingsResult<Option<Value>> {
        let raw = match self.get_item(LOCAL_STORAGE_KEY).await? {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Ok(None),
        };

        // a stored `null` reads back as nothing stored
        match serde_json::from_str::<Value>(&raw)? {
            Value::Null => Ok(None),
            value => Ok(Some(value)),
        }
    }

    async fn write(&self, value: &Value) -> SettingsResult<()> {
        self.set_item(LOCAL_STORAGE_KEY, serde_json::to_string(value)?).await
    }
}

/// In-process backend; nothing survives the process
pub struct MemoryBackend {
    host: StorageHost,
    value: Mutex<Option<Value>>,
}

impl MemoryBackend {
    pub fn new(host: StorageHost) -> Self {
        Self {
            host,
            value: Mutex::new(None),
        }
    }

    /// Pre-populate the stored object
    pub fn with_value(self, value: Value) -> Self {
        *self.value.lock() = Some(value);
        self
    }

    /// Currently stored object
    pub fn stored(&self) -> Option<Value> {
        self.value.lock().clone()
    }
}

#[async_trait]
impl SettingsBackend for MemoryBackend {
    fn host(&self) -> StorageHost {
        self.host
    }

    fn location(&self) -> String {
        "memory".to_string()
    }

    async fn read(&self) -> SettingsResult<Option<Value>> {
        Ok(self.value.lock().clone())
    }

    async fn write(&self, value: &Value) -> SettingsResult<()> {
        *self.value.lock() = Some(value.clone());
        Ok(())
    }
}

/// Load a JSON object document; `None` if the file does not exist
async fn read_document(path: &Path) -> SettingsResult<Option<Map<String, Value>>> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    if content.trim().is_empty() {
        return Ok(Some(Map::new()));
    }

    match serde_json::from_str::<Value>(&content)? {
        Value::Object(map) => Ok(Some(map)),
        other => Err(SettingsError::Corrupted {
            path: path.to_path_buf(),
            reason: format!("expected a JSON object, found {}", json_kind(&other)),
        }),
    }
}

/// Save a JSON object document with atomic write
async fn write_document(path: &Path, document: &Map<String, Value>) -> SettingsResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let content = serde_json::to_string_pretty(document)?;

    // Write to temp file first
    let temp_path = path.with_extension("json.tmp");
    tokio::fs::write(&temp_path, &content).await?;

    // Atomic rename
    tokio::fs::rename(&temp_path, path).await?;

    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
