//! SFS client - data layer of the SFS semantic file search desktop app
//!
//! This crate provides:
//! - A typed client for the `/v2` search backend (upload, list, download,
//!   delete, search, collections, job status, health)
//! - A settings store persisted to desktop or browser-style local storage
//! - State holders for the file browser, search and collections views,
//!   observable through `watch` channels
//! - Traits for the desktop shell's save dialog and file writer

pub mod api;
pub mod collections;
pub mod config;
pub mod core;
pub mod files;
pub mod logging;
pub mod search;
pub mod shell;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used items
pub use api::{ApiClient, ApiError, ListFilesQuery, SearchQuery, SecureTransport};
pub use collections::{CollectionsState, CollectionsView};
pub use config::{select_backend, Settings, SettingsStore, Theme};
pub use crate::core::config::{ClientConfig, StorageHost};
pub use crate::core::error::{Result, SfsError};
pub use crate::core::types::{FileInfo, PaginatedResponse, SearchResult};
pub use files::{FileManager, FilesState, LoadFilesOptions};
pub use search::{SearchSession, SearchState};
