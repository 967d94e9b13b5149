//! Settings Management Module
//!
//! Provides the user-facing settings with:
//! - In-memory store with change notification
//! - Explicit save/load against a storage backend chosen at startup
//! - Desktop (`settings.json`) and browser-style local storage backends

mod settings;
mod storage;
mod store;

pub use settings::{PersistedSettings, Settings, SettingsPatch, Theme};
pub use storage::{
    select_backend, DesktopStore, LocalStorage, MemoryBackend, SettingsBackend, SettingsError,
    SettingsResult, DESKTOP_STORE_FILE, DESKTOP_STORE_KEY, LOCAL_STORAGE_FILE, LOCAL_STORAGE_KEY,
};
pub use store::SettingsStore;
