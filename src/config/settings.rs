//! User settings
//!
//! Connection and search preferences shown in the settings screen. Only the
//! connection subset (`PersistedSettings`) is written to durable storage.

use std::fmt;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::storage::SettingsError;

/// Colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
            Theme::System => write!(f, "system"),
        }
    }
}

impl FromStr for Theme {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            other => Err(SettingsError::Invalid(format!(
                "theme must be light, dark or system, got '{}'",
                other
            ))),
        }
    }
}

/// Full settings set
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Backend base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Value sent in the `X-API-Key` header
    #[serde(default)]
    pub api_key: String,

    /// Default directory offered by save dialogs
    #[serde(default)]
    pub download_path: String,

    #[serde(default)]
    pub theme: Theme,

    /// Default page size for searches
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,

    /// Default minimum relevance score
    #[serde(default = "default_score_threshold")]
    pub search_score_threshold: f64,

    /// Collection highlighted as the default one
    #[serde(default = "default_collection")]
    pub default_collection: String,

    /// Ignore the selected collections and search everything
    #[serde(default = "default_search_all")]
    pub search_all_collections: bool,
}

fn default_api_url() -> String {
    "https://localhost".to_string()
}

fn default_search_limit() -> u32 {
    20
}

fn default_score_threshold() -> f64 {
    0.5
}

fn default_collection() -> String {
    "default".to_string()
}

fn default_search_all() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: String::new(),
            download_path: String::new(),
            theme: Theme::default(),
            search_limit: default_search_limit(),
            search_score_threshold: default_score_threshold(),
            default_collection: default_collection(),
            search_all_collections: default_search_all(),
        }
    }
}

fn redacted(key: &str) -> &'static str {
    if key.is_empty() {
        ""
    } else {
        "[REDACTED]"
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_url", &self.api_url)
            .field("api_key", &redacted(&self.api_key))
            .field("download_path", &self.download_path)
            .field("theme", &self.theme)
            .field("search_limit", &self.search_limit)
            .field("search_score_threshold", &self.search_score_threshold)
            .field("default_collection", &self.default_collection)
            .field("search_all_collections", &self.search_all_collections)
            .finish()
    }
}

impl fmt::Debug for PersistedSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistedSettings")
            .field("api_url", &self.api_url)
            .field("api_key", &redacted(&self.api_key))
            .field("download_path", &self.download_path)
            .field("theme", &self.theme)
            .finish()
    }
}

impl Settings {
    /// The subset written by `save_settings`
    pub fn persisted(&self) -> PersistedSettings {
        PersistedSettings {
            api_url: self.api_url.clone(),
            api_key: self.api_key.clone(),
            download_path: self.download_path.clone(),
            theme: self.theme,
        }
    }
}

/// Connection subset stored on disk
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSettings {
    pub api_url: String,
    pub api_key: String,
    pub download_path: String,
    pub theme: Theme,
}

/// Stored settings object; every field it carries overrides the current value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub api_url: Option<String>,
    pub api_key: Option<SecretString>,
    pub download_path: Option<String>,
    pub theme: Option<Theme>,
    pub search_limit: Option<u32>,
    pub search_score_threshold: Option<f64>,
    pub default_collection: Option<String>,
    pub search_all_collections: Option<bool>,
}

impl SettingsPatch {
    pub fn apply(self, settings: &mut Settings) {
        if let Some(v) = self.api_url {
            settings.api_url = v;
        }
        if let Some(v) = self.api_key {
            settings.api_key = v.expose_secret().clone();
        }
        if let Some(v) = self.download_path {
            settings.download_path = v;
        }
        if let Some(v) = self.theme {
            settings.theme = v;
        }
        if let Some(v) = self.search_limit {
            settings.search_limit = v;
        }
        if let Some(v) = self.search_score_threshold {
            settings.search_score_threshold = v;
        }
        if let Some(v) = self.default_collection {
            settings.default_collection = v;
        }
        if let Some(v) = self.search_all_collections {
            settings.search_all_collections = v;
        }
    }
}
