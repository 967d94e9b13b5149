//! Client runtime configuration
//!
//! Settings that shape how the client talks to the outside world, as opposed
//! to the user-facing `Settings` persisted by the settings store.

use std::path::PathBuf;
use std::time::Duration;

/// Where persisted settings live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageHost {
    /// Running inside the desktop shell: secure settings store
    #[default]
    Desktop,
    /// Running without the shell: browser-style local storage
    Browser,
}

/// Runtime configuration for the client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Per-request timeout
    pub request_timeout: Duration,

    /// Accept self-signed or otherwise invalid TLS certificates
    pub accept_invalid_certs: bool,

    /// Storage backend selection
    pub storage_host: StorageHost,

    /// Directory holding persisted settings
    pub storage_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            accept_invalid_certs: true,
            storage_host: StorageHost::Desktop,
            storage_dir: default_storage_dir(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn with_storage_host(mut self, host: StorageHost) -> Self {
        self.storage_host = host;
        self
    }

    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }
}

/// Platform config directory for the app, falling back to the working directory
fn default_storage_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sfs")
}
