//! Error types for the SFS client
//!
//! Each subsystem owns a `thiserror` enum; `SfsError` is the crate-wide
//! union used by the state holders and the binary.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::SettingsError;
use crate::shell::ShellError;

/// Result type alias for SFS client operations
pub type Result<T> = std::result::Result<T, SfsError>;

/// Main error type for the SFS client
#[derive(Error, Debug)]
pub enum SfsError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Shell(#[from] ShellError),

    /// Failure surfaced with an already normalized, user-facing message
    #[error("{0}")]
    Operation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SfsError {
    /// Wrap `err` as an `Operation` error, substituting `fallback` when its
    /// message is blank.
    pub fn normalized(err: &dyn std::fmt::Display, fallback: &str) -> Self {
        SfsError::Operation(message_or(err, fallback))
    }
}

/// Render `err`, or `fallback` if the rendering is blank
pub fn message_or(err: &dyn std::fmt::Display, fallback: &str) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
