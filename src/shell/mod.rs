//! Desktop shell primitives
//!
//! The file-save dialog and file writer are provided by the host shell. The
//! client only depends on these traits; the defaults here cover headless use.

mod dialog;
mod writer;

pub use dialog::{DialogFilter, FixedSaveDialog, PassThroughSaveDialog, SaveDialog, SaveDialogOptions};
pub use writer::{FileSink, FsFileSink};

use std::path::PathBuf;
use thiserror::Error;

/// Shell primitive errors
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Save dialog failed: {reason}")]
    DialogFailed { reason: String },

    #[error("Failed to write {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },
}

/// Result type for shell operations
pub type ShellResult<T> = Result<T, ShellError>;

/// Prompt for a location and write `bytes` there.
///
/// Returns the chosen path, or `None` when the user cancelled and nothing
/// was written.
pub async fn save_with_dialog(
    dialog: &dyn SaveDialog,
    sink: &dyn FileSink,
    default_path: &str,
    bytes: &[u8],
) -> ShellResult<Option<PathBuf>> {
    let chosen = dialog
        .save(SaveDialogOptions::for_download(default_path))
        .await?;

    match chosen {
        Some(path) => {
            sink.write_file(&path, bytes).await?;
            tracing::info!(path = %path.display(), size = bytes.len(), "File saved");
            Ok(Some(path))
        }
        None => {
            tracing::debug!(default_path, "Save cancelled");
            Ok(None)
        }
    }
}
