//! Save-location dialog

use std::path::PathBuf;

use async_trait::async_trait;

use super::ShellResult;

/// File type filter shown by the dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl DialogFilter {
    /// The catch-all filter offered for downloads
    pub fn all_files() -> Self {
        Self {
            name: "All Files".to_string(),
            extensions: vec!["*".to_string()],
        }
    }
}

/// Options for a save dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveDialogOptions {
    /// Suggested file path or bare file name
    pub default_path: String,
    pub filters: Vec<DialogFilter>,
}

impl SaveDialogOptions {
    /// Options used when saving a downloaded file
    pub fn for_download(default_path: impl Into<String>) -> Self {
        Self {
            default_path: default_path.into(),
            filters: vec![DialogFilter::all_files()],
        }
    }
}

/// Ask the user where to save a file
#[async_trait]
pub trait SaveDialog: Send + Sync {
    /// Chosen path, or `None` when the user cancels
    async fn save(&self, options: SaveDialogOptions) -> ShellResult<Option<PathBuf>>;
}

/// Non-interactive dialog that accepts the suggested path as-is
#[derive(Debug, Default, Clone)]
pub struct PassThroughSaveDialog;

#[async_trait]
impl SaveDialog for PassThroughSaveDialog {
    async fn save(&self, options: SaveDialogOptions) -> ShellResult<Option<PathBuf>> {
        if options.default_path.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(PathBuf::from(options.default_path)))
    }
}

/// Non-interactive dialog that always answers with the same path
#[derive(Debug, Clone)]
pub struct FixedSaveDialog {
    path: PathBuf,
}

impl FixedSaveDialog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SaveDialog for FixedSaveDialog {
    async fn save(&self, _options: SaveDialogOptions) -> ShellResult<Option<PathBuf>> {
        Ok(Some(self.path.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pass_through_returns_default_path() {
        let dialog = PassThroughSaveDialog;
        let chosen = dialog
            .save(SaveDialogOptions::for_download("/tmp/a.txt"))
            .await
            .unwrap();
        assert_eq!(chosen, Some(PathBuf::from("/tmp/a.txt")));
    }

    #[tokio::test]
    async fn test_pass_through_blank_default_cancels() {
        let dialog = PassThroughSaveDialog;
        let chosen = dialog.save(SaveDialogOptions::for_download("")).await.unwrap();
        assert!(chosen.is_none());
    }

    #[tokio::test]
    async fn test_fixed_dialog_ignores_suggestion() {
        let dialog = FixedSaveDialog::new("/out/file.bin");
        let chosen = dialog
            .save(SaveDialogOptions::for_download("other.txt"))
            .await
            .unwrap();
        assert_eq!(chosen, Some(PathBuf::from("/out/file.bin")));
    }

    #[test]
    fn test_download_options_use_all_files_filter() {
        let options = SaveDialogOptions::for_download("a.txt");
        assert_eq!(options.filters, vec![DialogFilter::all_files()]);
        assert_eq!(options.filters[0].extensions, vec!["*".to_string()]);
    }
}
