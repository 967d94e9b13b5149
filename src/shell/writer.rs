//! File writer

use std::path::Path;

use async_trait::async_trait;

use super::{ShellError, ShellResult};

/// Write raw bytes to a path chosen by the user
#[async_trait]
pub trait FileSink: Send + Sync {
    async fn write_file(&self, path: &Path, bytes: &[u8]) -> ShellResult<()>;
}

/// Writes through the local file system
#[derive(Debug, Default, Clone)]
pub struct FsFileSink;

#[async_trait]
impl FileSink for FsFileSink {
    async fn write_file(&self, path: &Path, bytes: &[u8]) -> ShellResult<()> {
        tokio::fs::write(path, bytes)
            .await
            .map_err(|e| ShellError::WriteFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }
}
