//! Indexed file types
//!
//! Defines the file metadata reported by the `/v2/files` endpoints.

use serde::{Deserialize, Serialize};

#[cfg(test)]
use proptest_derive::Arbitrary;

/// A file indexed in one collection on the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(Arbitrary))]
pub struct FileInfo {
    /// Collection the file belongs to
    #[cfg_attr(test, proptest(strategy = "\"[a-z]{1,8}\""))]
    pub collection: String,

    /// Bare file name
    #[cfg_attr(test, proptest(strategy = "\"[a-zA-Z0-9_.]{1,16}\""))]
    pub name: String,

    /// Stable key, `collection/name`
    #[cfg_attr(test, proptest(strategy = "\"[a-zA-Z0-9_./]{1,24}\""))]
    pub path: String,
}

impl FileInfo {
    /// Build a file entry with the canonical `collection/name` path
    pub fn new(collection: impl Into<String>, name: impl Into<String>) -> Self {
        let collection = collection.into();
        let name = name.into();
        let path = file_key(&collection, &name);
        Self { collection, name, path }
    }

    /// Case-insensitive substring match against `path` or `name`.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.path.to_lowercase().contains(needle) || self.name.to_lowercase().contains(needle)
    }
}

/// Identity key of a file within the backend: `collection/name`
pub fn file_key(collection: &str, name: &str) -> String {
    format!("{}/{}", collection, name)
}
