//! Search result types
//!
//! Chunk-level hits returned by `POST /v2/search`.

use serde::{Deserialize, Serialize};

/// Single search hit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    /// Relevance score
    pub score: f64,

    /// Collection the source file belongs to
    pub collection: String,

    /// Matched chunk
    pub payload: SearchPayload,
}

/// Matched chunk of a source file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchPayload {
    /// Path of the source file as stored by the backend
    pub file_path: String,

    /// Chunk text
    pub text: String,

    /// Start offset into the source file
    pub start: u64,

    /// End offset into the source file
    pub end: u64,

    /// Position of the chunk within its file
    pub chunk_index: u32,
}

impl SearchResult {
    /// Bare file name of the hit's source file
    pub fn file_name(&self) -> &str {
        bare_file_name(&self.payload.file_path)
    }
}

/// Derive a bare file name from a backend path, splitting on `/` and `\`.
///
/// Falls back to `"download"` when the path has no usable final segment.
pub fn bare_file_name(file_path: &str) -> &str {
    file_path
        .rsplit(&['/', '\\'][..])
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("download")
}
