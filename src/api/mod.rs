//! Search backend API
//!
//! Provides:
//! - `ApiClient`: one method per `/v2` capability
//! - `SecureTransport`: request primitive seam, with a reqwest implementation
//! - `ApiError`: per-operation failures with human-readable messages

mod client;
mod error;
mod transport;

pub use client::{
    ApiClient, ListFilesQuery, SearchQuery, DEFAULT_SCORE_THRESHOLD,
    DEFAULT_SEARCH_LIMIT, DEFAULT_SEARCH_PAGE,
};
pub use error::{ApiError, ApiOperation, ApiResult};
pub use transport::{
    FetchRequest, FetchResponse, HttpMethod, ReqwestTransport, SecureTransport, TransportError,
    UploadRequest, API_KEY_HEADER,
};
