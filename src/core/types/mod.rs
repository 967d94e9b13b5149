//! Core data types for the SFS client
//!
//! Wire-level structures reported by the search backend. All of them are
//! replaced wholesale on each fetch and never mutated client-side.

pub mod file;
pub mod job;
pub mod pagination;
pub mod search;

// Re-export commonly used types
pub use file::{file_key, FileInfo};
pub use job::{CollectionsResponse, HealthStatus, JobHandle, JobStatus};
pub use pagination::PaginatedResponse;
pub use search::{bare_file_name, SearchPayload, SearchResult};
