//! File browser state
//!
//! `FileManager` holds one page of indexed files plus the busy markers the UI
//! binds to, and exposes load / paginate / delete / download commands.

mod manager;

pub use manager::{FileManager, FilesState, LoadFilesOptions, DEFAULT_PAGE_LIMIT};
