//! Semantic search session
//!
//! `SearchSession` keeps the current page of search results, the locally
//! selected collections and the pagination the UI binds to.

mod session;
#[cfg(test)]
mod tests;

pub use session::{SearchSession, SearchState};
