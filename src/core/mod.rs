//! SFS client core module
//!
//! This module contains:
//! - Client runtime configuration
//! - Error types
//! - Wire data types

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used items
pub use config::{ClientConfig, StorageHost};
pub use error::{SfsError, Result};
