//! Job, health and collection response types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Handle of an asynchronous backend job (index or delete)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobHandle {
    pub job_id: String,
}

/// Reported state of a backend job
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobStatus {
    pub job_id: String,

    /// Backend-defined state name
    pub status: String,

    /// Any further fields the backend reports
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Result of the health check
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status_code: u16,
    pub body: String,
}

/// Distinct collections known to the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CollectionsResponse {
    #[serde(default)]
    pub collections: Vec<String>,
    #[serde(default)]
    pub count: u64,
}
