//! Error types for the API client

use thiserror::Error;

use super::transport::{FetchResponse, TransportError};

/// Backend capability a request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    Upload,
    Status,
    HealthCheck,
    List,
    Download,
    Delete,
    Search,
    Collections,
}

impl ApiOperation {
    /// Message used when neither the transport nor the body explains a failure
    pub fn fallback_message(&self) -> &'static str {
        match self {
            ApiOperation::Upload => "Upload failed",
            ApiOperation::Status => "Failed to get job status",
            ApiOperation::HealthCheck => "Health check failed",
            ApiOperation::List => "Failed to list files",
            ApiOperation::Download => "Download failed",
            ApiOperation::Delete => "Failed to delete file",
            ApiOperation::Search => "Search failed",
            ApiOperation::Collections => "Failed to list collections",
        }
    }
}

impl std::fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ApiOperation::Upload => "upload",
            ApiOperation::Status => "job_status",
            ApiOperation::HealthCheck => "health_check",
            ApiOperation::List => "list_files",
            ApiOperation::Download => "download",
            ApiOperation::Delete => "delete",
            ApiOperation::Search => "search",
            ApiOperation::Collections => "list_collections",
        };
        write!(f, "{}", name)
    }
}

/// API failure, one variant per backend capability.
///
/// `Display` renders only the human-readable message; `status` is `None`
/// when the request never produced an HTTP response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("{message}")]
    Upload { status: Option<u16>, message: String },

    #[error("{message}")]
    Status { status: Option<u16>, message: String },

    #[error("{message}")]
    HealthCheck { status: Option<u16>, message: String },

    #[error("{message}")]
    List { status: Option<u16>, message: String },

    #[error("{message}")]
    Download { status: Option<u16>, message: String },

    #[error("{message}")]
    Delete { status: Option<u16>, message: String },

    #[error("{message}")]
    Search { status: Option<u16>, message: String },

    #[error("{message}")]
    Collections { status: Option<u16>, message: String },
}

impl ApiError {
    pub fn new(operation: ApiOperation, status: Option<u16>, message: impl Into<String>) -> Self {
        let message = message.into();
        match operation {
            ApiOperation::Upload => ApiError::Upload { status, message },
            ApiOperation::Status => ApiError::Status { status, message },
            ApiOperation::HealthCheck => ApiError::HealthCheck { status, message },
            ApiOperation::List => ApiError::List { status, message },
            ApiOperation::Download => ApiError::Download { status, message },
            ApiOperation::Delete => ApiError::Delete { status, message },
            ApiOperation::Search => ApiError::Search { status, message },
            ApiOperation::Collections => ApiError::Collections { status, message },
        }
    }

    pub fn operation(&self) -> ApiOperation {
        match self {
            ApiError::Upload { .. } => ApiOperation::Upload,
            ApiError::Status { .. } => ApiOperation::Status,
            ApiError::HealthCheck { .. } => ApiOperation::HealthCheck,
            ApiError::List { .. } => ApiOperation::List,
            ApiError::Download { .. } => ApiOperation::Download,
            ApiError::Delete { .. } => ApiOperation::Delete,
            ApiError::Search { .. } => ApiOperation::Search,
            ApiError::Collections { .. } => ApiOperation::Collections,
        }
    }

    /// HTTP status of the failed response, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Upload { status, .. }
            | ApiError::Status { status, .. }
            | ApiError::HealthCheck { status, .. }
            | ApiError::List { status, .. }
            | ApiError::Download { status, .. }
            | ApiError::Delete { status, .. }
            | ApiError::Search { status, .. }
            | ApiError::Collections { status, .. } => *status,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Upload { message, .. }
            | ApiError::Status { message, .. }
            | ApiError::HealthCheck { message, .. }
            | ApiError::List { message, .. }
            | ApiError::Download { message, .. }
            | ApiError::Delete { message, .. }
            | ApiError::Search { message, .. }
            | ApiError::Collections { message, .. } => message,
        }
    }

    /// Non-2xx response; the message comes from the body
    pub(crate) fn from_response(operation: ApiOperation, response: &FetchResponse) -> Self {
        let message = body_message(&response.body)
            .unwrap_or_else(|| format!("HTTP {}", response.status));
        Self::new(operation, Some(response.status), message)
    }

    /// The request never produced a response
    pub(crate) fn from_transport(operation: ApiOperation, err: TransportError) -> Self {
        let message = err.to_string();
        if message.trim().is_empty() {
            Self::new(operation, None, operation.fallback_message())
        } else {
            Self::new(operation, None, message)
        }
    }

    /// A 2xx response whose body did not match the expected shape
    pub(crate) fn decode(operation: ApiOperation, status: u16, err: serde_json::Error) -> Self {
        Self::new(
            operation,
            Some(status),
            format!("{}: invalid response body ({})", operation.fallback_message(), err),
        )
    }
}

/// Extract a human-readable message from an error body.
///
/// Prefers a JSON `detail`, `error` or `message` field, then the raw text.
fn body_message(body: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(text) {
        for key in ["detail", "error", "message"] {
            match map.get(key) {
                Some(serde_json::Value::String(s)) if !s.trim().is_empty() => {
                    return Some(s.trim().to_string())
                }
                Some(serde_json::Value::Null) | None => {}
                Some(serde_json::Value::String(_)) => {}
                Some(other) => return Some(other.to_string()),
            }
        }
    }

    Some(text.to_string())
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
