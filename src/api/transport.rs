//! Secure fetch / upload transport
//!
//! The desktop shell exposes request primitives that tolerate self-signed
//! certificates. `SecureTransport` is that seam; `ReqwestTransport` is the
//! in-process implementation.

use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::core::config::ClientConfig;

/// Authentication header sent with every request
pub const API_KEY_HEADER: &str = "X-API-Key";

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A plain request
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub method: HttpMethod,
    pub url: String,
    /// Sent as `X-API-Key`; exposed only when the request is sent
    pub api_key: SecretString,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

/// A multipart file upload
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub url: String,
    pub api_key: SecretString,
    pub headers: Vec<(String, String)>,
    /// Local file to send as the `file` part
    pub file_path: PathBuf,
    /// Name the file is sent under
    pub file_name: String,
    /// Additional text parts
    pub fields: Vec<(String, String)>,
}

/// Raw response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Failures below HTTP: the request produced no response
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Connection failed: {reason}")]
    Connect { reason: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Failed to read {path}: {reason}")]
    FileRead { path: PathBuf, reason: String },

    #[error("Request failed: {reason}")]
    Request { reason: String },

    #[error("Failed to create HTTP client: {reason}")]
    Build { reason: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect {
                reason: err.to_string(),
            }
        } else {
            TransportError::Request {
                reason: err.to_string(),
            }
        }
    }
}

/// Request primitive used by the API client
#[async_trait]
pub trait SecureTransport: Send + Sync {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, TransportError>;

    async fn upload(&self, request: UploadRequest) -> Result<FetchResponse, TransportError>;
}

/// reqwest-backed transport
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport honouring the configured timeout and certificate policy
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| TransportError::Build {
                reason: e.to_string(),
            })?;

        Ok(Self { client })
    }

    async fn into_response(response: reqwest::Response) -> Result<FetchResponse, TransportError> {
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(FetchResponse { status, body })
    }
}

#[async_trait]
impl SecureTransport for ReqwestTransport {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method.into(), &request.url)
            .header(API_KEY_HEADER, request.api_key.expose_secret().as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        Self::into_response(response).await
    }

    async fn upload(&self, request: UploadRequest) -> Result<FetchResponse, TransportError> {
        let data = tokio::fs::read(&request.file_path)
            .await
            .map_err(|e| TransportError::FileRead {
                path: request.file_path.clone(),
                reason: e.to_string(),
            })?;

        let part = reqwest::multipart::Part::bytes(data).file_name(request.file_name.clone());
        let mut form = reqwest::multipart::Form::new().part("file", part);
        for (name, value) in request.fields {
            form = form.text(name, value);
        }

        let mut builder = self
            .client
            .post(&request.url)
            .header(API_KEY_HEADER, request.api_key.expose_secret().as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.multipart(form).send().await?;
        Self::into_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        let ok = FetchResponse { status: 204, body: vec![] };
        let redirect = FetchResponse { status: 302, body: vec![] };
        let err = FetchResponse { status: 500, body: b"boom".to_vec() };
        assert!(ok.is_success());
        assert!(!redirect.is_success());
        assert!(!err.is_success());
        assert_eq!(err.text(), "boom");
    }

    #[test]
    fn test_request_debug_hides_api_key() {
        let request = FetchRequest {
            method: HttpMethod::Get,
            url: "https://localhost/health".to_string(),
            api_key: SecretString::new("super-secret".to_string()),
            headers: vec![],
            body: None,
        };
        let rendered = format!("{:?}", request);
        assert!(!rendered.contains("super-secret"));
        assert_eq!(request.api_key.expose_secret(), "super-secret");
    }

    #[test]
    fn test_method_names() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
        assert_eq!(reqwest::Method::from(HttpMethod::Post), reqwest::Method::POST);
    }

    #[test]
    fn test_transport_builds_with_default_config() {
        assert!(ReqwestTransport::new(&ClientConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_upload_missing_file_fails_before_sending() {
        let transport = ReqwestTransport::new(&ClientConfig::default()).unwrap();
        let err = transport
            .upload(UploadRequest {
                url: "https://localhost/v2/index".to_string(),
                api_key: SecretString::new("k".to_string()),
                headers: vec![],
                file_path: PathBuf::from("/definitely/not/here.txt"),
                file_name: "here.txt".to_string(),
                fields: vec![],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::FileRead { .. }));
    }
}
