//! Scripted fakes of the external collaborators, shared by unit tests

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tokio::sync::Notify;

use crate::api::{
    ApiClient, FetchRequest, FetchResponse, HttpMethod, SecureTransport, TransportError,
    UploadRequest, API_KEY_HEADER,
};
use crate::config::{MemoryBackend, SettingsStore};
use crate::core::config::StorageHost;
use crate::core::types::{FileInfo, PaginatedResponse};
use crate::shell::{FileSink, SaveDialog, SaveDialogOptions, ShellError, ShellResult};

pub const BASE_URL: &str = "https://localhost";

/// Canned reply for one request
#[derive(Clone)]
pub enum Reply {
    Json(u16, Value),
    Bytes(u16, Vec<u8>),
    Fail(String),
    /// Wait for the notify before producing the inner reply
    Gated(Arc<Notify>, Box<Reply>),
}

/// A request as the transport saw it
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    pub upload: Option<UploadRequest>,
}

impl Recorded {
    pub fn path(&self) -> &str {
        let rest = self.url.strip_prefix(BASE_URL).unwrap_or(&self.url);
        rest.split('?').next().unwrap_or(rest)
    }

    pub fn query(&self) -> Option<&str> {
        self.url.split_once('?').map(|(_, q)| q)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Transport answering from per-route queues; the last reply of a route repeats
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(HttpMethod, String), VecDeque<Reply>>>,
    requests: Mutex<Vec<Recorded>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, method: HttpMethod, path: &str, reply: Reply) {
        self.routes
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    fn next_reply(&self, method: HttpMethod, url: &str) -> Reply {
        let rest = url.strip_prefix(BASE_URL).unwrap_or(url);
        let path = rest.split('?').next().unwrap_or(rest).to_string();
        let mut routes = self.routes.lock();
        match routes.get_mut(&(method, path)) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_else(not_found),
            Some(queue) => queue.front().cloned().unwrap_or_else(not_found),
            None => not_found(),
        }
    }

    async fn resolve(reply: Reply) -> Result<FetchResponse, TransportError> {
        let mut reply = reply;
        loop {
            match reply {
                Reply::Json(status, value) => {
                    return Ok(FetchResponse {
                        status,
                        body: serde_json::to_vec(&value).unwrap_or_default(),
                    })
                }
                Reply::Bytes(status, body) => return Ok(FetchResponse { status, body }),
                Reply::Fail(reason) => return Err(TransportError::Connect { reason }),
                Reply::Gated(gate, inner) => {
                    gate.notified().await;
                    reply = *inner;
                }
            }
        }
    }
}

fn not_found() -> Reply {
    Reply::Json(404, json!({"detail": "Not Found"}))
}

/// Headers as they would go on the wire, key included
fn sent_headers(api_key: &SecretString, headers: &[(String, String)]) -> Vec<(String, String)> {
    let mut sent = vec![(API_KEY_HEADER.to_string(), api_key.expose_secret().clone())];
    sent.extend(headers.iter().cloned());
    sent
}

#[async_trait]
impl SecureTransport for MockTransport {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, TransportError> {
        let body = request
            .body
            .as_ref()
            .and_then(|b| serde_json::from_slice::<Value>(b).ok());
        self.requests.lock().push(Recorded {
            method: request.method,
            url: request.url.clone(),
            headers: sent_headers(&request.api_key, &request.headers),
            body,
            upload: None,
        });
        let reply = self.next_reply(request.method, &request.url);
        Self::resolve(reply).await
    }

    async fn upload(&self, request: UploadRequest) -> Result<FetchResponse, TransportError> {
        self.requests.lock().push(Recorded {
            method: HttpMethod::Post,
            url: request.url.clone(),
            headers: sent_headers(&request.api_key, &request.headers),
            body: None,
            upload: Some(request.clone()),
        });
        let reply = self.next_reply(HttpMethod::Post, &request.url);
        Self::resolve(reply).await
    }
}

/// Dialog answering with a fixed choice and recording what it was asked
pub struct RecordingDialog {
    answer: Option<PathBuf>,
    pub asked: Mutex<Vec<SaveDialogOptions>>,
}

impl RecordingDialog {
    pub fn answering(answer: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            answer: answer.map(PathBuf::from),
            asked: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl SaveDialog for RecordingDialog {
    async fn save(&self, options: SaveDialogOptions) -> ShellResult<Option<PathBuf>> {
        self.asked.lock().push(options);
        Ok(self.answer.clone())
    }
}

/// File sink recording writes in memory
#[derive(Default)]
pub struct RecordingSink {
    pub writes: Mutex<Vec<(PathBuf, Vec<u8>)>>,
    pub fail: bool,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            writes: Mutex::new(Vec::new()),
            fail: true,
        })
    }
}

#[async_trait]
impl FileSink for RecordingSink {
    async fn write_file(&self, path: &Path, bytes: &[u8]) -> ShellResult<()> {
        if self.fail {
            return Err(ShellError::WriteFailed {
                path: path.to_path_buf(),
                reason: "disk full".to_string(),
            });
        }
        self.writes.lock().push((path.to_path_buf(), bytes.to_vec()));
        Ok(())
    }
}

/// Settings store with defaults and in-memory persistence
pub fn test_settings() -> SettingsStore {
    SettingsStore::new(Arc::new(MemoryBackend::new(StorageHost::Desktop)))
}

pub fn test_client(transport: Arc<MockTransport>) -> ApiClient {
    ApiClient::new(test_settings(), transport)
}

/// JSON of a `PaginatedResponse` with consistent flags
pub fn page_json<T: serde::Serialize>(items: Vec<T>, total: u64, page: u32, limit: u32, total_pages: u32) -> Value {
    serde_json::to_value(PaginatedResponse::new(items, total, page, limit, total_pages))
        .unwrap_or(Value::Null)
}

pub fn file_list(collection: &str, names: &[&str]) -> Vec<FileInfo> {
    names.iter().map(|n| FileInfo::new(collection, *n)).collect()
}
