//! Search backend API client
//!
//! One method per backend capability. Each call snapshots the current
//! settings (base URL, API key) before building its request, so settings
//! changes apply from the next call on.

use std::path::Path;
use std::sync::Arc;

use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::{ApiError, ApiOperation, ApiResult};
use super::transport::{
    FetchRequest, FetchResponse, HttpMethod, ReqwestTransport, SecureTransport, TransportError,
    UploadRequest,
};
use crate::config::{Settings, SettingsStore};
use crate::core::config::ClientConfig;
use crate::core::types::{
    CollectionsResponse, FileInfo, HealthStatus, JobHandle, JobStatus, PaginatedResponse,
    SearchResult,
};

/// Default page size for searches
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

/// Default page for searches
pub const DEFAULT_SEARCH_PAGE: u32 = 1;

/// Default minimum score for searches
pub const DEFAULT_SCORE_THRESHOLD: f64 = 0.5;

/// Filters for `list_files`; absent fields are left to the server
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilesQuery {
    /// Restrict to one collection; `None` lists all collections
    pub collection: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListFilesQuery {
    fn to_query_string(&self) -> String {
        let mut params = Vec::new();
        if let Some(collection) = &self.collection {
            params.push(format!("collection={}", urlencoding::encode(collection)));
        }
        if let Some(page) = self.page {
            params.push(format!("page={}", page));
        }
        if let Some(limit) = self.limit {
            params.push(format!("limit={}", limit));
        }

        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}

/// Parameters for `search`
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub query: String,
    /// `None` or empty searches every collection
    pub collections: Option<Vec<String>>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
    pub score_threshold: Option<f64>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            collections: None,
            limit: None,
            page: None,
            score_threshold: None,
        }
    }

    pub fn with_collections(mut self, collections: Option<Vec<String>>) -> Self {
        self.collections = collections;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_score_threshold(mut self, threshold: f64) -> Self {
        self.score_threshold = Some(threshold);
        self
    }

    fn to_body(&self) -> SearchBody<'_> {
        SearchBody {
            query: &self.query,
            collections: self
                .collections
                .as_deref()
                .filter(|collections| !collections.is_empty()),
            limit: self.limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
            page: self.page.unwrap_or(DEFAULT_SEARCH_PAGE),
            score_threshold: self.score_threshold.unwrap_or(DEFAULT_SCORE_THRESHOLD),
        }
    }
}

/// Wire body of `POST /v2/search`
#[derive(Debug, Serialize)]
struct SearchBody<'a> {
    query: &'a str,
    collections: Option<&'a [String]>,
    limit: u32,
    page: u32,
    score_threshold: f64,
}

/// Base URL and key captured at the start of a call
struct Endpoint {
    base_url: String,
    api_key: SecretString,
}

impl Endpoint {
    fn from_settings(settings: &Settings) -> Self {
        Self {
            base_url: settings.api_url.trim_end_matches('/').to_string(),
            api_key: SecretString::new(settings.api_key.clone()),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Client for the `/v2` search backend
#[derive(Clone)]
pub struct ApiClient {
    settings: SettingsStore,
    transport: Arc<dyn SecureTransport>,
}

impl ApiClient {
    /// Create a client over an injected transport
    pub fn new(settings: SettingsStore, transport: Arc<dyn SecureTransport>) -> Self {
        Self { settings, transport }
    }

    /// Create a client over the built-in reqwest transport
    pub fn with_config(settings: SettingsStore, config: &ClientConfig) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::new(settings, Arc::new(transport)))
    }

    /// Settings this client reads its endpoint from
    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::from_settings(&self.settings.snapshot())
    }

    /// Upload and index a file.
    ///
    /// With `update = false` the backend rejects files already indexed in the
    /// collection; with `true` it replaces them.
    pub async fn upload_file(
        &self,
        file_path: impl AsRef<Path>,
        file_name: &str,
        collection: &str,
        update: bool,
    ) -> ApiResult<JobHandle> {
        let op = ApiOperation::Upload;
        let endpoint = self.endpoint();
        let request = UploadRequest {
            url: endpoint.url("/v2/index"),
            api_key: endpoint.api_key.clone(),
            headers: Vec::new(),
            file_path: file_path.as_ref().to_path_buf(),
            file_name: file_name.to_string(),
            fields: vec![
                ("collection".to_string(), collection.to_string()),
                ("update".to_string(), update.to_string()),
            ],
        };

        tracing::debug!(%op, file_name, collection, update, "Uploading file");
        let response = self
            .transport
            .upload(request)
            .await
            .map_err(|e| log_failure(ApiError::from_transport(op, e)))?;
        let response = ensure_success(op, response)?;
        let job: JobHandle = decode(op, &response)?;

        tracing::info!(job_id = %job.job_id, file_name, collection, "Upload accepted");
        Ok(job)
    }

    /// Poll an indexing job
    pub async fn get_job_status(&self, job_id: &str) -> ApiResult<JobStatus> {
        let op = ApiOperation::Status;
        let path = format!("/v2/index/status/{}", urlencoding::encode(job_id));
        let response = self.send(op, HttpMethod::Get, &path, None).await?;
        decode(op, &response)
    }

    /// Backend health check
    pub async fn health_check(&self) -> ApiResult<HealthStatus> {
        let response = self
            .send(ApiOperation::HealthCheck, HttpMethod::Get, "/health", None)
            .await?;
        Ok(HealthStatus {
            status_code: response.status,
            body: response.text(),
        })
    }

    /// List one page of indexed files
    pub async fn list_files(&self, query: &ListFilesQuery) -> ApiResult<PaginatedResponse<FileInfo>> {
        let op = ApiOperation::List;
        let path = format!("/v2/files/{}", query.to_query_string());
        let response = self.send(op, HttpMethod::Get, &path, None).await?;
        decode(op, &response)
    }

    /// Fetch the raw bytes of an indexed file
    pub async fn download_file(&self, collection: &str, file_name: &str) -> ApiResult<Vec<u8>> {
        let path = format!(
            "/v2/files/{}/{}",
            urlencoding::encode(collection),
            urlencoding::encode(file_name)
        );
        let response = self
            .send(ApiOperation::Download, HttpMethod::Get, &path, None)
            .await?;
        Ok(response.body)
    }

    /// Schedule removal of a file from the index
    pub async fn delete_file(&self, collection: &str, file_name: &str) -> ApiResult<JobHandle> {
        let op = ApiOperation::Delete;
        let path = format!(
            "/v2/index/{}/{}",
            urlencoding::encode(collection),
            urlencoding::encode(file_name)
        );
        let response = self.send(op, HttpMethod::Delete, &path, None).await?;
        decode(op, &response)
    }

    /// Semantic search
    pub async fn search(&self, query: &SearchQuery) -> ApiResult<PaginatedResponse<SearchResult>> {
        let op = ApiOperation::Search;
        let body = serde_json::to_vec(&query.to_body())
            .map_err(|e| ApiError::new(op, None, format!("Failed to encode search request: {}", e)))?;
        let response = self.send(op, HttpMethod::Post, "/v2/search", Some(body)).await?;
        decode(op, &response)
    }

    /// List distinct collections
    pub async fn list_collections(&self) -> ApiResult<CollectionsResponse> {
        let op = ApiOperation::Collections;
        let response = self.send(op, HttpMethod::Get, "/v2/collections", None).await?;
        decode(op, &response)
    }

    /// Issue a request and reject non-2xx responses
    async fn send(
        &self,
        op: ApiOperation,
        method: HttpMethod,
        path: &str,
        json_body: Option<Vec<u8>>,
    ) -> ApiResult<FetchResponse> {
        let endpoint = self.endpoint();
        let mut headers = Vec::new();
        if json_body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }

        let request = FetchRequest {
            method,
            url: endpoint.url(path),
            api_key: endpoint.api_key.clone(),
            headers,
            body: json_body,
        };

        tracing::debug!(%op, method = method.as_str(), url = %request.url, "Sending request");
        let response = self
            .transport
            .fetch(request)
            .await
            .map_err(|e| log_failure(ApiError::from_transport(op, e)))?;

        ensure_success(op, response)
    }
}

fn ensure_success(op: ApiOperation, response: FetchResponse) -> ApiResult<FetchResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(log_failure(ApiError::from_response(op, &response)))
    }
}

fn decode<T: DeserializeOwned>(op: ApiOperation, response: &FetchResponse) -> ApiResult<T> {
    serde_json::from_slice(&response.body)
        .map_err(|e| log_failure(ApiError::decode(op, response.status, e)))
}

fn log_failure(err: ApiError) -> ApiError {
    tracing::warn!(
        op = %err.operation(),
        status = ?err.status(),
        error = %err,
        "API request failed"
    );
    err
}
