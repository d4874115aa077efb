//! Remote API client for Dropbox Paper.
//!
//! All endpoints are POSTs under a common base URL and always carry the bearer
//! credential. RPC-style endpoints take a JSON body and answer with JSON; the
//! content download takes its arguments in the `Dropbox-API-Arg` header and
//! answers with raw text.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::config::ApiConfig;
use crate::contract::{DocList, FolderInfo, Metadata, PaperApi};
use crate::error::{PaperError, Result};

pub const API_ARG_HEADER: &str = "dropbox-api-arg";
pub const EXPORT_FORMAT: &str = "markdown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    ListDocs,
    GetFolderInfo,
    GetMetadata,
    Download,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::ListDocs => "docs/list",
            Endpoint::GetFolderInfo => "docs/get_folder_info",
            Endpoint::GetMetadata => "docs/get_metadata",
            Endpoint::Download => "docs/download",
        }
    }
}

/// Successful response of [`PaperClient::call`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// Parsed body of a request that carried a JSON body.
    Json(Value),
    /// Raw body of a request sent without one.
    Text(String),
}

/// `reqwest`-backed implementation of [`PaperApi`].
pub struct PaperClient {
    http: Client,
    base_url: String,
    token: String,
}

impl PaperClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                error!(error = ?e, "Failed to build HTTP client");
                PaperError::Config(format!("failed to build HTTP client: {e}"))
            })?;
        let base_url = config.base_url.trim_end_matches('/').to_string();
        info!(
            base_url = %base_url,
            timeout_secs = config.timeout.as_secs(),
            token_set = !config.token.is_empty(),
            "Initialised Paper API client"
        );
        Ok(PaperClient {
            http,
            base_url,
            token: config.token,
        })
    }

    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }

    /// Perform one authenticated POST.
    ///
    /// With a body, the body is sent as JSON and the response parsed as JSON.
    /// Without one, the response is returned as text. A non-success status
    /// becomes [`PaperError::Api`] carrying the response body.
    pub async fn call(
        &self,
        endpoint: Endpoint,
        body: Option<&Value>,
        headers: HeaderMap,
    ) -> Result<ApiResponse> {
        match body {
            Some(body) => self.call_json(endpoint, body, headers).await.map(ApiResponse::Json),
            None => self.call_text(endpoint, headers).await.map(ApiResponse::Text),
        }
    }

    /// POST a JSON body and parse the JSON answer.
    pub async fn call_json(
        &self,
        endpoint: Endpoint,
        body: &Value,
        headers: HeaderMap,
    ) -> Result<Value> {
        let url = self.endpoint_url(endpoint);
        let text = self.send(&url, Some(body), headers).await?;
        serde_json::from_str(&text).map_err(|source| {
            error!(error = ?source, url = %url, "Paper API returned invalid JSON");
            PaperError::Decode {
                endpoint: url,
                source,
            }
        })
    }

    /// POST without a body and return the raw answer.
    pub async fn call_text(&self, endpoint: Endpoint, headers: HeaderMap) -> Result<String> {
        let url = self.endpoint_url(endpoint);
        self.send(&url, None, headers).await
    }

    async fn send(&self, url: &str, body: Option<&Value>, headers: HeaderMap) -> Result<String> {
        debug!(url = %url, has_body = body.is_some(), "Calling Paper API");

        let mut request = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .headers(headers);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|source| {
            error!(error = ?source, url = %url, "Failed to reach Paper API");
            PaperError::Transport {
                endpoint: url.to_string(),
                source,
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|source| {
            error!(error = ?source, url = %url, "Failed to read Paper API response body");
            PaperError::Transport {
                endpoint: url.to_string(),
                source,
            }
        })?;

        if !status.is_success() {
            error!(
                status = %status,
                url = %url,
                "Paper API returned error. Response body: {text}"
            );
            return Err(PaperError::Api {
                endpoint: url.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }

    async fn rpc<T: DeserializeOwned>(&self, endpoint: Endpoint, body: Value) -> Result<T> {
        let value = self.call_json(endpoint, &body, HeaderMap::new()).await?;
        serde_json::from_value(value).map_err(|source| {
            error!(error = ?source, endpoint = endpoint.path(), "Unexpected Paper API response shape");
            PaperError::Decode {
                endpoint: self.endpoint_url(endpoint),
                source,
            }
        })
    }
}

#[async_trait]
impl PaperApi for PaperClient {
    async fn list_docs(&self) -> Result<DocList> {
        let list: DocList = self.rpc(Endpoint::ListDocs, json!({})).await?;
        if list.has_more {
            warn!(
                count = list.doc_ids.len(),
                "Document list is truncated; only the first page is synchronised"
            );
        }
        info!(count = list.doc_ids.len(), "Listed Paper documents");
        Ok(list)
    }

    async fn get_folder_info(&self, doc_id: &str) -> Result<FolderInfo> {
        self.rpc(Endpoint::GetFolderInfo, json!({ "doc_id": doc_id }))
            .await
    }

    async fn get_metadata(&self, doc_id: &str) -> Result<Metadata> {
        self.rpc(Endpoint::GetMetadata, json!({ "doc_id": doc_id }))
            .await
    }

    async fn download_markdown(&self, doc_id: &str) -> Result<String> {
        let arg = json!({ "doc_id": doc_id, "export_format": EXPORT_FORMAT }).to_string();
        let value = HeaderValue::from_str(&arg).map_err(|e| PaperError::InvalidRequest {
            endpoint: self.endpoint_url(Endpoint::Download),
            reason: format!("{API_ARG_HEADER} header for {doc_id}: {e}"),
        })?;
        let mut headers = HeaderMap::new();
        headers.insert(API_ARG_HEADER, value);

        self.call_text(Endpoint::Download, headers).await
    }
}
