//! Quill REST API connector
//!
//! Implements `DocumentSource` over the Quill collaboration platform's REST
//! API via the `HttpClient` abstraction.

use async_trait::async_trait;
use bytes::Bytes;
use docsync_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use docsync_traits::{
    ConnectorError, DocumentSource, FolderChildren, Item, ItemKind, Result, RetryPolicy,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::QuillError;
use crate::types::{FolderResponse, ThreadContentResponse, ThreadEnvelope};

/// Maximum thread ids per metadata batch request (API limit)
const MAX_BATCH_SIZE: usize = 100;

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Quill API connector
///
/// All requests carry the bearer token and go through
/// [`execute_with_retry`](QuillConnector::execute_with_retry), which backs
/// off on rate limiting and server errors.
pub struct QuillConnector {
    http_client: Arc<dyn HttpClient>,

    /// API base URL without trailing slash, e.g. `https://platform.quill.example.com`
    base_url: String,

    /// API access token
    access_token: String,

    retry: RetryPolicy,
}

impl QuillConnector {
    pub fn new(http_client: Arc<dyn HttpClient>, base_url: String, access_token: String) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Execute a GET request with backoff on 429 and server errors.
    ///
    /// Client errors other than 429 return immediately; retrying a request
    /// the API has already rejected cannot succeed.
    #[instrument(skip(self), fields(url = %url))]
    async fn execute_with_retry(&self, url: String) -> std::result::Result<HttpResponse, QuillError> {
        let mut attempt = 0u32;

        loop {
            let request = HttpRequest::new(HttpMethod::Get, url.clone())
                .bearer_token(&self.access_token)
                .header("Accept", "application/json")
                .timeout(REQUEST_TIMEOUT);

            let outcome = self.http_client.execute(request).await;

            let retriable_message = match outcome {
                Ok(response) if response.status == 200 => {
                    debug!(status = response.status, "API request succeeded");
                    return Ok(response);
                }
                Ok(response) if response.status == 429 || response.is_server_error() => {
                    format!("status {}", response.status)
                }
                Ok(response) if response.status == 404 => {
                    return Err(QuillError::NotFound(url));
                }
                Ok(response) if response.status == 401 || response.status == 403 => {
                    return Err(QuillError::AuthenticationFailed(format!(
                        "status {}",
                        response.status
                    )));
                }
                Ok(response) => {
                    return Err(QuillError::ApiError {
                        status_code: response.status,
                        message: String::from_utf8_lossy(&response.body).to_string(),
                    });
                }
                Err(e) => e.to_string(),
            };

            attempt += 1;
            if attempt >= self.retry.max_attempts {
                warn!(attempts = attempt, error = %retriable_message, "API request failed, retries exhausted");
                return Err(QuillError::RateLimitExceeded(format!(
                    "Request failed after {} attempts: {}",
                    attempt, retriable_message
                )));
            }

            let delay = self.retry.delay_for(attempt);
            warn!(
                attempt,
                max_attempts = self.retry.max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %retriable_message,
                "API request failed, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Map the API's thread type string onto an item kind.
    fn convert_kind(kind: &str) -> ItemKind {
        match kind {
            "DOCUMENT" | "THREAD" => ItemKind::Document,
            "SPREADSHEET" => ItemKind::Spreadsheet,
            other => {
                warn!(kind = %other, "Unrecognized thread type");
                ItemKind::Other
            }
        }
    }

    fn convert_thread(envelope: ThreadEnvelope) -> Item {
        let thread = envelope.thread;
        let link_value = if thread.link.is_empty() {
            thread.id.clone()
        } else {
            thread.link.clone()
        };

        Item {
            id: thread.id,
            title: thread.title,
            kind: Self::convert_kind(&thread.kind),
            link_value,
            updated_usec: thread.updated_usec,
            author_id: thread.author_id,
        }
    }
}

#[async_trait]
impl DocumentSource for QuillConnector {
    #[instrument(skip(self), fields(folder_id = %folder_id))]
    async fn list_folder_children(&self, folder_id: &str) -> Result<FolderChildren> {
        let url = format!(
            "{}/1/folders/{}",
            self.base_url,
            urlencoding::encode(folder_id)
        );

        let response = self.execute_with_retry(url).await.map_err(ConnectorError::from)?;

        let folder: FolderResponse = serde_json::from_slice(&response.body).map_err(|e| {
            QuillError::ParseError(format!("Failed to parse folder response: {}", e))
        })?;

        let mut children = FolderChildren::default();
        for child in folder.children {
            if let Some(thread_id) = child.thread_id {
                children.child_item_ids.push(thread_id);
            } else if let Some(folder_id) = child.folder_id {
                children.child_folder_ids.push(folder_id);
            }
        }

        debug!(
            folders = children.child_folder_ids.len(),
            items = children.child_item_ids.len(),
            "Listed folder"
        );
        Ok(children)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn fetch_item_metadata_batch(&self, ids: &[String]) -> Result<HashMap<String, Item>> {
        let mut items = HashMap::with_capacity(ids.len());

        for chunk in ids.chunks(MAX_BATCH_SIZE) {
            let joined = chunk.join(",");
            let url = format!(
                "{}/2/threads/?ids={}",
                self.base_url,
                urlencoding::encode(&joined)
            );

            let response = self.execute_with_retry(url).await.map_err(ConnectorError::from)?;

            let batch: HashMap<String, ThreadEnvelope> = serde_json::from_slice(&response.body)
                .map_err(|e| {
                    QuillError::ParseError(format!("Failed to parse thread batch: {}", e))
                })?;

            for (id, envelope) in batch {
                items.insert(id, Self::convert_thread(envelope));
            }
        }

        info!(requested = ids.len(), resolved = items.len(), "Fetched thread metadata");
        Ok(items)
    }

    #[instrument(skip(self), fields(item_id = %id))]
    async fn fetch_item_content(&self, id: &str) -> Result<Bytes> {
        let url = format!("{}/1/threads/{}", self.base_url, urlencoding::encode(id));

        let response = self.execute_with_retry(url).await.map_err(ConnectorError::from)?;

        let content: ThreadContentResponse = serde_json::from_slice(&response.body).map_err(|e| {
            QuillError::ParseError(format!("Failed to parse thread content: {}", e))
        })?;

        debug!(bytes = content.html.len(), "Fetched thread content");
        Ok(Bytes::from(content.html))
    }

    fn max_metadata_batch_size(&self) -> usize {
        MAX_BATCH_SIZE
    }
}
