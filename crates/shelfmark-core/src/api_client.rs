//! Resilient API client shared by every provider integration.
//!
//! The client owns the retry policy and the pagination cursor; everything
//! provider-specific is delegated to its [`ProviderAdapter`].
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use shelfmark_core::adapters::ExtractsAdapter;
//! use shelfmark_core::{ExtractsQuery, ReqwestHttpClient, ResilientApiClient};
//!
//! # async fn run() -> Result<(), shelfmark_core::ApiError> {
//! let query = ExtractsQuery {
//!     author_contains: Some(String::from("Doe")),
//!     ..ExtractsQuery::default()
//! };
//! let mut client = ResilientApiClient::new(
//!     Arc::new(ReqwestHttpClient::new()),
//!     Arc::new(ExtractsAdapter::default()),
//!     query.to_attributes(),
//! );
//!
//! let first = client.fetch_first_page().await?;
//! println!("{:?} pages", client.total_pages(&first));
//! while client.has_next_page() {
//!     let page = client.fetch_next_page().await?;
//!     println!("{page}");
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::adapters::{CursorUpdate, ProviderAdapter};
use crate::http_client::{HttpClient, HttpError, HttpRequest, DEFAULT_TIMEOUT_MS};
use crate::retry::RetryConfig;
use crate::ProviderAttributes;

/// Errors returned by [`ResilientApiClient`] fetches.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Every attempt returned a non-success status.
    #[error("upstream returned status {status} after {attempts} attempts")]
    Exhausted { status: u16, attempts: u32 },

    #[error("transport error: {0}")]
    Transport(HttpError),

    /// Success status, but the body is not a non-empty JSON object or array.
    #[error("upstream returned an empty response body")]
    EmptyResponse,

    #[error("no next page to fetch")]
    NoNextPage,
}

/// Generic API client with bounded retries and pagination continuation.
pub struct ResilientApiClient {
    http: Arc<dyn HttpClient>,
    adapter: Arc<dyn ProviderAdapter>,
    attributes: ProviderAttributes,
    retry: RetryConfig,
    timeout_ms: u64,
    next_page_link: String,
}

impl ResilientApiClient {
    pub fn new(
        http: Arc<dyn HttpClient>,
        adapter: Arc<dyn ProviderAdapter>,
        attributes: ProviderAttributes,
    ) -> Self {
        Self {
            http,
            adapter,
            attributes,
            retry: RetryConfig::default(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            next_page_link: String::new(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn adapter(&self) -> &dyn ProviderAdapter {
        self.adapter.as_ref()
    }

    pub fn attributes(&self) -> &ProviderAttributes {
        &self.attributes
    }

    /// First-page URL: `<base>?<encoded params>`.
    pub fn request_url(&self) -> String {
        format!(
            "{}?{}",
            self.adapter.base_endpoint(),
            self.attributes.query_string()
        )
    }

    /// Stored next-page URL, if any.
    pub fn next_page_link(&self) -> Option<&str> {
        (!self.next_page_link.is_empty()).then_some(self.next_page_link.as_str())
    }

    pub fn has_next_page(&self) -> bool {
        !self.next_page_link.is_empty()
    }

    /// Total pages reported by `response`; `None` when unknown.
    pub fn total_pages(&self, response: &Value) -> Option<u32> {
        self.adapter.calculate_total_pages(response)
    }

    pub async fn fetch_first_page(&mut self) -> Result<Value, ApiError> {
        let url = self.request_url();
        self.fetch_url(&url).await
    }

    /// Fetch the stored next page. Fails with [`ApiError::NoNextPage`] without
    /// issuing a request when no cursor is stored.
    pub async fn fetch_next_page(&mut self) -> Result<Value, ApiError> {
        if self.next_page_link.is_empty() {
            return Err(ApiError::NoNextPage);
        }

        let url = self.next_page_link.clone();
        self.fetch_url(&url).await
    }

    /// Fetch an arbitrary URL with this client's headers, options, and retry policy.
    pub async fn fetch_url(&mut self, url: &str) -> Result<Value, ApiError> {
        let response = self.execute_with_retry(url).await?;

        let update = self
            .adapter
            .compose_next_page_link(&response, &self.request_url());
        self.apply_cursor(update);

        Ok(response)
    }

    fn apply_cursor(&mut self, update: CursorUpdate) {
        match update {
            CursorUpdate::Keep => {}
            CursorUpdate::Set(link) => self.next_page_link = link,
            CursorUpdate::Clear => self.next_page_link.clear(),
        }
    }

    fn build_request(&self, url: &str) -> HttpRequest {
        let mut request = HttpRequest::new(self.attributes.method(), url)
            .with_options(self.attributes.options())
            .with_timeout_ms(self.timeout_ms);
        for (name, value) in self.attributes.headers() {
            request = request.with_header(name.as_str(), value.as_str());
        }
        request
    }

    async fn execute_with_retry(&self, url: &str) -> Result<Value, ApiError> {
        let provider = self.adapter.id();
        let mut state = self.retry.start();

        loop {
            state.begin_attempt();
            tracing::debug!(%provider, attempt = state.attempts(), "issuing provider request");

            match self.http.execute(self.build_request(url)).await {
                Ok(response) if self.retry.is_success(response.status) => {
                    return decode_body(&response.body);
                }
                Ok(response) => {
                    if !state.can_retry() {
                        tracing::warn!(
                            %provider,
                            status = response.status,
                            attempts = state.attempts(),
                            "provider retries exhausted"
                        );
                        return Err(ApiError::Exhausted {
                            status: response.status,
                            attempts: state.attempts(),
                        });
                    }
                    tracing::warn!(
                        %provider,
                        status = response.status,
                        attempt = state.attempts(),
                        "provider request failed, retrying"
                    );
                }
                Err(error) if error.retryable() && state.can_retry() => {
                    tracing::warn!(
                        %provider,
                        error = %error,
                        attempt = state.attempts(),
                        "provider transport failed, retrying"
                    );
                }
                Err(error) => {
                    tracing::warn!(%provider, error = %error, attempts = state.attempts(), "provider transport failed");
                    return Err(ApiError::Transport(error));
                }
            }
        }
    }
}

fn decode_body(body: &str) -> Result<Value, ApiError> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) if !map.is_empty() => Ok(Value::Object(map)),
        Ok(Value::Array(items)) if !items.is_empty() => Ok(Value::Array(items)),
        _ => Err(ApiError::EmptyResponse),
    }
}
