use std::sync::Arc;

use serde_json::Value;

use super::{CursorUpdate, ProviderAdapter};
use crate::{HttpClient, ProviderAttributes, ProviderId, ResilientApiClient};

const RECOMMENDATIONS_URL: &str = "https://www.tastekid.com/api/similar";

/// Recommendation service adapter. Single page.
#[derive(Debug, Clone)]
pub struct RecommendationsAdapter {
    base_endpoint: String,
}

impl Default for RecommendationsAdapter {
    fn default() -> Self {
        Self::with_base_endpoint(RECOMMENDATIONS_URL)
    }
}

impl RecommendationsAdapter {
    pub fn with_base_endpoint(base_endpoint: impl Into<String>) -> Self {
        Self {
            base_endpoint: base_endpoint.into(),
        }
    }

    /// Ask for items similar to `query`, e.g. `kind = "authors"`.
    ///
    /// The service is queried with certificate verification disabled and a streamed body.
    pub fn attributes(api_key: &str, query: &str, kind: &str) -> ProviderAttributes {
        ProviderAttributes::builder()
            .param("k", api_key)
            .param("q", query)
            .param("type", kind)
            .stream(true)
            .verify_tls(false)
            .build()
    }

    /// Client asking for authors similar to `author`.
    pub fn similar_authors_client(
        http: Arc<dyn HttpClient>,
        api_key: &str,
        author: &str,
    ) -> ResilientApiClient {
        ResilientApiClient::new(
            http,
            Arc::new(Self::default()),
            Self::attributes(api_key, author, "authors"),
        )
    }

    /// Names listed under `Similar.Results[].Name`.
    pub fn result_names(response: &Value) -> Vec<String> {
        response
            .pointer("/Similar/Results")
            .and_then(Value::as_array)
            .map(|results| {
                results
                    .iter()
                    .filter_map(|result| result.get("Name").and_then(Value::as_str))
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl ProviderAdapter for RecommendationsAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Tastekid
    }

    fn base_endpoint(&self) -> &str {
        &self.base_endpoint
    }

    fn compose_next_page_link(&self, _response: &Value, _request_url: &str) -> CursorUpdate {
        CursorUpdate::Keep
    }

    fn calculate_total_pages(&self, _response: &Value) -> Option<u32> {
        Some(1)
    }
}
