use serde_json::Value;

use super::{CursorUpdate, ProviderAdapter};
use crate::{ProviderAttributes, ProviderId};

const REVIEW_COUNTS_URL: &str = "https://www.goodreads.com/book/review_counts.json";

/// Review-count service adapter. Single page.
#[derive(Debug, Clone)]
pub struct ReviewCountsAdapter {
    base_endpoint: String,
}

impl Default for ReviewCountsAdapter {
    fn default() -> Self {
        Self::with_base_endpoint(REVIEW_COUNTS_URL)
    }
}

impl ReviewCountsAdapter {
    pub fn with_base_endpoint(base_endpoint: impl Into<String>) -> Self {
        Self {
            base_endpoint: base_endpoint.into(),
        }
    }

    /// Request review counts for the given ISBNs.
    pub fn attributes(api_key: &str, isbns: &[impl AsRef<str>]) -> ProviderAttributes {
        let isbns = isbns
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(",");

        ProviderAttributes::builder()
            .param("key", api_key)
            .param("isbns", isbns)
            .build()
    }
}

impl ProviderAdapter for ReviewCountsAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Goodreads
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

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn isbns_are_comma_joined() {
        let attributes =
            ReviewCountsAdapter::attributes("k-123", &["9780000000001", "9780000000002"]);

        assert_eq!(attributes.param("key"), Some("k-123"));
        assert_eq!(
            attributes.param("isbns"),
            Some("9780000000001,9780000000002")
        );
    }

    #[test]
    fn always_one_page_and_never_moves_the_cursor() {
        let adapter = ReviewCountsAdapter::default();
        let response = json!({"books": [{"isbn13": "9780000000001", "work_ratings_count": 12}]});

        assert_eq!(adapter.calculate_total_pages(&response), Some(1));
        assert_eq!(adapter.calculate_total_pages(&json!({})), Some(1));
        assert_eq!(
            adapter.compose_next_page_link(&response, REVIEW_COUNTS_URL),
            CursorUpdate::Keep
        );
    }
}
