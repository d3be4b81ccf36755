//! Provider adapters.
//!
//! Each adapter supplies the provider's base endpoint and interprets its
//! responses: whether another page exists and how many pages there are.
//! Request parameters are assembled by the adapter's attribute constructors
//! and handed to [`crate::ResilientApiClient`] at construction.

pub mod extracts;
pub mod recommendations;
pub mod review_counts;
pub mod search_feed;

use serde_json::Value;

use crate::ProviderId;

pub use extracts::{ExtractsAdapter, ExtractsQuery};
pub use recommendations::RecommendationsAdapter;
pub use review_counts::ReviewCountsAdapter;
pub use search_feed::{SearchFeedAdapter, SearchQuery};

/// How a successful response changes the stored pagination cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorUpdate {
    /// Leave the stored cursor untouched.
    Keep,
    /// Store this fully-qualified next-page URL.
    Set(String),
    /// No further pages; drop any stored cursor.
    Clear,
}

/// Provider-specific behavior driven by the API client.
pub trait ProviderAdapter: Send + Sync {
    fn id(&self) -> ProviderId;

    fn base_endpoint(&self) -> &str;

    /// Derive the next-page cursor from a decoded response.
    ///
    /// `request_url` is the client's first-page request URL.
    fn compose_next_page_link(&self, response: &Value, request_url: &str) -> CursorUpdate;

    /// Total pages reported by the response; `None` when unknown.
    fn calculate_total_pages(&self, response: &Value) -> Option<u32>;
}

/// Read a page number that may arrive as a JSON number or a numeric string.
/// Zero, negative, and malformed values read as absent.
pub(crate) fn page_number(value: Option<&Value>) -> Option<u64> {
    let number = match value? {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    }?;

    (number > 0).then_some(number)
}

/// Read a page count, accepting zero.
pub(crate) fn page_count(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|count| *count >= 0.0).map(|count| count as u64))
            .map(|count| u32::try_from(count).unwrap_or(u32::MAX)),
        Value::String(text) => text.trim().parse::<u32>().ok(),
        _ => None,
    }
}
