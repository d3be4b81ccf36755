use serde_json::Value;

use super::{page_count, CursorUpdate, ProviderAdapter};
use crate::{ProviderAttributes, ProviderId};

const EXTRACTS_URL: &str = "http://extracts.panmacmillan.com/getextracts";

/// Filters accepted by the publisher extracts feed. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractsQuery {
    pub title_contains: Option<String>,
    pub author_contains: Option<String>,
    pub isbn: Option<String>,
    pub reading_time_less_than: Option<u32>,
    pub reading_time_greater_than: Option<u32>,
    /// ISO-8601 date.
    pub publication_date_less_than: Option<String>,
    /// ISO-8601 date.
    pub publication_date_greater_than: Option<String>,
}

impl ExtractsQuery {
    pub fn to_attributes(&self) -> ProviderAttributes {
        ProviderAttributes::builder()
            .optional_param("titlecontains", self.title_contains.clone())
            .optional_param("authorcontains", self.author_contains.clone())
            .optional_param("isbn", self.isbn.clone())
            .optional_param(
                "readingtimelessthan",
                self.reading_time_less_than.map(|minutes| minutes.to_string()),
            )
            .optional_param(
                "readingtimegreaterthan",
                self.reading_time_greater_than.map(|minutes| minutes.to_string()),
            )
            .optional_param(
                "publicationdatelessthan",
                self.publication_date_less_than.clone(),
            )
            .optional_param(
                "publicationdategreaterthan",
                self.publication_date_greater_than.clone(),
            )
            .build()
    }
}

/// Publisher extracts feed adapter.
///
/// The feed returns its own `NextPageUrl` and `PageCount`.
#[derive(Debug, Clone)]
pub struct ExtractsAdapter {
    base_endpoint: String,
}

impl Default for ExtractsAdapter {
    fn default() -> Self {
        Self::with_base_endpoint(EXTRACTS_URL)
    }
}

impl ExtractsAdapter {
    pub fn with_base_endpoint(base_endpoint: impl Into<String>) -> Self {
        Self {
            base_endpoint: base_endpoint.into(),
        }
    }
}

impl ProviderAdapter for ExtractsAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Panmacmillan
    }

    fn base_endpoint(&self) -> &str {
        &self.base_endpoint
    }

    fn compose_next_page_link(&self, response: &Value, _request_url: &str) -> CursorUpdate {
        match response.get("NextPageUrl").and_then(Value::as_str) {
            Some(url) if !url.is_empty() => CursorUpdate::Set(url.to_owned()),
            _ => CursorUpdate::Clear,
        }
    }

    fn calculate_total_pages(&self, response: &Value) -> Option<u32> {
        page_count(response.get("PageCount"))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn only_set_filters_become_params() {
        let query = ExtractsQuery {
            author_contains: Some(String::from("Doe")),
            reading_time_less_than: Some(15),
            ..ExtractsQuery::default()
        };
        let attributes = query.to_attributes();

        assert_eq!(attributes.params().len(), 2);
        assert_eq!(attributes.param("authorcontains"), Some("Doe"));
        assert_eq!(attributes.param("readingtimelessthan"), Some("15"));
    }

    #[test]
    fn next_page_url_is_taken_verbatim() {
        let adapter = ExtractsAdapter::default();
        let response = json!({"NextPageUrl": "http://extracts.test/getextracts?page=2", "PageCount": 4});

        assert_eq!(
            adapter.compose_next_page_link(&response, EXTRACTS_URL),
            CursorUpdate::Set(String::from("http://extracts.test/getextracts?page=2"))
        );
        assert_eq!(adapter.calculate_total_pages(&response), Some(4));
    }

    #[test]
    fn missing_or_empty_next_page_url_clears_the_cursor() {
        let adapter = ExtractsAdapter::default();

        for response in [
            json!({"NextPageUrl": ""}),
            json!({"NextPageUrl": null}),
            json!({"PageCount": 1}),
        ] {
            assert_eq!(
                adapter.compose_next_page_link(&response, EXTRACTS_URL),
                CursorUpdate::Clear
            );
        }
    }

    #[test]
    fn missing_page_count_is_unknown() {
        let adapter = ExtractsAdapter::default();
        assert_eq!(adapter.calculate_total_pages(&json!({"Extracts": []})), None);
        assert_eq!(adapter.calculate_total_pages(&json!({"PageCount": 0})), Some(0));
    }
}
