use serde_json::Value;

use super::{page_count, page_number, CursorUpdate, ProviderAdapter};
use crate::{ProviderAttributes, ProviderId};

const SEARCH_URL: &str = "http://macmillan-folioservices.supadu.com/search";
const BOOK_URL: &str = "http://macmillan-folioservices.supadu.com/book/";

/// Parameters of a bookseller search feed request. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub keyword: Option<String>,
    pub page: Option<u32>,
    pub amount: Option<u32>,
    /// Collection seo name.
    pub collection: Option<String>,
}

/// Bookseller search feed adapter.
///
/// Pagination is derived from `data.pagination.pages`: the next-page URL is
/// the first-page request URL with a `page` parameter appended.
#[derive(Debug, Clone)]
pub struct SearchFeedAdapter {
    base_endpoint: String,
    book_endpoint: String,
}

impl Default for SearchFeedAdapter {
    fn default() -> Self {
        Self::with_endpoints(SEARCH_URL, BOOK_URL)
    }
}

impl SearchFeedAdapter {
    pub fn with_endpoints(
        base_endpoint: impl Into<String>,
        book_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            base_endpoint: base_endpoint.into(),
            book_endpoint: book_endpoint.into(),
        }
    }

    /// Authenticated search request attributes.
    pub fn attributes(auth_token: &str, query: &SearchQuery) -> ProviderAttributes {
        ProviderAttributes::builder()
            .header("x-apikey", auth_token)
            .header("Accept-Encoding", "gzip")
            .param("category_data", "1")
            .optional_param("keyword", query.keyword.clone())
            .optional_param("page", query.page.map(|page| page.to_string()))
            .optional_param("amount", query.amount.map(|amount| amount.to_string()))
            .optional_param("collection", query.collection.clone())
            .build()
    }

    /// URL of a single book lookup.
    pub fn book_url(&self, isbn: &str) -> String {
        format!("{}{}", self.book_endpoint, urlencoding::encode(isbn.trim()))
    }
}

impl ProviderAdapter for SearchFeedAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Supadu
    }

    fn base_endpoint(&self) -> &str {
        &self.base_endpoint
    }

    fn compose_next_page_link(&self, response: &Value, request_url: &str) -> CursorUpdate {
        let Some(pages) = response.pointer("/data/pagination/pages") else {
            return CursorUpdate::Clear;
        };

        let (Some(next), Some(total), Some(current)) = (
            page_number(pages.get("next")),
            page_number(pages.get("total")),
            page_number(pages.get("current")),
        ) else {
            return CursorUpdate::Clear;
        };

        if current >= total {
            return CursorUpdate::Clear;
        }

        let separator = if request_url.contains('?') { '&' } else { '?' };
        CursorUpdate::Set(format!("{request_url}{separator}page={next}"))
    }

    fn calculate_total_pages(&self, response: &Value) -> Option<u32> {
        page_count(response.pointer("/data/pagination/pages/total"))
    }
}
