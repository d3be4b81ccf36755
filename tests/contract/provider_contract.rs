use std::sync::Arc;

use serde_json::{json, Value};
use shelfmark_core::{
    CursorUpdate, ExtractsAdapter, ProviderAdapter, ProviderId, RecommendationsAdapter,
    ReviewCountsAdapter, SearchFeedAdapter,
};

#[derive(Clone)]
struct ProviderCase {
    id: ProviderId,
    adapter: Arc<dyn ProviderAdapter>,
    single_page: bool,
}

fn provider_cases() -> Vec<ProviderCase> {
    vec![
        ProviderCase {
            id: ProviderId::Goodreads,
            adapter: Arc::new(ReviewCountsAdapter::default()),
            single_page: true,
        },
        ProviderCase {
            id: ProviderId::Tastekid,
            adapter: Arc::new(RecommendationsAdapter::default()),
            single_page: true,
        },
        ProviderCase {
            id: ProviderId::Panmacmillan,
            adapter: Arc::new(ExtractsAdapter::default()),
            single_page: false,
        },
        ProviderCase {
            id: ProviderId::Supadu,
            adapter: Arc::new(SearchFeedAdapter::default()),
            single_page: false,
        },
    ]
}

fn arbitrary_responses() -> Vec<Value> {
    vec![
        json!({"books": [{"isbn13": "9780000000001"}]}),
        json!({"Similar": {"Results": [{"Name": "Jane Doe"}]}}),
        json!({"NextPageUrl": "http://example.test/next", "PageCount": 7}),
        json!({"data": {"pagination": {"pages": {"current": 1, "total": 4, "next": 2}}}}),
    ]
}

#[test]
fn every_provider_reports_its_identity_and_an_http_endpoint() {
    for case in provider_cases() {
        assert_eq!(case.adapter.id(), case.id);
        assert!(
            case.adapter.base_endpoint().starts_with("http"),
            "provider '{}': endpoint {}",
            case.id,
            case.adapter.base_endpoint()
        );
    }
}

#[test]
fn single_page_providers_never_move_the_cursor() {
    for case in provider_cases().into_iter().filter(|case| case.single_page) {
        for response in arbitrary_responses() {
            assert_eq!(
                case.adapter
                    .compose_next_page_link(&response, "http://example.test/api?k=v"),
                CursorUpdate::Keep,
                "provider '{}'",
                case.id
            );
            assert_eq!(
                case.adapter.calculate_total_pages(&response),
                Some(1),
                "provider '{}'",
                case.id
            );
        }
    }
}

#[test]
fn paged_providers_clear_the_cursor_when_pagination_is_missing() {
    for case in provider_cases().into_iter().filter(|case| !case.single_page) {
        let response = json!({"unrelated": true});
        assert_eq!(
            case.adapter
                .compose_next_page_link(&response, "http://example.test/api"),
            CursorUpdate::Clear,
            "provider '{}'",
            case.id
        );
        assert_eq!(
            case.adapter.calculate_total_pages(&response),
            None,
            "provider '{}'",
            case.id
        );
    }
}

#[test]
fn extracts_feed_follows_the_server_supplied_link() {
    let adapter = ExtractsAdapter::default();

    let response = json!({"NextPageUrl": "http://example.test/getextracts?page=2", "PageCount": 3});
    assert_eq!(
        adapter.compose_next_page_link(&response, "ignored"),
        CursorUpdate::Set(String::from("http://example.test/getextracts?page=2"))
    );
    assert_eq!(adapter.calculate_total_pages(&response), Some(3));

    let last = json!({"NextPageUrl": "", "PageCount": "3"});
    assert_eq!(adapter.compose_next_page_link(&last, "ignored"), CursorUpdate::Clear);
    assert_eq!(adapter.calculate_total_pages(&last), Some(3));
}

#[test]
fn search_feed_appends_the_next_page_to_the_request_url() {
    let adapter = SearchFeedAdapter::default();
    let response =
        json!({"data": {"pagination": {"pages": {"current": "1", "total": "5", "next": "2"}}}});

    assert_eq!(
        adapter.compose_next_page_link(&response, "http://feed.test/search?keyword=space"),
        CursorUpdate::Set(String::from("http://feed.test/search?keyword=space&page=2"))
    );
    assert_eq!(
        adapter.compose_next_page_link(&response, "http://feed.test/search"),
        CursorUpdate::Set(String::from("http://feed.test/search?page=2"))
    );
    assert_eq!(adapter.calculate_total_pages(&response), Some(5));
}

#[test]
fn search_feed_stops_on_the_last_page() {
    let adapter = SearchFeedAdapter::default();
    let response = json!({"data": {"pagination": {"pages": {"current": 5, "total": 5, "next": 6}}}});

    assert_eq!(
        adapter.compose_next_page_link(&response, "http://feed.test/search"),
        CursorUpdate::Clear
    );
}

#[test]
fn search_feed_treats_zero_page_numbers_as_missing() {
    let adapter = SearchFeedAdapter::default();
    let response = json!({"data": {"pagination": {"pages": {"current": 1, "total": 0, "next": 0}}}});

    assert_eq!(
        adapter.compose_next_page_link(&response, "http://feed.test/search"),
        CursorUpdate::Clear
    );
    assert_eq!(adapter.calculate_total_pages(&response), Some(0));
}
