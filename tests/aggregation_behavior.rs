//! End-to-end behavior of the book aggregator over a real catalog.
//!
//! These tests go from caller criteria to display-ready entries: composed
//! query, freshness ranking, author reconciliation, and image resolution.

use std::fs;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use shelfmark_catalog::{
    BookSourceKind, BooksellerBook, Catalog, CatalogConfig, FormatLink, PublisherBook,
};
use shelfmark_core::{
    AgeRange, AggregateError, BookAggregator, Filter, FormatRestriction, FreshnessShuffleRanker,
    HttpClient, HttpError, HttpRequest, HttpResponse, LocalImageCache, QueryCriteria,
    RecommendationsAdapter, ValidationError,
};
use tempfile::{tempdir, TempDir};

struct Fixture {
    temp: TempDir,
    catalog: Arc<Catalog>,
    images: LocalImageCache,
}

impl Fixture {
    fn new() -> Self {
        let temp = tempdir().expect("tempdir");
        let catalog = Catalog::open(CatalogConfig::in_home(temp.path())).expect("catalog open");
        let images = LocalImageCache::in_home(temp.path(), "http://books.test");
        Self {
            temp,
            catalog: Arc::new(catalog),
            images,
        }
    }

    fn aggregator(&self) -> BookAggregator {
        BookAggregator::new(self.catalog.clone(), Arc::new(self.images.clone()))
    }

    fn cache_image(&self, source: BookSourceKind, file: &str) {
        let dir = self.images.dir(source);
        fs::create_dir_all(dir).expect("image dir");
        fs::write(dir.join(file), b"jpeg").expect("image file");
    }
}

fn bookseller(id: i64, isbn13: &str) -> BooksellerBook {
    BooksellerBook {
        id,
        isbn13: isbn13.to_owned(),
        title: Some(format!("Bookseller title {id}")),
        ..BooksellerBook::default()
    }
}

fn publisher(id: i64, isbn13: &str) -> PublisherBook {
    PublisherBook {
        id,
        isbn13: isbn13.to_owned(),
        title: Some(format!("Publisher title {id}")),
        ..PublisherBook::default()
    }
}

// =============================================================================
// Ranking
// =============================================================================

#[test]
fn when_browsing_a_genre_the_two_newest_books_lead_the_carousel() {
    let fixture = Fixture::new();
    let dates = [
        "2024-03-01",
        "2024-02-01",
        "2023-01-01",
        "2023-01-01",
        "2023-01-01",
        "2023-01-01",
        "2023-01-01",
        "2023-01-01",
    ];
    let books = dates
        .iter()
        .enumerate()
        .map(|(index, date)| {
            let id = index as i64 + 1;
            BooksellerBook {
                publication_date: Some((*date).to_owned()),
                ..bookseller(id, &format!("978000000000{id}"))
            }
        })
        .collect::<Vec<_>>();
    fixture.catalog.ingest_bookseller_books(&books).expect("ingest");
    for book in &books {
        fixture
            .catalog
            .link_categories(&book.isbn13, &["fiction", "thriller"])
            .expect("categories");
    }

    for seed in 0..10 {
        let entries = fixture
            .aggregator()
            .with_ranker(FreshnessShuffleRanker::with_seed(seed))
            .fiction(
                &QueryCriteria::new()
                    .with_filter(Filter::Genre(String::from("thriller")))
                    .with_limit(5),
            )
            .expect("fiction carousel");

        assert_eq!(entries.len(), 5, "seed {seed}");
        assert_eq!(entries[0].isbn13, "9780000000001", "seed {seed}");
        assert_eq!(entries[1].isbn13, "9780000000002", "seed {seed}");

        let mut isbns = entries.iter().map(|entry| entry.isbn13.clone()).collect::<Vec<_>>();
        isbns.sort();
        isbns.dedup();
        assert_eq!(isbns.len(), 5, "seed {seed}: no repeated books");
    }
}

#[test]
fn when_no_filter_or_sort_is_given_browse_lists_oldest_first() {
    let fixture = Fixture::new();
    fixture
        .catalog
        .ingest_bookseller_books(&[
            BooksellerBook {
                publication_date: Some(String::from("2022-06-01")),
                ..bookseller(1, "9780000000001")
            },
            BooksellerBook {
                publication_date: Some(String::from("2019-06-01")),
                ..bookseller(2, "9780000000002")
            },
            BooksellerBook {
                publication_date: Some(String::from("2021-06-01")),
                ..bookseller(3, "9780000000003")
            },
        ])
        .expect("ingest");

    let entries = fixture
        .aggregator()
        .browse(&QueryCriteria::new())
        .expect("browse");

    assert_eq!(
        entries.iter().map(|entry| entry.isbn13.as_str()).collect::<Vec<_>>(),
        vec!["9780000000002", "9780000000003", "9780000000001"]
    );
}

#[test]
fn age_carousel_only_returns_books_for_that_age() {
    let fixture = Fixture::new();
    fixture
        .catalog
        .ingest_bookseller_books(&[
            BooksellerBook {
                age_from: Some(7),
                ..bookseller(1, "9780000000001")
            },
            BooksellerBook {
                age_from: Some(9),
                ..bookseller(2, "9780000000002")
            },
            BooksellerBook {
                age_from: Some(14),
                ..bookseller(3, "9780000000003")
            },
        ])
        .expect("ingest");

    let entries = fixture
        .aggregator()
        .age_based(&QueryCriteria::new().with_age(AgeRange::between(6, 10)))
        .expect("age carousel");

    let mut isbns = entries.iter().map(|entry| entry.isbn13.as_str()).collect::<Vec<_>>();
    isbns.sort();
    assert_eq!(isbns, vec!["9780000000001", "9780000000002"]);
}

// =============================================================================
// Reconciliation
// =============================================================================

#[test]
fn author_falls_back_to_the_publisher_field_without_linked_authors() {
    let fixture = Fixture::new();
    fixture
        .catalog
        .ingest_publisher_books(&[
            PublisherBook {
                author: Some(String::from("Jane Doe")),
                ..publisher(1, "9780000000001")
            },
            PublisherBook {
                author: Some(String::from("Ignored Name")),
                ..publisher(2, "9780000000002")
            },
        ])
        .expect("publisher ingest");
    fixture
        .catalog
        .ingest_bookseller_books(&[BooksellerBook {
            authors: vec![String::from("Ann Able"), String::from("Bo Best")],
            ..bookseller(20, "9780000000002")
        }])
        .expect("bookseller ingest");
    fixture
        .catalog
        .link_collections("9780000000001", &["staff-picks"])
        .expect("collections");
    fixture
        .catalog
        .link_collections("9780000000002", &["staff-picks"])
        .expect("collections");

    let mut entries = fixture
        .aggregator()
        .collection("staff-picks", 0, 5)
        .expect("collection");
    entries.sort_by(|left, right| left.isbn13.cmp(&right.isbn13));

    assert_eq!(entries[0].author.as_deref(), Some("Jane Doe"));
    assert_eq!(entries[0].title, "Publisher title 1");
    assert_eq!(entries[1].author.as_deref(), Some("Ann Able, Bo Best"));
    assert_eq!(entries[1].title, "Publisher title 2");
}

#[test]
fn cached_publisher_image_wins_over_everything_else() {
    let fixture = Fixture::new();
    fixture.cache_image(BookSourceKind::Publisher, "p1.jpg");
    fixture.cache_image(BookSourceKind::Bookseller, "b1.jpg");
    fixture.cache_image(BookSourceKind::Bookseller, "b2.jpg");

    fixture
        .catalog
        .ingest_publisher_books(&[
            PublisherBook {
                stored_image: Some(String::from("p1.jpg")),
                jacket_url: Some(String::from("http://remote.test/p1.jpg")),
                ..publisher(1, "9780000000001")
            },
            PublisherBook {
                stored_image: Some(String::from("missing.jpg")),
                jacket_url: Some(String::from("http://remote.test/p2.jpg")),
                ..publisher(2, "9780000000002")
            },
            PublisherBook {
                stored_image: Some(String::from("missing.jpg")),
                jacket_url: Some(String::from("http://remote.test/p3.jpg")),
                ..publisher(3, "9780000000003")
            },
        ])
        .expect("publisher ingest");
    fixture
        .catalog
        .ingest_bookseller_books(&[
            BooksellerBook {
                stored_image: Some(String::from("b1.jpg")),
                ..bookseller(11, "9780000000001")
            },
            BooksellerBook {
                stored_image: Some(String::from("b2.jpg")),
                ..bookseller(12, "9780000000002")
            },
        ])
        .expect("bookseller ingest");

    let mut entries = fixture
        .aggregator()
        .latest(&QueryCriteria::new())
        .expect("latest");
    entries.sort_by(|left, right| left.isbn13.cmp(&right.isbn13));

    let urls = entries
        .iter()
        .map(|entry| entry.image_url.as_deref())
        .collect::<Vec<_>>();
    assert_eq!(
        urls,
        vec![
            Some("http://books.test/images/publisher/p1.jpg"),
            Some("http://books.test/images/bookseller/b2.jpg"),
            Some("http://remote.test/p3.jpg"),
        ]
    );
    assert!(fixture.temp.path().join("images").is_dir());
}

#[test]
fn paper_only_detail_links_to_the_paper_edition() {
    let fixture = Fixture::new();
    fixture
        .catalog
        .ingest_publisher_books(&[PublisherBook {
            keynote: Some(String::from("<p>A &amp; B go <b>north</b>.</p>")),
            extract_html: Some(String::from("<p>Chapter one</p>")),
            ..publisher(1, "9780000000001")
        }])
        .expect("ingest");
    fixture
        .catalog
        .link_formats(&[FormatLink {
            source: BookSourceKind::Publisher,
            isbn13: String::from("9780000000001"),
            format: String::from("BB"),
            format_isbn13: String::from("9780000000999"),
        }])
        .expect("formats");

    let aggregator = fixture.aggregator();
    let detail = aggregator
        .book_detail("9780000000001", FormatRestriction::PaperOnly)
        .expect("detail")
        .expect("book exists");
    assert_eq!(detail.description, "A & B go north.");
    assert!(detail.extract_exists);
    assert!(detail.store_url.ends_with("field-keywords=9780000000999"));

    let any = aggregator
        .book_detail("9780000000001", FormatRestriction::Any)
        .expect("detail")
        .expect("book exists");
    assert!(any.store_url.ends_with("field-keywords=9780000000001"));

    let extract = aggregator
        .extract_view("9780000000001", FormatRestriction::Any)
        .expect("extract")
        .expect("book exists");
    assert_eq!(extract.extract, "Chapter one");
    assert_eq!(
        extract.read_more_url.as_deref(),
        Some("http://extracts.panmacmillan.com/extract?isbn=9780000000001")
    );

    assert_eq!(
        aggregator
            .book_detail("9789999999999", FormatRestriction::Any)
            .expect("detail"),
        None
    );
}

// =============================================================================
// Similar authors
// =============================================================================

struct FixedHttp {
    body: &'static str,
}

impl HttpClient for FixedHttp {
    fn execute<'a>(
        &'a self,
        _request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let body = self.body;
        Box::pin(async move { Ok(HttpResponse::ok_json(body)) })
    }
}

#[tokio::test]
async fn similar_authors_are_limited_to_authors_in_the_catalog() {
    let fixture = Fixture::new();
    fixture
        .catalog
        .ingest_publisher_books(&[
            PublisherBook {
                author: Some(String::from("Zed Zane")),
                ..publisher(1, "9780000000001")
            },
            PublisherBook {
                author: Some(String::from("Ann Able")),
                ..publisher(2, "9780000000002")
            },
        ])
        .expect("ingest");

    let http = Arc::new(FixedHttp {
        body: r#"{"Similar": {"Info": [], "Results": [
            {"Name": "Zed Zane", "Type": "author"},
            {"Name": "Not In Catalog", "Type": "author"},
            {"Name": "Ann Able", "Type": "author"}
        ]}}"#,
    });
    let mut client = RecommendationsAdapter::similar_authors_client(http, "key", "Jane Doe");

    let authors = fixture
        .aggregator()
        .similar_authors(&mut client, &QueryCriteria::new().with_limit(3))
        .await
        .expect("similar authors");

    assert_eq!(authors, vec![String::from("Ann Able"), String::from("Zed Zane")]);
}

#[tokio::test]
async fn similar_authors_is_empty_when_the_service_knows_nobody() {
    let fixture = Fixture::new();
    let http = Arc::new(FixedHttp { body: "{}" });
    let mut client = RecommendationsAdapter::similar_authors_client(http, "key", "Jane Doe");

    let authors = fixture
        .aggregator()
        .similar_authors(&mut client, &QueryCriteria::new())
        .await
        .expect("similar authors");

    assert!(authors.is_empty());
}

#[tokio::test]
async fn similar_authors_lists_each_recommended_author_once_and_nobody_else() {
    let fixture = Fixture::new();
    fixture
        .catalog
        .ingest_publisher_books(&[
            PublisherBook {
                author: Some(String::from("Bea Writer")),
                ..publisher(1, "9780000000001")
            },
            PublisherBook {
                author: Some(String::from("Bea Writer")),
                ..publisher(2, "9780000000002")
            },
        ])
        .expect("publisher ingest");
    fixture
        .catalog
        .ingest_bookseller_books(&[BooksellerBook {
            authors: vec![String::from("Bea Writer"), String::from("Ivy Illustrator")],
            ..bookseller(20, "9780000000002")
        }])
        .expect("bookseller ingest");

    let http = Arc::new(FixedHttp {
        body: r#"{"Similar": {"Results": [{"Name": "Bea Writer", "Type": "author"}]}}"#,
    });
    let mut client = RecommendationsAdapter::similar_authors_client(http, "key", "Jane Doe");

    let authors = fixture
        .aggregator()
        .similar_authors(&mut client, &QueryCriteria::new().with_limit(10))
        .await
        .expect("similar authors");

    assert_eq!(authors, vec![String::from("Bea Writer")]);
}

#[test]
fn age_carousel_rejects_ranges_wider_than_a_lifetime() {
    let fixture = Fixture::new();

    let error = fixture
        .aggregator()
        .age_based(&QueryCriteria::new().with_age(AgeRange::between(0, i32::MAX)))
        .expect_err("range too wide");

    assert!(matches!(
        error,
        AggregateError::Validation(ValidationError::AgeRangeTooWide { from: 0, .. })
    ));
}
