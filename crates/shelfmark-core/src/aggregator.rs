//! Book aggregation: criteria to ranked, reconciled carousel entries.
//!
//! | Entry point | Ordering |
//! |-------------|----------|
//! | [`BookAggregator::latest`] | newest first unless a sort is given |
//! | [`BookAggregator::browse`] | see below |
//! | [`BookAggregator::age_based`] | freshness ranking unless a filter or sort is given |
//! | [`BookAggregator::collection`] | engine order |
//!
//! `browse` (and `fiction` / `non_fiction`, which force the fiction flag):
//! with neither filter nor sort, books come oldest first; with a filter but
//! no sort, the two newest lead and the rest are shuffled; otherwise the
//! composed query runs as given.

use std::sync::Arc;

use serde::Serialize;
use shelfmark_catalog::{BookRow, BookSourceKind, CatalogError, SortDirection};
use thiserror::Error;

use crate::adapters::RecommendationsAdapter;
use crate::api_client::{ApiError, ResilientApiClient};
use crate::book_source::BookSource;
use crate::composer::BookQueryComposer;
use crate::criteria::{FormatRestriction, QueryCriteria, SortKind};
use crate::images::ImageStore;
use crate::ranker::FreshnessShuffleRanker;
use crate::text::{clean_html, shorten, DESCRIPTION_LENGTH, TITLE_LENGTH};
use crate::ValidationError;

const STORE_SEARCH_URL: &str =
    "https://www.amazon.co.uk/s/ref=nb_sb_noss?url=search-alias%3Daps&x=0&y=0&field-keywords=";
const EXTRACT_PAGE_URL: &str = "http://extracts.panmacmillan.com/extract?isbn=";

/// Errors returned by aggregation entry points.
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Display-ready book reconciled across both sources.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarouselEntry {
    pub isbn13: String,
    pub author: Option<String>,
    pub image_url: Option<String>,
    pub title: String,
    pub price: Option<f64>,
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookDetail {
    pub isbn13: String,
    pub description: String,
    pub store_url: String,
    pub extract_exists: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractView {
    pub isbn13: String,
    pub extract: String,
    pub store_url: String,
    /// Publisher extract page; only for books the publisher feed knows.
    pub read_more_url: Option<String>,
}

/// Orchestrates composition, ranking, execution, and projection.
#[derive(Clone)]
pub struct BookAggregator {
    source: Arc<dyn BookSource>,
    images: Arc<dyn ImageStore>,
    ranker: FreshnessShuffleRanker,
}

impl BookAggregator {
    pub fn new(source: Arc<dyn BookSource>, images: Arc<dyn ImageStore>) -> Self {
        Self {
            source,
            images,
            ranker: FreshnessShuffleRanker::new(),
        }
    }

    pub fn with_ranker(mut self, ranker: FreshnessShuffleRanker) -> Self {
        self.ranker = ranker;
        self
    }

    /// Books sorted newest first unless `criteria` carries its own sort.
    pub fn latest(&self, criteria: &QueryCriteria) -> Result<Vec<CarouselEntry>, AggregateError> {
        criteria.validate()?;
        let mut criteria = criteria.clone();
        if criteria.sort.is_none() {
            criteria = criteria.sorted_by(SortKind::Newest, SortDirection::Desc);
        }
        let rows = self.composed(&criteria)?;
        self.project(&rows)
    }

    pub fn fiction(&self, criteria: &QueryCriteria) -> Result<Vec<CarouselEntry>, AggregateError> {
        self.browse(&criteria.clone().with_fiction(Some(true)))
    }

    pub fn non_fiction(
        &self,
        criteria: &QueryCriteria,
    ) -> Result<Vec<CarouselEntry>, AggregateError> {
        self.browse(&criteria.clone().with_fiction(Some(false)))
    }

    pub fn browse(&self, criteria: &QueryCriteria) -> Result<Vec<CarouselEntry>, AggregateError> {
        criteria.validate()?;
        let rows = match (&criteria.filter, criteria.sort) {
            (None, None) => self.composed(
                &criteria
                    .clone()
                    .sorted_by(SortKind::Newest, SortDirection::Asc),
            )?,
            (Some(_), None) => self.ranked(criteria)?,
            _ => self.composed(criteria)?,
        };
        self.project(&rows)
    }

    pub fn age_based(
        &self,
        criteria: &QueryCriteria,
    ) -> Result<Vec<CarouselEntry>, AggregateError> {
        criteria.validate()?;
        let rows = if criteria.filter.is_none() && criteria.sort.is_none() {
            self.ranked(criteria)?
        } else {
            self.composed(criteria)?
        };
        self.project(&rows)
    }

    /// Books of a named collection, unordered.
    pub fn collection(
        &self,
        collection: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<CarouselEntry>, AggregateError> {
        if collection.trim().is_empty() {
            return Err(ValidationError::EmptyFilterValue {
                field: "collection",
            }
            .into());
        }
        if limit == 0 {
            return Err(ValidationError::ZeroLimit.into());
        }

        let plan = shelfmark_catalog::QueryPlan::new()
            .with_predicate(shelfmark_catalog::Predicate::InCollection(collection.to_owned()))
            .with_offset(offset)
            .with_limit(limit);
        let rows = self.source.fetch_books(&plan)?;
        self.project(&rows)
    }

    pub fn book_detail(
        &self,
        isbn13: &str,
        format: FormatRestriction,
    ) -> Result<Option<BookDetail>, AggregateError> {
        let Some(book) = self.find(isbn13)? else {
            return Ok(None);
        };

        let isbn13 = source_isbn13(&book);
        let description = book
            .publisher_keynote
            .as_deref()
            .or(book.bookseller_tagline.as_deref())
            .unwrap_or_default();

        Ok(Some(BookDetail {
            store_url: self.store_link(&isbn13, format)?,
            description: shorten(&clean_html(description), DESCRIPTION_LENGTH),
            extract_exists: book
                .publisher_extract_html
                .as_deref()
                .is_some_and(|extract| !extract.is_empty()),
            isbn13,
        }))
    }

    pub fn extract_view(
        &self,
        isbn13: &str,
        format: FormatRestriction,
    ) -> Result<Option<ExtractView>, AggregateError> {
        let Some(book) = self.find(isbn13)? else {
            return Ok(None);
        };

        let isbn13 = source_isbn13(&book);
        let extract = book
            .publisher_extract_html
            .as_deref()
            .or(book.bookseller_description.as_deref())
            .unwrap_or_default();
        let read_more_url = book
            .publisher_isbn13
            .as_deref()
            .filter(|isbn| !isbn.is_empty())
            .map(|isbn| format!("{EXTRACT_PAGE_URL}{isbn}"));

        Ok(Some(ExtractView {
            store_url: self.store_link(&isbn13, format)?,
            extract: shorten(&clean_html(extract), DESCRIPTION_LENGTH),
            read_more_url,
            isbn13,
        }))
    }

    /// Catalog authors the recommendation service lists as similar.
    ///
    /// `client` must be configured for an author query, see
    /// [`RecommendationsAdapter::similar_authors_client`]. Only the fiction flag,
    /// format restriction, and window of `criteria` apply.
    pub async fn similar_authors(
        &self,
        client: &mut ResilientApiClient,
        criteria: &QueryCriteria,
    ) -> Result<Vec<String>, AggregateError> {
        criteria.validate()?;
        let response = match client.fetch_first_page().await {
            Ok(response) => response,
            Err(ApiError::EmptyResponse) => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };

        let names = RecommendationsAdapter::result_names(&response);
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let scope = QueryCriteria {
            fiction: criteria.fiction,
            format: criteria.format,
            ..QueryCriteria::default()
        };
        let plan = BookQueryComposer::filters(&scope)
            .with_offset(criteria.offset)
            .with_limit(criteria.limit);

        Ok(self.source.authors_matching(&names, &plan)?)
    }

    /// Reconcile rows into carousel entries, preserving order.
    pub fn project(&self, rows: &[BookRow]) -> Result<Vec<CarouselEntry>, AggregateError> {
        rows.iter().map(|row| self.project_one(row)).collect()
    }

    fn project_one(&self, row: &BookRow) -> Result<CarouselEntry, AggregateError> {
        let linked_authors = match row.bookseller_id {
            Some(book_id) => self.source.bookseller_author_names(book_id)?,
            None => Vec::new(),
        };
        let author = if linked_authors.is_empty() {
            row.publisher_author.clone()
        } else {
            Some(linked_authors.join(", "))
        };

        let title = row
            .publisher_title
            .as_deref()
            .or(row.bookseller_title.as_deref())
            .unwrap_or_default();

        Ok(CarouselEntry {
            isbn13: source_isbn13(row),
            author,
            image_url: self.image_url(row),
            title: shorten(&clean_html(title), TITLE_LENGTH),
            price: row.bookseller_price,
            rating: row.publisher_average_rating.or(row.bookseller_average_rating),
        })
    }

    fn image_url(&self, row: &BookRow) -> Option<String> {
        let cached = [
            (BookSourceKind::Publisher, row.publisher_stored_image.as_deref()),
            (BookSourceKind::Bookseller, row.bookseller_stored_image.as_deref()),
        ];
        for (source, file) in cached {
            if let Some(file) = file.filter(|file| self.images.exists(source, file)) {
                return Some(self.images.public_url(source, file));
            }
        }

        row.publisher_jacket_url
            .clone()
            .or_else(|| row.bookseller_image.clone())
    }

    fn store_link(&self, isbn13: &str, format: FormatRestriction) -> Result<String, CatalogError> {
        let target = match format {
            FormatRestriction::Any => None,
            FormatRestriction::PaperOnly => self.source.paper_edition_isbn13(isbn13)?,
        };
        Ok(format!(
            "{STORE_SEARCH_URL}{}",
            target.as_deref().unwrap_or(isbn13)
        ))
    }

    fn find(&self, isbn13: &str) -> Result<Option<BookRow>, AggregateError> {
        let isbn13 = isbn13.trim();
        if isbn13.is_empty() {
            return Err(ValidationError::EmptyIsbn.into());
        }
        Ok(self.source.find_by_isbn13(isbn13)?)
    }

    fn composed(&self, criteria: &QueryCriteria) -> Result<Vec<BookRow>, CatalogError> {
        self.source.fetch_books(&BookQueryComposer::compose(criteria))
    }

    fn ranked(&self, criteria: &QueryCriteria) -> Result<Vec<BookRow>, CatalogError> {
        let rows = self
            .source
            .fetch_books(&FreshnessShuffleRanker::over_fetch_plan(criteria))?;
        Ok(self.ranker.rank(rows, criteria.limit))
    }
}

/// Bookseller ISBN first, then publisher, then the joined key.
fn source_isbn13(row: &BookRow) -> String {
    row.bookseller_isbn13
        .clone()
        .or_else(|| row.publisher_isbn13.clone())
        .unwrap_or_else(|| row.isbn13.clone())
}
