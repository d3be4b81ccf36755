//! # Shelfmark Core
//!
//! Provider integrations and book aggregation for the Shelfmark catalog.
//!
//! ## Overview
//!
//! - **Resilient API client** with bounded retries and pagination continuation
//! - **Provider adapters** for review counts, publisher extracts, bookseller search, and recommendations
//! - **Query composition** from caller criteria into catalog query plans
//! - **Freshness ranking**: the two newest books first, the rest shuffled
//! - **Aggregation** of both catalog sources into display-ready records
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters and the adapter trait |
//! | [`aggregator`] | Aggregation entry points and projection |
//! | [`api_client`] | Retrying, paginating API client |
//! | [`composer`] | Criteria to query plan |
//! | [`criteria`] | Query criteria value objects |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`ranker`] | Freshness shuffle ranking |
//! | [`text`] | Shortening and HTML cleaning |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / Caller   │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Book Aggregator │────▶│ Composer/Ranker  │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Book Source     │     │ API Client       │
//! │ (DuckDB)        │     │ + Adapter        │
//! └─────────────────┘     └────────┬─────────┘
//!                                  ▼
//!                         ┌──────────────────┐
//!                         │ HTTP Client      │
//!                         │ (reqwest)        │
//!                         └──────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use shelfmark_catalog::Catalog;
//! use shelfmark_core::{BookAggregator, Filter, QueryCriteria, ShelfmarkConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ShelfmarkConfig::from_env();
//!     let catalog = Catalog::open(config.catalog_config())?;
//!     let aggregator = BookAggregator::new(Arc::new(catalog), Arc::new(config.image_cache()));
//!
//!     let criteria = QueryCriteria::new().with_filter(Filter::Genre(String::from("crime")));
//!     for entry in aggregator.fiction(&criteria)? {
//!         println!("{} by {:?}", entry.title, entry.author);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Security
//!
//! - API keys are read from environment variables only (never logged)
//! - Catalog queries bind every caller value as a parameter

pub mod adapters;
pub mod aggregator;
pub mod api_client;
pub mod book_source;
pub mod composer;
pub mod config;
pub mod criteria;
pub mod error;
pub mod http_client;
pub mod images;
pub mod ranker;
pub mod retry;
pub mod source;
pub mod text;

mod attributes;

// Adapters
pub use adapters::{
    CursorUpdate, ExtractsAdapter, ExtractsQuery, ProviderAdapter, RecommendationsAdapter,
    ReviewCountsAdapter, SearchFeedAdapter, SearchQuery,
};

// Aggregation
pub use aggregator::{AggregateError, BookAggregator, BookDetail, CarouselEntry, ExtractView};
pub use book_source::BookSource;
pub use composer::{BookQueryComposer, ELECTRONIC_FORMATS, PAPER_FORMATS};
pub use criteria::{
    AgeRange, Filter, FormatRestriction, QueryCriteria, Sort, SortKind, MAX_AGE_SPAN,
};
pub use images::{ImageStore, LocalImageCache};
pub use ranker::FreshnessShuffleRanker;

// API client
pub use api_client::{ApiError, ResilientApiClient};
pub use attributes::{ProviderAttributes, ProviderAttributesBuilder};
pub use retry::{RetryConfig, RetryState};

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
    TransportOptions,
};

pub use config::ShelfmarkConfig;
pub use error::ValidationError;
pub use source::ProviderId;
