//! CLI argument definitions for Shelfmark.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `latest` | Newest books |
//! | `fiction` / `non-fiction` | Browse one side of the fiction category |
//! | `browse` | Browse with optional filter and sort |
//! | `age` | Books for an age band |
//! | `collection` | Books of a named collection |
//! | `detail` | Description and store link of one book |
//! | `extract` | Extract text and links of one book |
//! | `similar-authors` | Catalog authors similar to a given author |
//! | `review-counts` | Review counts for ISBNs |
//! | `feed` | Page through the extracts or search feed |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--db` | `$SHELFMARK_HOME/catalog.duckdb` | Catalog database file |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--timeout-ms` | `10000` | Provider request timeout in ms |
//!
//! # Examples
//!
//! ```bash
//! shelfmark fiction --genre crime --limit 5
//! shelfmark browse --keyword dragon --sort cheapest --direction desc
//! shelfmark age 9 --to 12 --paper-only
//! shelfmark similar-authors "Jane Doe" --fiction
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use shelfmark_catalog::SortDirection;
use shelfmark_core::{Filter, FormatRestriction, QueryCriteria, SortKind};

/// Book catalog browsing and provider lookups.
#[derive(Debug, Parser)]
#[command(
    name = "shelfmark",
    author,
    version,
    about = "Book catalog browsing and provider lookups"
)]
pub struct Cli {
    /// Catalog database file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Provider request timeout in milliseconds.
    #[arg(long, global = true, default_value_t = 10_000)]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Newest books first, unless a sort is given.
    Latest(BrowseArgs),
    /// Browse fiction.
    Fiction(BrowseArgs),
    /// Browse non-fiction.
    NonFiction(BrowseArgs),
    /// Browse the whole catalog.
    Browse(CatalogBrowseArgs),
    /// Books for an age band.
    Age(AgeArgs),
    /// Books of a named collection.
    Collection(CollectionArgs),
    /// Description and store link of one book.
    Detail(BookArgs),
    /// Extract text and links of one book.
    Extract(BookArgs),
    /// Catalog authors the recommendation service lists as similar.
    SimilarAuthors(SimilarAuthorsArgs),
    /// Review counts for one or more ISBNs.
    ReviewCounts(ReviewCountsArgs),
    /// Page through a provider feed.
    Feed(FeedArgs),
}

/// At most one filter.
#[derive(Debug, Clone, Default, Args)]
#[group(multiple = false)]
pub struct FilterArgs {
    /// Named collection (seo name).
    #[arg(long)]
    pub collection: Option<String>,
    /// Category name.
    #[arg(long)]
    pub genre: Option<String>,
    #[arg(long)]
    pub author: Option<String>,
    /// Substring of keynote or titles.
    #[arg(long)]
    pub keyword: Option<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> Option<Filter> {
        if let Some(value) = &self.collection {
            return Some(Filter::Collection(value.clone()));
        }
        if let Some(value) = &self.genre {
            return Some(Filter::Genre(value.clone()));
        }
        if let Some(value) = &self.author {
            return Some(Filter::Author(value.clone()));
        }
        self.keyword.clone().map(Filter::Keyword)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DirectionArg {
    Asc,
    Desc,
}

impl From<DirectionArg> for SortDirection {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Asc => Self::Asc,
            DirectionArg::Desc => Self::Desc,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct BrowseArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// newest, cheapest, popular, or a column name such as bookseller_title.
    #[arg(long)]
    pub sort: Option<SortKind>,

    #[arg(long, value_enum, default_value_t = DirectionArg::Asc)]
    pub direction: DirectionArg,

    /// Only books available in a paper format.
    #[arg(long, default_value_t = false)]
    pub paper_only: bool,

    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    #[arg(long, default_value_t = 5)]
    pub limit: usize,
}

impl BrowseArgs {
    pub fn to_criteria(&self) -> QueryCriteria {
        let mut criteria = QueryCriteria::new()
            .with_offset(self.offset)
            .with_limit(self.limit);
        if let Some(filter) = self.filter.to_filter() {
            criteria = criteria.with_filter(filter);
        }
        if let Some(kind) = self.sort {
            criteria = criteria.sorted_by(kind, self.direction.into());
        }
        if self.paper_only {
            criteria = criteria.with_format(FormatRestriction::PaperOnly);
        }
        criteria
    }
}

/// Fiction flag: fiction only, non-fiction only, or neither.
#[derive(Debug, Clone, Copy, Default, Args)]
#[group(multiple = false)]
pub struct FictionArgs {
    #[arg(long, default_value_t = false)]
    pub fiction: bool,
    #[arg(long, default_value_t = false)]
    pub non_fiction: bool,
}

impl FictionArgs {
    pub const fn flag(&self) -> Option<bool> {
        match (self.fiction, self.non_fiction) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct CatalogBrowseArgs {
    #[command(flatten)]
    pub fiction: FictionArgs,

    #[command(flatten)]
    pub browse: BrowseArgs,
}

#[derive(Debug, Clone, Args)]
pub struct AgeArgs {
    /// Youngest age.
    pub from: i32,

    /// Oldest age, inclusive.
    #[arg(long)]
    pub to: Option<i32>,

    #[command(flatten)]
    pub browse: BrowseArgs,
}

#[derive(Debug, Clone, Args)]
pub struct CollectionArgs {
    /// Collection seo name.
    pub name: String,

    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    #[arg(long, default_value_t = 5)]
    pub limit: usize,
}

#[derive(Debug, Clone, Args)]
pub struct BookArgs {
    pub isbn13: String,

    /// Link the store to a paper edition.
    #[arg(long, default_value_t = false)]
    pub paper_only: bool,
}

impl BookArgs {
    pub const fn format(&self) -> FormatRestriction {
        if self.paper_only {
            FormatRestriction::PaperOnly
        } else {
            FormatRestriction::Any
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct SimilarAuthorsArgs {
    pub author: String,

    #[command(flatten)]
    pub fiction: FictionArgs,

    #[arg(long, default_value_t = false)]
    pub paper_only: bool,

    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    #[arg(long, default_value_t = 3)]
    pub limit: usize,
}

#[derive(Debug, Clone, Args)]
pub struct ReviewCountsArgs {
    #[arg(required = true)]
    pub isbns: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct FeedArgs {
    #[command(subcommand)]
    pub feed: FeedCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum FeedCommand {
    /// Publisher extracts feed.
    Extracts(ExtractsFeedArgs),
    /// Bookseller search feed.
    Search(SearchFeedArgs),
    /// Single book from the bookseller feed.
    Book(FeedBookArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ExtractsFeedArgs {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub author: Option<String>,
    #[arg(long)]
    pub isbn: Option<String>,
    /// Published before this date (YYYY-MM-DD).
    #[arg(long)]
    pub published_before: Option<String>,
    /// Published after this date (YYYY-MM-DD).
    #[arg(long)]
    pub published_after: Option<String>,
    /// Maximum number of pages to fetch.
    #[arg(long, default_value_t = 1)]
    pub pages: u32,
}

#[derive(Debug, Clone, Args)]
pub struct SearchFeedArgs {
    #[arg(long)]
    pub keyword: Option<String>,
    #[arg(long)]
    pub collection: Option<String>,
    /// Results per page.
    #[arg(long)]
    pub amount: Option<u32>,
    /// Maximum number of pages to fetch.
    #[arg(long, default_value_t = 1)]
    pub pages: u32,
}

#[derive(Debug, Clone, Args)]
pub struct FeedBookArgs {
    pub isbn13: String,
}
