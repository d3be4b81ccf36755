//! # Shelfmark Catalog
//!
//! DuckDB-backed book catalog for Shelfmark.
//!
//! ## Overview
//!
//! The catalog stores the two book sources side by side and exposes them
//! through one pre-joined view, `full_join_books`:
//!
//! - **Publisher feed** (`publisher_books`): titles, keynotes, extracts, jacket URLs
//! - **Bookseller feed** (`bookseller_books`): prices, taglines, age bands, linked authors
//!
//! Queries are described as [`QueryPlan`]s (predicates, ordering, window) and
//! rendered to parameterized SQL; user values are always bound, never interpolated.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shelfmark_catalog::{BookColumn, Catalog, Predicate, QueryPlan, SortDirection};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = Catalog::open_default()?;
//!
//!     let plan = QueryPlan::new()
//!         .with_predicate(Predicate::HasCategory {
//!             category: "fiction".into(),
//!             present: true,
//!         })
//!         .order_by(BookColumn::BooksellerPrice, SortDirection::Asc)
//!         .with_limit(5);
//!
//!     for book in catalog.select_books(&plan)? {
//!         println!("{} {:?}", book.isbn13, book.publisher_title);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Tables
//!
//! | Table | Description |
//! |-------|-------------|
//! | `publisher_books` | Publisher metadata feed records |
//! | `bookseller_books` | Bookseller collection feed records |
//! | `bookseller_book_authors` | Author names linked to bookseller records |
//! | `book_categories` | Category membership by ISBN-13 |
//! | `book_collections` | Named collection membership by ISBN-13 |
//! | `book_formats` | Format availability and edition ISBN-13s |

pub mod duckdb;
pub mod migrations;
pub mod models;
pub mod plan;
pub mod views;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use ::duckdb::types::Value;
use ::duckdb::{params_from_iter, Connection, ToSql};
use thiserror::Error;

pub use duckdb::{ConnectionPool, PooledConnection};
pub use models::{BookRow, BookSourceKind, BooksellerBook, FormatLink, PublisherBook};
pub use plan::{BookColumn, OrderBy, OrderTerm, Predicate, QueryPlan, RenderedQuery, SortDirection};
pub use views::FULL_JOIN_VIEW;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// `DuckDB` database error.
    #[error(transparent)]
    DuckDb(#[from] ::duckdb::Error),

    /// I/O error (file system operations).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Query was rejected before reaching the database.
    #[error("query rejected: {0}")]
    QueryRejected(String),
}

/// Configuration for the catalog database.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Root directory for shelfmark data.
    pub shelfmark_home: PathBuf,
    /// Path to the `DuckDB` database file.
    pub db_path: PathBuf,
    /// Maximum number of idle connections kept in the pool.
    pub max_pool_size: usize,
}

impl CatalogConfig {
    /// Configuration rooted at `shelfmark_home`, with the database at `<home>/catalog.duckdb`.
    pub fn in_home(shelfmark_home: impl Into<PathBuf>) -> Self {
        let shelfmark_home = shelfmark_home.into();
        let db_path = shelfmark_home.join("catalog.duckdb");
        Self {
            shelfmark_home,
            db_path,
            max_pool_size: 4,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::in_home(resolve_shelfmark_home())
    }
}

/// The book catalog.
#[derive(Clone)]
pub struct Catalog {
    config: CatalogConfig,
    pool: ConnectionPool,
}

impl Catalog {
    /// Open a catalog with default configuration.
    pub fn open_default() -> Result<Self, CatalogError> {
        Self::open(CatalogConfig::default())
    }

    /// Open a catalog with the specified configuration, creating tables and views.
    pub fn open(config: CatalogConfig) -> Result<Self, CatalogError> {
        if let Some(parent) = config.db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let pool = ConnectionPool::open(config.db_path.clone(), config.max_pool_size)?;
        let catalog = Self { config, pool };
        catalog.initialize()?;
        Ok(catalog)
    }

    /// Initialize database schema and views.
    pub fn initialize(&self) -> Result<(), CatalogError> {
        let connection = self.pool.acquire()?;
        migrations::apply_migrations(&connection)?;
        views::create_views(&connection)?;
        Ok(())
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Get the path to the database file.
    pub fn db_path(&self) -> &Path {
        self.pool.db_path()
    }

    /// Execute a composed plan and materialize the matching rows.
    pub fn select_books(&self, plan: &QueryPlan) -> Result<Vec<BookRow>, CatalogError> {
        let rendered = plan.render();
        tracing::debug!(sql = %rendered.sql, params = rendered.params.len(), "executing book plan");

        let connection = self.pool.acquire()?;
        let mut statement = connection.prepare(&rendered.sql)?;
        let rows = statement.query_map(params_from_iter(rendered.params.iter()), read_book_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(CatalogError::from)
    }

    /// Find a book by the ISBN-13 of either source.
    pub fn find_by_isbn13(&self, isbn13: &str) -> Result<Option<BookRow>, CatalogError> {
        let sql = format!(
            "SELECT {columns} FROM {FULL_JOIN_VIEW} \
             WHERE bookseller_isbn13 = ? OR publisher_isbn13 = ? LIMIT 1",
            columns = plan::BOOK_COLUMNS_SQL,
        );
        let connection = self.pool.acquire()?;
        let mut statement = connection.prepare(&sql)?;
        let mut rows = statement.query_map([isbn13, isbn13], read_book_row)?;
        rows.next().transpose().map_err(CatalogError::from)
    }

    /// Author names linked to a bookseller record, in display order.
    pub fn bookseller_author_names(&self, book_id: i64) -> Result<Vec<String>, CatalogError> {
        let connection = self.pool.acquire()?;
        let mut statement = connection.prepare(
            "SELECT name FROM bookseller_book_authors WHERE book_id = ? ORDER BY position, name",
        )?;
        let names = statement.query_map([book_id], |row| row.get::<_, String>(0))?;
        names.collect::<Result<Vec<_>, _>>().map_err(CatalogError::from)
    }

    /// Edition ISBN-13 of `isbn13` in one of `formats`; publisher links win over bookseller links.
    pub fn edition_isbn13(
        &self,
        isbn13: &str,
        formats: &[&str],
    ) -> Result<Option<String>, CatalogError> {
        if formats.is_empty() {
            return Ok(None);
        }

        let placeholders = vec!["?"; formats.len()].join(", ");
        let sql = format!(
            "SELECT format_isbn13 FROM book_formats \
             WHERE isbn13 = ? AND format IN ({placeholders}) \
             ORDER BY CASE source WHEN 'publisher' THEN 0 ELSE 1 END, format_isbn13 \
             LIMIT 1"
        );
        let mut params: Vec<&dyn ToSql> = Vec::with_capacity(formats.len() + 1);
        params.push(&isbn13);
        for format in formats {
            params.push(format);
        }

        let connection = self.pool.acquire()?;
        let mut statement = connection.prepare(&sql)?;
        let mut rows = statement.query_map(params.as_slice(), |row| row.get::<_, String>(0))?;
        rows.next().transpose().map_err(CatalogError::from)
    }

    /// Distinct author names among `names`, preferring the bookseller-linked name.
    ///
    /// A linked name counts only when it is itself in `names`; otherwise the
    /// row resolves to its publisher author. `scope` contributes its predicates,
    /// and its window applies to the distinct names, ordered by publisher author.
    pub fn authors_matching(
        &self,
        names: &[String],
        scope: &QueryPlan,
    ) -> Result<Vec<String>, CatalogError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; names.len()].join(", ");
        let mut sql = format!(
            "SELECT CASE WHEN ba_names.name IN ({placeholders}) THEN ba_names.name \
             ELSE {FULL_JOIN_VIEW}.publisher_author END AS resolved_name \
             FROM {FULL_JOIN_VIEW} \
             LEFT JOIN bookseller_book_authors ba_names \
             ON ba_names.book_id = {FULL_JOIN_VIEW}.bookseller_id \
             WHERE ({FULL_JOIN_VIEW}.publisher_author IN ({placeholders}) \
             OR ba_names.name IN ({placeholders}))"
        );
        let mut params: Vec<Value> = names
            .iter()
            .chain(names.iter())
            .chain(names.iter())
            .cloned()
            .map(Value::Text)
            .collect();
        scope.render_conditions(&mut sql, &mut params, true);
        sql.push_str(&format!(
            " ORDER BY {FULL_JOIN_VIEW}.publisher_author ASC NULLS LAST, resolved_name ASC"
        ));

        let connection = self.pool.acquire()?;
        let mut statement = connection.prepare(&sql)?;
        let rows = statement.query_map(params_from_iter(params.iter()), |row| {
            row.get::<_, Option<String>>(0)
        })?;

        let mut authors: Vec<String> = Vec::new();
        for name in rows {
            let Some(name) = name? else {
                continue;
            };
            if names.contains(&name) && !authors.contains(&name) {
                authors.push(name);
            }
        }

        let window = authors.into_iter().skip(scope.offset());
        Ok(match scope.limit() {
            Some(limit) => window.take(limit).collect(),
            None => window.collect(),
        })
    }

    /// Ingest publisher feed records using parameterized queries.
    pub fn ingest_publisher_books(&self, rows: &[PublisherBook]) -> Result<(), CatalogError> {
        if rows.is_empty() {
            return Ok(());
        }

        let connection = self.pool.acquire()?;
        connection.execute_batch("BEGIN TRANSACTION")?;
        let result = (|| -> Result<(), CatalogError> {
            for row in rows {
                let params: [&dyn ToSql; 10] = [
                    &row.id,
                    &row.isbn13,
                    &row.title,
                    &row.author,
                    &row.keynote,
                    &row.extract_html,
                    &row.jacket_url,
                    &row.stored_image,
                    &row.publication_date,
                    &row.average_rating,
                ];
                connection.execute(
                    "INSERT OR REPLACE INTO publisher_books \
                     (id, isbn13, title, author, keynote, extract_html, jacket_url, stored_image, \
                      publication_date, average_rating, updated_at) \
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, TRY_CAST(? AS DATE), ?, CURRENT_TIMESTAMP)",
                    params.as_slice(),
                )?;
            }
            Ok(())
        })();

        finalize_transaction(&connection, result)
    }

    /// Ingest bookseller feed records and replace their author links.
    pub fn ingest_bookseller_books(&self, rows: &[BooksellerBook]) -> Result<(), CatalogError> {
        if rows.is_empty() {
            return Ok(());
        }

        let connection = self.pool.acquire()?;
        connection.execute_batch("BEGIN TRANSACTION")?;
        let result = (|| -> Result<(), CatalogError> {
            for row in rows {
                let params: [&dyn ToSql; 12] = [
                    &row.id,
                    &row.isbn13,
                    &row.title,
                    &row.tagline,
                    &row.description,
                    &row.image,
                    &row.stored_image,
                    &row.price,
                    &row.average_rating,
                    &row.publication_date,
                    &row.age_from,
                    &row.age_to,
                ];
                connection.execute(
                    "INSERT OR REPLACE INTO bookseller_books \
                     (id, isbn13, title, tagline, description, image, stored_image, price, \
                      average_rating, publication_date, age_from, age_to, updated_at) \
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, TRY_CAST(? AS DATE), ?, ?, CURRENT_TIMESTAMP)",
                    params.as_slice(),
                )?;

                connection.execute(
                    "DELETE FROM bookseller_book_authors WHERE book_id = ?",
                    [row.id],
                )?;
                for (position, name) in row.authors.iter().enumerate() {
                    let position = i32::try_from(position).unwrap_or(i32::MAX);
                    let params: [&dyn ToSql; 3] = [&row.id, name, &position];
                    connection.execute(
                        "INSERT OR IGNORE INTO bookseller_book_authors (book_id, name, position) \
                         VALUES (?, ?, ?)",
                        params.as_slice(),
                    )?;
                }
            }
            Ok(())
        })();

        finalize_transaction(&connection, result)
    }

    /// Link a book to categories (genres). Existing links are kept.
    pub fn link_categories(&self, isbn13: &str, categories: &[&str]) -> Result<(), CatalogError> {
        self.link_many(
            "INSERT OR IGNORE INTO book_categories (isbn13, category) VALUES (?, ?)",
            isbn13,
            categories,
        )
    }

    /// Link a book to named collections by seo name. Existing links are kept.
    pub fn link_collections(
        &self,
        isbn13: &str,
        collections: &[&str],
    ) -> Result<(), CatalogError> {
        self.link_many(
            "INSERT OR IGNORE INTO book_collections (isbn13, collection) VALUES (?, ?)",
            isbn13,
            collections,
        )
    }

    /// Record format availability links.
    pub fn link_formats(&self, links: &[FormatLink]) -> Result<(), CatalogError> {
        if links.is_empty() {
            return Ok(());
        }

        let connection = self.pool.acquire()?;
        connection.execute_batch("BEGIN TRANSACTION")?;
        let result = (|| -> Result<(), CatalogError> {
            for link in links {
                let source = link.source.as_str();
                let params: [&dyn ToSql; 4] =
                    [&source, &link.isbn13, &link.format, &link.format_isbn13];
                connection.execute(
                    "INSERT OR IGNORE INTO book_formats (source, isbn13, format, format_isbn13) \
                     VALUES (?, ?, ?, ?)",
                    params.as_slice(),
                )?;
            }
            Ok(())
        })();

        finalize_transaction(&connection, result)
    }

    fn link_many(&self, sql: &str, isbn13: &str, values: &[&str]) -> Result<(), CatalogError> {
        if values.is_empty() {
            return Ok(());
        }

        let connection = self.pool.acquire()?;
        connection.execute_batch("BEGIN TRANSACTION")?;
        let result = (|| -> Result<(), CatalogError> {
            for value in values {
                connection.execute(sql, [isbn13, *value])?;
            }
            Ok(())
        })();

        finalize_transaction(&connection, result)
    }
}

/// Finalize a transaction, committing on success or rolling back on failure.
fn finalize_transaction<T>(
    connection: &Connection,
    result: Result<T, CatalogError>,
) -> Result<T, CatalogError> {
    match result {
        Ok(value) => {
            connection.execute_batch("COMMIT")?;
            Ok(value)
        }
        Err(error) => {
            let _ = connection.execute_batch("ROLLBACK");
            Err(error)
        }
    }
}

/// Read one row projected with `plan::BOOK_COLUMNS_SQL`.
fn read_book_row(row: &::duckdb::Row<'_>) -> Result<BookRow, ::duckdb::Error> {
    Ok(BookRow {
        isbn13: row.get(0)?,
        publisher_id: row.get(1)?,
        publisher_isbn13: row.get(2)?,
        publisher_title: row.get(3)?,
        publisher_author: row.get(4)?,
        publisher_keynote: row.get(5)?,
        publisher_extract_html: row.get(6)?,
        publisher_jacket_url: row.get(7)?,
        publisher_stored_image: row.get(8)?,
        publisher_publication_date: row.get(9)?,
        publisher_average_rating: row.get(10)?,
        bookseller_id: row.get(11)?,
        bookseller_isbn13: row.get(12)?,
        bookseller_title: row.get(13)?,
        bookseller_tagline: row.get(14)?,
        bookseller_description: row.get(15)?,
        bookseller_image: row.get(16)?,
        bookseller_stored_image: row.get(17)?,
        bookseller_price: row.get(18)?,
        bookseller_average_rating: row.get(19)?,
        bookseller_publication_date: row.get(20)?,
        bookseller_age_from: row.get(21)?,
        bookseller_age_to: row.get(22)?,
    })
}

/// Resolve the shelfmark home directory from environment or default.
pub fn resolve_shelfmark_home() -> PathBuf {
    if let Some(path) = env::var_os("SHELFMARK_HOME") {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".shelfmark");
    }

    PathBuf::from(".shelfmark")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open_catalog(temp: &tempfile::TempDir) -> Catalog {
        Catalog::open(CatalogConfig::in_home(temp.path().join("shelfmark-home"))).expect("catalog open")
    }

    #[test]
    fn initializes_tables_and_view() {
        let temp = tempdir().expect("tempdir");
        let catalog = open_catalog(&temp);
        let connection = catalog.pool.acquire().expect("connection");

        let count: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 'full_join_books'",
                [],
                |row| row.get(0),
            )
            .expect("count");
        assert_eq!(count, 1);
    }

    #[test]
    fn reopening_does_not_reapply_migrations() {
        let temp = tempdir().expect("tempdir");
        let config = CatalogConfig::in_home(temp.path());
        Catalog::open(config.clone()).expect("first open");
        let catalog = Catalog::open(config).expect("second open");

        let connection = catalog.pool.acquire().expect("connection");
        let applied: i64 = connection
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| row.get(0))
            .expect("migration count");
        assert_eq!(applied, 2);
    }

    #[test]
    fn joined_view_merges_sources_on_isbn() {
        let temp = tempdir().expect("tempdir");
        let catalog = open_catalog(&temp);

        catalog
            .ingest_publisher_books(&[
                PublisherBook {
                    id: 1,
                    isbn13: String::from("9780000000001"),
                    title: Some(String::from("Shared")),
                    author: Some(String::from("Jane Doe")),
                    publication_date: Some(String::from("2024-03-01")),
                    ..PublisherBook::default()
                },
                PublisherBook {
                    id: 2,
                    isbn13: String::from("9780000000002"),
                    title: Some(String::from("Publisher only")),
                    ..PublisherBook::default()
                },
            ])
            .expect("ingest publisher");
        catalog
            .ingest_bookseller_books(&[BooksellerBook {
                id: 10,
                isbn13: String::from("9780000000001"),
                title: Some(String::from("Shared (bookseller)")),
                price: Some(7.99),
                authors: vec![String::from("J. Doe"), String::from("A. Editor")],
                ..BooksellerBook::default()
            }])
            .expect("ingest bookseller");

        let rows = catalog
            .select_books(&QueryPlan::new().order_by(BookColumn::Isbn13, SortDirection::Asc))
            .expect("select");
        assert_eq!(rows.len(), 2);

        let shared = &rows[0];
        assert_eq!(shared.isbn13, "9780000000001");
        assert_eq!(shared.publisher_author.as_deref(), Some("Jane Doe"));
        assert_eq!(shared.bookseller_price, Some(7.99));
        assert_eq!(shared.publisher_publication_date.as_deref(), Some("2024-03-01"));
        assert_eq!(rows[1].bookseller_id, None);

        let authors = catalog.bookseller_author_names(10).expect("authors");
        assert_eq!(authors, vec!["J. Doe", "A. Editor"]);
    }

    #[test]
    fn bound_values_are_never_interpolated() {
        let temp = tempdir().expect("tempdir");
        let catalog = open_catalog(&temp);
        let dangerous = "'; DROP TABLE publisher_books; --";

        catalog
            .ingest_publisher_books(&[PublisherBook {
                id: 1,
                isbn13: String::from("9780000000001"),
                title: Some(String::from(dangerous)),
                ..PublisherBook::default()
            }])
            .expect("ingest");

        let plan = QueryPlan::new().with_predicate(Predicate::Contains {
            column: BookColumn::PublisherTitle,
            needle: String::from(dangerous),
        });
        let rows = catalog.select_books(&plan).expect("select");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].publisher_title.as_deref(), Some(dangerous));
    }

    #[test]
    fn edition_lookup_prefers_publisher_links() {
        let temp = tempdir().expect("tempdir");
        let catalog = open_catalog(&temp);

        catalog
            .link_formats(&[
                FormatLink {
                    source: BookSourceKind::Bookseller,
                    isbn13: String::from("9780000000001"),
                    format: String::from("BB"),
                    format_isbn13: String::from("9780000000100"),
                },
                FormatLink {
                    source: BookSourceKind::Publisher,
                    isbn13: String::from("9780000000001"),
                    format: String::from("BC"),
                    format_isbn13: String::from("9780000000200"),
                },
                FormatLink {
                    source: BookSourceKind::Publisher,
                    isbn13: String::from("9780000000001"),
                    format: String::from("DG"),
                    format_isbn13: String::from("9780000000300"),
                },
            ])
            .expect("link formats");

        let edition = catalog
            .edition_isbn13("9780000000001", &["BC", "BB"])
            .expect("lookup");
        assert_eq!(edition.as_deref(), Some("9780000000200"));

        let missing = catalog
            .edition_isbn13("9780000000999", &["BC", "BB"])
            .expect("lookup");
        assert_eq!(missing, None);
    }
}
