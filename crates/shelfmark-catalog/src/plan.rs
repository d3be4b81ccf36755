//! Engine-neutral query plans over the `full_join_books` view.
//!
//! A [`QueryPlan`] is a list of predicates (joined with `AND`), an ordering,
//! and an offset/limit window. Rendering produces parameterized SQL; user
//! values never reach the SQL text, and column names come from the
//! [`BookColumn`] whitelist only.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use ::duckdb::types::Value;
use serde::{Deserialize, Serialize};

use crate::views::FULL_JOIN_VIEW;
use crate::CatalogError;

/// Projection shared by every book query. Column order is relied upon by
/// the row reader in `lib.rs`.
pub(crate) const BOOK_COLUMNS_SQL: &str = "\
isbn13, \
publisher_id, publisher_isbn13, publisher_title, publisher_author, publisher_keynote, \
publisher_extract_html, publisher_jacket_url, publisher_stored_image, \
CAST(publisher_publication_date AS VARCHAR) AS publisher_published_on, publisher_average_rating, \
bookseller_id, bookseller_isbn13, bookseller_title, bookseller_tagline, bookseller_description, \
bookseller_image, bookseller_stored_image, bookseller_price, bookseller_average_rating, \
CAST(bookseller_publication_date AS VARCHAR) AS bookseller_published_on, \
bookseller_age_from, bookseller_age_to";

/// Columns of the joined view that plans may filter or order on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookColumn {
    Isbn13,
    PublisherTitle,
    PublisherAuthor,
    PublisherKeynote,
    PublisherPublicationDate,
    PublisherAverageRating,
    BooksellerTitle,
    BooksellerPrice,
    BooksellerAverageRating,
    BooksellerPublicationDate,
    BooksellerAgeFrom,
    BooksellerAgeTo,
}

impl BookColumn {
    pub const ALL: [Self; 12] = [
        Self::Isbn13,
        Self::PublisherTitle,
        Self::PublisherAuthor,
        Self::PublisherKeynote,
        Self::PublisherPublicationDate,
        Self::PublisherAverageRating,
        Self::BooksellerTitle,
        Self::BooksellerPrice,
        Self::BooksellerAverageRating,
        Self::BooksellerPublicationDate,
        Self::BooksellerAgeFrom,
        Self::BooksellerAgeTo,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Isbn13 => "isbn13",
            Self::PublisherTitle => "publisher_title",
            Self::PublisherAuthor => "publisher_author",
            Self::PublisherKeynote => "publisher_keynote",
            Self::PublisherPublicationDate => "publisher_publication_date",
            Self::PublisherAverageRating => "publisher_average_rating",
            Self::BooksellerTitle => "bookseller_title",
            Self::BooksellerPrice => "bookseller_price",
            Self::BooksellerAverageRating => "bookseller_average_rating",
            Self::BooksellerPublicationDate => "bookseller_publication_date",
            Self::BooksellerAgeFrom => "bookseller_age_from",
            Self::BooksellerAgeTo => "bookseller_age_to",
        }
    }
}

impl Display for BookColumn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookColumn {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|column| column.as_str() == wanted)
            .ok_or_else(|| CatalogError::QueryRejected(format!("unknown book column '{value}'")))
    }
}

/// Ordering direction for a single sort key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(CatalogError::QueryRejected(format!(
                "invalid sort direction '{other}', expected asc or desc"
            ))),
        }
    }
}

/// One key of a compound ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTerm {
    pub column: BookColumn,
    pub direction: SortDirection,
}

/// Result ordering of a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OrderBy {
    /// Engine order; nothing is attached.
    #[default]
    Unordered,
    /// Source-level random order.
    Random,
    /// Compound ordering, first term most significant. Nulls sort last.
    Columns(Vec<OrderTerm>),
}

/// A filter over the joined view.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Category membership (`EXISTS`) or its absence (`NOT EXISTS`).
    HasCategory { category: String, present: bool },
    /// Membership in a named collection, by seo name.
    InCollection(String),
    /// At least one linked format among the given codes.
    HasFormat(Vec<String>),
    /// Publisher author field or any bookseller-linked author equals the name.
    ByAuthor(String),
    /// Case-insensitive substring containment.
    Contains { column: BookColumn, needle: String },
    IntEquals { column: BookColumn, value: i64 },
    /// Parenthesized disjunction; an empty group matches nothing.
    AnyOf(Vec<Predicate>),
}

impl Predicate {
    fn render(&self, sql: &mut String, params: &mut Vec<Value>) {
        match self {
            Self::HasCategory { category, present } => {
                if !present {
                    sql.push_str("NOT ");
                }
                sql.push_str(&format!(
                    "EXISTS (SELECT 1 FROM book_categories bc \
                     WHERE bc.isbn13 = {FULL_JOIN_VIEW}.isbn13 AND lower(bc.category) = lower(?))"
                ));
                params.push(Value::Text(category.clone()));
            }
            Self::InCollection(collection) => {
                sql.push_str(&format!(
                    "EXISTS (SELECT 1 FROM book_collections bcol \
                     WHERE bcol.isbn13 = {FULL_JOIN_VIEW}.isbn13 AND bcol.collection = ?)"
                ));
                params.push(Value::Text(collection.clone()));
            }
            Self::HasFormat(formats) => {
                if formats.is_empty() {
                    sql.push_str("FALSE");
                    return;
                }
                let placeholders = vec!["?"; formats.len()].join(", ");
                sql.push_str(&format!(
                    "EXISTS (SELECT 1 FROM book_formats bf \
                     WHERE bf.isbn13 = {FULL_JOIN_VIEW}.isbn13 AND bf.format IN ({placeholders}))"
                ));
                params.extend(formats.iter().cloned().map(Value::Text));
            }
            Self::ByAuthor(name) => {
                sql.push_str(&format!(
                    "(publisher_author = ? OR EXISTS (SELECT 1 FROM bookseller_book_authors ba \
                     WHERE ba.book_id = {FULL_JOIN_VIEW}.bookseller_id AND ba.name = ?))"
                ));
                params.push(Value::Text(name.clone()));
                params.push(Value::Text(name.clone()));
            }
            Self::Contains { column, needle } => {
                sql.push_str(&format!("contains(lower({column}), lower(?))"));
                params.push(Value::Text(needle.clone()));
            }
            Self::IntEquals { column, value } => {
                sql.push_str(&format!("{column} = ?"));
                params.push(Value::BigInt(*value));
            }
            Self::AnyOf(terms) => {
                if terms.is_empty() {
                    sql.push_str("FALSE");
                    return;
                }
                sql.push('(');
                for (index, term) in terms.iter().enumerate() {
                    if index > 0 {
                        sql.push_str(" OR ");
                    }
                    term.render(sql, params);
                }
                sql.push(')');
            }
        }
    }
}

/// SQL text plus positional parameters, ready for execution.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Composed predicates, ordering, and window for a book query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPlan {
    predicates: Vec<Predicate>,
    order: OrderBy,
    offset: usize,
    limit: Option<usize>,
}

impl QueryPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Append a sort key after any existing ones.
    pub fn order_by(mut self, column: BookColumn, direction: SortDirection) -> Self {
        let term = OrderTerm { column, direction };
        match &mut self.order {
            OrderBy::Columns(terms) => terms.push(term),
            order => *order = OrderBy::Columns(vec![term]),
        }
        self
    }

    pub fn order_randomly(mut self) -> Self {
        self.order = OrderBy::Random;
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn order(&self) -> &OrderBy {
        &self.order
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Render the plan as a `SELECT` over the joined view.
    pub fn render(&self) -> RenderedQuery {
        let mut sql = format!("SELECT {BOOK_COLUMNS_SQL} FROM {FULL_JOIN_VIEW}");
        let mut params = Vec::new();
        self.render_conditions(&mut sql, &mut params, false);
        self.render_order(&mut sql);
        self.render_window(&mut sql);
        RenderedQuery { sql, params }
    }

    /// Append the predicates; `has_where` means a `WHERE` clause was already opened.
    pub(crate) fn render_conditions(
        &self,
        sql: &mut String,
        params: &mut Vec<Value>,
        has_where: bool,
    ) {
        for (index, predicate) in self.predicates.iter().enumerate() {
            sql.push_str(if index == 0 && !has_where { " WHERE " } else { " AND " });
            predicate.render(sql, params);
        }
    }

    fn render_order(&self, sql: &mut String) {
        match &self.order {
            OrderBy::Unordered => {}
            OrderBy::Random => sql.push_str(" ORDER BY random()"),
            OrderBy::Columns(terms) => {
                let keys = terms
                    .iter()
                    .map(|term| {
                        format!("{} {} NULLS LAST", term.column, term.direction.as_sql())
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                sql.push_str(" ORDER BY ");
                sql.push_str(&keys);
            }
        }
    }

    fn render_window(&self, sql: &mut String) {
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if self.offset > 0 {
            sql.push_str(&format!(" OFFSET {}", self.offset));
        }
    }
}
