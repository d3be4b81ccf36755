use serde::{Deserialize, Serialize};

/// One row of the `full_join_books` view.
///
/// Either side may be entirely empty when a book exists in only one source.
/// Dates are ISO-8601 (`YYYY-MM-DD`) strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookRow {
    pub isbn13: String,
    pub publisher_id: Option<i64>,
    pub publisher_isbn13: Option<String>,
    pub publisher_title: Option<String>,
    pub publisher_author: Option<String>,
    pub publisher_keynote: Option<String>,
    pub publisher_extract_html: Option<String>,
    pub publisher_jacket_url: Option<String>,
    pub publisher_stored_image: Option<String>,
    pub publisher_publication_date: Option<String>,
    pub publisher_average_rating: Option<f64>,
    pub bookseller_id: Option<i64>,
    pub bookseller_isbn13: Option<String>,
    pub bookseller_title: Option<String>,
    pub bookseller_tagline: Option<String>,
    pub bookseller_description: Option<String>,
    pub bookseller_image: Option<String>,
    pub bookseller_stored_image: Option<String>,
    pub bookseller_price: Option<f64>,
    pub bookseller_average_rating: Option<f64>,
    pub bookseller_publication_date: Option<String>,
    pub bookseller_age_from: Option<i32>,
    pub bookseller_age_to: Option<i32>,
}

/// A publisher metadata feed record for ingestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublisherBook {
    pub id: i64,
    pub isbn13: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub keynote: Option<String>,
    pub extract_html: Option<String>,
    pub jacket_url: Option<String>,
    /// File name inside the publisher image cache directory.
    pub stored_image: Option<String>,
    pub publication_date: Option<String>,
    pub average_rating: Option<f64>,
}

/// A bookseller collection feed record for ingestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BooksellerBook {
    pub id: i64,
    pub isbn13: String,
    pub title: Option<String>,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    /// File name inside the bookseller image cache directory.
    pub stored_image: Option<String>,
    pub price: Option<f64>,
    pub average_rating: Option<f64>,
    pub publication_date: Option<String>,
    pub age_from: Option<i32>,
    pub age_to: Option<i32>,
    /// Linked author names, in display order.
    pub authors: Vec<String>,
}

/// Which source table a format link belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookSourceKind {
    Publisher,
    Bookseller,
}

impl BookSourceKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Publisher => "publisher",
            Self::Bookseller => "bookseller",
        }
    }
}

/// Availability of a book in a format, possibly under a different edition ISBN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatLink {
    pub source: BookSourceKind,
    pub isbn13: String,
    /// Format code such as `BC`, `BB` or `DG`.
    pub format: String,
    pub format_isbn13: String,
}
