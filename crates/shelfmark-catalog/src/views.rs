//! Database views over the two book sources.

use ::duckdb::Connection;

/// Name of the pre-joined book view every composed query runs against.
pub const FULL_JOIN_VIEW: &str = "full_join_books";

/// Create database views for catalog queries.
///
/// Creates `full_join_books`: a full outer join of `publisher_books` and
/// `bookseller_books` on ISBN-13, so a row may carry one source or both.
/// Source columns are prefixed with `publisher_` / `bookseller_`; `isbn13`
/// is the coalesced key used by the link tables.
///
/// # Errors
/// Returns an error if the view creation SQL fails to execute.
pub fn create_views(connection: &Connection) -> Result<(), ::duckdb::Error> {
    connection.execute_batch(
        r"
CREATE OR REPLACE VIEW full_join_books AS
SELECT
    COALESCE(b.isbn13, p.isbn13) AS isbn13,
    p.id AS publisher_id,
    p.isbn13 AS publisher_isbn13,
    p.title AS publisher_title,
    p.author AS publisher_author,
    p.keynote AS publisher_keynote,
    p.extract_html AS publisher_extract_html,
    p.jacket_url AS publisher_jacket_url,
    p.stored_image AS publisher_stored_image,
    p.publication_date AS publisher_publication_date,
    p.average_rating AS publisher_average_rating,
    b.id AS bookseller_id,
    b.isbn13 AS bookseller_isbn13,
    b.title AS bookseller_title,
    b.tagline AS bookseller_tagline,
    b.description AS bookseller_description,
    b.image AS bookseller_image,
    b.stored_image AS bookseller_stored_image,
    b.price AS bookseller_price,
    b.average_rating AS bookseller_average_rating,
    b.publication_date AS bookseller_publication_date,
    b.age_from AS bookseller_age_from,
    b.age_to AS bookseller_age_to
FROM publisher_books p
FULL OUTER JOIN bookseller_books b ON p.isbn13 = b.isbn13;
",
    )?;

    Ok(())
}
