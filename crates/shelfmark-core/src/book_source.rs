use shelfmark_catalog::{BookRow, Catalog, CatalogError, QueryPlan};

use crate::composer::PAPER_FORMATS;

/// Relational data source the aggregator reads books from.
pub trait BookSource: Send + Sync {
    /// Execute a composed plan against the joined book view.
    fn fetch_books(&self, plan: &QueryPlan) -> Result<Vec<BookRow>, CatalogError>;

    /// Author names linked to a bookseller record, in display order.
    fn bookseller_author_names(&self, book_id: i64) -> Result<Vec<String>, CatalogError>;

    fn find_by_isbn13(&self, isbn13: &str) -> Result<Option<BookRow>, CatalogError>;

    /// ISBN-13 of a paper edition of the book, publisher links first.
    fn paper_edition_isbn13(&self, isbn13: &str) -> Result<Option<String>, CatalogError>;

    /// Distinct catalog author names among `names`, within `scope`.
    fn authors_matching(
        &self,
        names: &[String],
        scope: &QueryPlan,
    ) -> Result<Vec<String>, CatalogError>;
}

impl BookSource for Catalog {
    fn fetch_books(&self, plan: &QueryPlan) -> Result<Vec<BookRow>, CatalogError> {
        self.select_books(plan)
    }

    fn bookseller_author_names(&self, book_id: i64) -> Result<Vec<String>, CatalogError> {
        Catalog::bookseller_author_names(self, book_id)
    }

    fn find_by_isbn13(&self, isbn13: &str) -> Result<Option<BookRow>, CatalogError> {
        Catalog::find_by_isbn13(self, isbn13)
    }

    fn paper_edition_isbn13(&self, isbn13: &str) -> Result<Option<String>, CatalogError> {
        self.edition_isbn13(isbn13, &PAPER_FORMATS)
    }

    fn authors_matching(
        &self,
        names: &[String],
        scope: &QueryPlan,
    ) -> Result<Vec<String>, CatalogError> {
        Catalog::authors_matching(self, names, scope)
    }
}
