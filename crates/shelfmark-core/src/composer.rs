//! Translates [`QueryCriteria`] into a catalog [`QueryPlan`].

use shelfmark_catalog::{BookColumn, Predicate, QueryPlan};

use crate::criteria::{Filter, QueryCriteria, Sort, SortKind};

/// Format codes of paper editions.
pub const PAPER_FORMATS: [&str; 2] = ["BC", "BB"];
/// Format codes of electronic editions.
pub const ELECTRONIC_FORMATS: [&str; 1] = ["DG"];

const FICTION_CATEGORY: &str = "fiction";

/// Builds composed query plans against the joined book view.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookQueryComposer;

impl BookQueryComposer {
    /// Compose predicates, ordering, and window for `criteria`.
    ///
    /// Without a sort the plan is randomly ordered.
    pub fn compose(criteria: &QueryCriteria) -> QueryPlan {
        let mut plan = Self::filters(criteria);

        plan = match criteria.sort {
            Some(sort) => Self::order(plan, sort),
            None => plan.order_randomly(),
        };

        let plan = plan
            .with_offset(criteria.offset)
            .with_limit(criteria.limit);
        tracing::debug!(sql = %plan.render().sql, "composed book query");
        plan
    }

    /// Predicates only: no ordering and no window.
    pub fn filters(criteria: &QueryCriteria) -> QueryPlan {
        let mut plan = QueryPlan::new();

        if let Some(fiction) = criteria.fiction {
            plan = plan.with_predicate(Predicate::HasCategory {
                category: String::from(FICTION_CATEGORY),
                present: fiction,
            });
        }

        match &criteria.filter {
            Some(Filter::Collection(collection)) => {
                plan = plan.with_predicate(Predicate::InCollection(collection.clone()));
            }
            Some(Filter::Genre(genre)) => {
                plan = plan.with_predicate(Predicate::HasCategory {
                    category: genre.clone(),
                    present: true,
                });
            }
            _ => {}
        }

        if criteria.is_paper_only() {
            plan = plan.with_predicate(paper_format_predicate());
        }

        match &criteria.filter {
            Some(Filter::Author(author)) => {
                plan = plan.with_predicate(Predicate::ByAuthor(author.clone()));
            }
            Some(Filter::Keyword(keyword)) => {
                let terms = [
                    BookColumn::PublisherKeynote,
                    BookColumn::PublisherTitle,
                    BookColumn::BooksellerTitle,
                ]
                .into_iter()
                .map(|column| Predicate::Contains {
                    column,
                    needle: keyword.clone(),
                })
                .collect();
                plan = plan.with_predicate(Predicate::AnyOf(terms));
            }
            _ => {}
        }

        if let Some(age) = criteria.age {
            let terms = age
                .values()
                .into_iter()
                .map(|value| Predicate::IntEquals {
                    column: BookColumn::BooksellerAgeFrom,
                    value: i64::from(value),
                })
                .collect();
            plan = plan.with_predicate(Predicate::AnyOf(terms));
        }

        plan
    }

    fn order(plan: QueryPlan, sort: Sort) -> QueryPlan {
        let direction = sort.direction;
        match sort.kind {
            SortKind::Newest => plan
                .order_by(BookColumn::PublisherPublicationDate, direction)
                .order_by(BookColumn::BooksellerPublicationDate, direction),
            SortKind::Cheapest => plan.order_by(BookColumn::BooksellerPrice, direction),
            SortKind::MostPopular => plan
                .order_by(BookColumn::BooksellerAverageRating, direction)
                .order_by(BookColumn::PublisherAverageRating, direction),
            SortKind::Column(column) => plan.order_by(column, direction),
        }
    }
}

/// Restrict to books with at least one paper edition.
pub fn paper_format_predicate() -> Predicate {
    Predicate::HasFormat(PAPER_FORMATS.iter().map(|format| (*format).to_owned()).collect())
}
