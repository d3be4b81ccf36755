//! Caller-supplied book query criteria.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shelfmark_catalog::{BookColumn, SortDirection};

use crate::ValidationError;

pub const DEFAULT_OFFSET: usize = 0;
pub const DEFAULT_LIMIT: usize = 5;
/// Widest accepted age range, as `to - from`.
pub const MAX_AGE_SPAN: i32 = 120;

/// Filter axis of a book query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Filter {
    /// Named collection, by seo name.
    Collection(String),
    /// Category name.
    Genre(String),
    Author(String),
    /// Case-insensitive substring of keynote or titles.
    Keyword(String),
}

impl Filter {
    /// Build a filter from its kind name and value.
    pub fn parse(kind: &str, value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        match kind.trim().to_ascii_lowercase().as_str() {
            "collection" | "carousel" => Ok(Self::Collection(value)),
            "genre" => Ok(Self::Genre(value)),
            "author" => Ok(Self::Author(value)),
            "keyword" => Ok(Self::Keyword(value)),
            other => Err(ValidationError::InvalidFilterKind {
                value: other.to_owned(),
            }),
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Collection(_) => "collection",
            Self::Genre(_) => "genre",
            Self::Author(_) => "author",
            Self::Keyword(_) => "keyword",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Collection(value)
            | Self::Genre(value)
            | Self::Author(value)
            | Self::Keyword(value) => value,
        }
    }
}

/// Sort axis of a book query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKind {
    /// Publisher date, then bookseller date.
    Newest,
    /// Bookseller price.
    Cheapest,
    /// Bookseller rating, then publisher rating.
    MostPopular,
    /// A single whitelisted view column.
    Column(BookColumn),
}

impl FromStr for SortKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "newest" | "publication_date" => Ok(Self::Newest),
            "cheapest" | "price" => Ok(Self::Cheapest),
            "popular" | "most-popular" | "most_popular" | "average_rating" => Ok(Self::MostPopular),
            other => other
                .parse::<BookColumn>()
                .map(Self::Column)
                .map_err(|_| ValidationError::InvalidSortKind {
                    value: other.to_owned(),
                }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub kind: SortKind,
    pub direction: SortDirection,
}

/// Inclusive age band matched against the bookseller `age_from` field.
///
/// `to` is only meaningful when greater than `from`; otherwise only `from` matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub from: i32,
    pub to: Option<i32>,
}

impl AgeRange {
    pub const fn exactly(from: i32) -> Self {
        Self { from, to: None }
    }

    pub const fn between(from: i32, to: i32) -> Self {
        Self { from, to: Some(to) }
    }

    /// Years between the bounds; zero when the range degenerates to `from`.
    pub fn span(&self) -> i64 {
        match self.to {
            Some(to) if self.from < to => i64::from(to) - i64::from(self.from),
            _ => 0,
        }
    }

    /// Every `age_from` value the range matches, in ascending order.
    pub fn values(&self) -> Vec<i32> {
        match self.to {
            Some(to) if self.from < to => (self.from..=to).collect(),
            _ => vec![self.from],
        }
    }
}

/// Which formats a book must be available in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatRestriction {
    #[default]
    Any,
    PaperOnly,
}

/// Criteria for a book query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryCriteria {
    /// `Some(true)` fiction only, `Some(false)` non-fiction only.
    pub fiction: Option<bool>,
    pub filter: Option<Filter>,
    pub sort: Option<Sort>,
    pub age: Option<AgeRange>,
    pub format: FormatRestriction,
    pub offset: usize,
    pub limit: usize,
}

impl Default for QueryCriteria {
    fn default() -> Self {
        Self {
            fiction: None,
            filter: None,
            sort: None,
            age: None,
            format: FormatRestriction::Any,
            offset: DEFAULT_OFFSET,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl QueryCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fiction(mut self, fiction: Option<bool>) -> Self {
        self.fiction = fiction;
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn sorted_by(mut self, kind: SortKind, direction: SortDirection) -> Self {
        self.sort = Some(Sort { kind, direction });
        self
    }

    pub fn with_age(mut self, age: AgeRange) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_format(mut self, format: FormatRestriction) -> Self {
        self.format = format;
        self
    }

    pub fn paper_only(self) -> Self {
        self.with_format(FormatRestriction::PaperOnly)
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub const fn is_paper_only(&self) -> bool {
        matches!(self.format, FormatRestriction::PaperOnly)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.limit == 0 {
            return Err(ValidationError::ZeroLimit);
        }

        if let Some(filter) = &self.filter {
            if filter.value().trim().is_empty() {
                return Err(ValidationError::EmptyFilterValue {
                    field: filter.kind(),
                });
            }
        }

        if let Some(age) = self.age {
            if age.span() > i64::from(MAX_AGE_SPAN) {
                return Err(ValidationError::AgeRangeTooWide {
                    from: age.from,
                    to: age.to.unwrap_or(age.from),
                    max: MAX_AGE_SPAN,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_five_of_anything() {
        let criteria = QueryCriteria::new();
        assert_eq!(criteria.offset, 0);
        assert_eq!(criteria.limit, 5);
        assert_eq!(criteria.fiction, None);
        assert!(!criteria.is_paper_only());
        assert!(criteria.validate().is_ok());
    }

    #[test]
    fn zero_limit_and_blank_filters_are_rejected() {
        assert_eq!(
            QueryCriteria::new().with_limit(0).validate(),
            Err(ValidationError::ZeroLimit)
        );
        assert_eq!(
            QueryCriteria::new()
                .with_filter(Filter::Genre(String::from("  ")))
                .validate(),
            Err(ValidationError::EmptyFilterValue { field: "genre" })
        );
    }

    #[test]
    fn age_range_expands_inclusively() {
        assert_eq!(AgeRange::between(9, 12).values(), vec![9, 10, 11, 12]);
        assert_eq!(AgeRange::exactly(7).values(), vec![7]);
        assert_eq!(AgeRange::between(12, 9).values(), vec![12]);
        assert_eq!(AgeRange::between(5, 5).values(), vec![5]);
    }

    #[test]
    fn age_ranges_wider_than_the_maximum_span_are_rejected() {
        assert!(QueryCriteria::new()
            .with_age(AgeRange::between(0, MAX_AGE_SPAN))
            .validate()
            .is_ok());
        assert_eq!(
            QueryCriteria::new()
                .with_age(AgeRange::between(0, i32::MAX))
                .validate(),
            Err(ValidationError::AgeRangeTooWide {
                from: 0,
                to: i32::MAX,
                max: MAX_AGE_SPAN,
            })
        );
        assert_eq!(AgeRange::between(i32::MIN, i32::MAX).span(), i64::from(u32::MAX));
        assert_eq!(AgeRange::between(12, 9).span(), 0);
    }

    #[test]
    fn sort_kinds_parse_named_sorts_and_columns() {
        assert_eq!("newest".parse::<SortKind>(), Ok(SortKind::Newest));
        assert_eq!("Cheapest".parse::<SortKind>(), Ok(SortKind::Cheapest));
        assert_eq!("popular".parse::<SortKind>(), Ok(SortKind::MostPopular));
        assert_eq!(
            "bookseller_title".parse::<SortKind>(),
            Ok(SortKind::Column(BookColumn::BooksellerTitle))
        );
        assert!("title; --".parse::<SortKind>().is_err());
    }

    #[test]
    fn filter_kinds_parse_by_name() {
        assert_eq!(
            Filter::parse("keyword", "dragon"),
            Ok(Filter::Keyword(String::from("dragon")))
        );
        assert_eq!(
            Filter::parse("carousel", "summer-reads"),
            Ok(Filter::Collection(String::from("summer-reads")))
        );
        assert!(Filter::parse("isbn", "1").is_err());
    }
}
