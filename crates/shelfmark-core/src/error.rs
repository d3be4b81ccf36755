use thiserror::Error;

/// Validation errors for caller-supplied criteria and identifiers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("limit must be greater than zero")]
    ZeroLimit,
    #[error("{field} filter value cannot be empty")]
    EmptyFilterValue { field: &'static str },
    #[error("isbn cannot be empty")]
    EmptyIsbn,
    #[error("age range {from}..={to} spans more than {max} years")]
    AgeRangeTooWide { from: i32, to: i32, max: i32 },

    #[error("invalid filter kind '{value}', expected one of collection, genre, author, keyword")]
    InvalidFilterKind { value: String },
    #[error("invalid sort kind '{value}', expected one of newest, cheapest, popular, or a column name")]
    InvalidSortKind { value: String },
    #[error("invalid sort direction '{value}', expected asc or desc")]
    InvalidSortDirection { value: String },
    #[error("invalid provider '{value}', expected one of goodreads, panmacmillan, supadu, tastekid")]
    InvalidProvider { value: String },
}
