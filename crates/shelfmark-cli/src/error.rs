use shelfmark_catalog::CatalogError;
use shelfmark_core::{AggregateError, ApiError, ValidationError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("command error: {0}")]
    Command(String),

    #[error("no book with isbn '{0}'")]
    NotFound(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<AggregateError> for CliError {
    fn from(error: AggregateError) -> Self {
        match error {
            AggregateError::Catalog(error) => Self::Catalog(error),
            AggregateError::Api(error) => Self::Api(error),
            AggregateError::Validation(error) => Self::Validation(error),
        }
    }
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Command(_) => 2,
            Self::NotFound(_) => 3,
            Self::Api(_) => 6,
            Self::Catalog(_) => 7,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
