use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Upstream provider identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// Review-count service.
    Goodreads,
    /// Publisher extracts feed.
    Panmacmillan,
    /// Bookseller search feed.
    Supadu,
    /// Recommendation service.
    Tastekid,
}

impl ProviderId {
    pub const ALL: [Self; 4] = [
        Self::Goodreads,
        Self::Panmacmillan,
        Self::Supadu,
        Self::Tastekid,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Goodreads => "goodreads",
            Self::Panmacmillan => "panmacmillan",
            Self::Supadu => "supadu",
            Self::Tastekid => "tastekid",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "goodreads" => Ok(Self::Goodreads),
            "panmacmillan" => Ok(Self::Panmacmillan),
            "supadu" => Ok(Self::Supadu),
            "tastekid" => Ok(Self::Tastekid),
            other => Err(ValidationError::InvalidProvider {
                value: other.to_owned(),
            }),
        }
    }
}
