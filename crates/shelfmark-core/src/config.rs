//! Environment-driven runtime configuration.

use std::env;
use std::path::PathBuf;

use shelfmark_catalog::{resolve_shelfmark_home, CatalogConfig};

use crate::http_client::DEFAULT_TIMEOUT_MS;
use crate::images::LocalImageCache;

pub const DEFAULT_PUBLIC_URL: &str = "http://localhost";

/// Settings resolved once at startup.
#[derive(Debug, Clone)]
pub struct ShelfmarkConfig {
    pub home: PathBuf,
    pub db_path: PathBuf,
    /// Base URL cached images are served from.
    pub public_url: String,
    pub goodreads_api_key: String,
    pub tastekid_api_key: String,
    pub supadu_auth_token: String,
    pub timeout_ms: u64,
}

impl ShelfmarkConfig {
    /// Read `SHELFMARK_HOME`, `SHELFMARK_PUBLIC_URL`, and provider credentials.
    /// Unset credentials are empty.
    pub fn from_env() -> Self {
        let home = resolve_shelfmark_home();
        let db_path = CatalogConfig::in_home(&home).db_path;

        Self {
            home,
            db_path,
            public_url: non_empty_var("SHELFMARK_PUBLIC_URL")
                .unwrap_or_else(|| String::from(DEFAULT_PUBLIC_URL)),
            goodreads_api_key: non_empty_var("GOODREADS_API_KEY").unwrap_or_default(),
            tastekid_api_key: non_empty_var("TASTEKID_API_KEY").unwrap_or_default(),
            supadu_auth_token: non_empty_var("SUPADU_API_AUTH_TOKEN").unwrap_or_default(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_db_path(mut self, db_path: impl Into<PathBuf>) -> Self {
        self.db_path = db_path.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            db_path: self.db_path.clone(),
            ..CatalogConfig::in_home(&self.home)
        }
    }

    pub fn image_cache(&self) -> LocalImageCache {
        LocalImageCache::in_home(&self.home, self.public_url.clone())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
