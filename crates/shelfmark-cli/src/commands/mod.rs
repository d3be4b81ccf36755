mod book;
mod books;
mod feed;
mod review_counts;
mod similar_authors;

use std::sync::Arc;

use serde_json::Value;
use shelfmark_catalog::Catalog;
use shelfmark_core::{BookAggregator, HttpClient, ReqwestHttpClient, ShelfmarkConfig};

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Resolved configuration and shared transport for one invocation.
pub struct Context {
    pub config: ShelfmarkConfig,
    pub http: Arc<dyn HttpClient>,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Self {
        let mut config = ShelfmarkConfig::from_env().with_timeout_ms(cli.timeout_ms);
        if let Some(db) = &cli.db {
            config = config.with_db_path(db);
        }
        tracing::debug!(
            home = %config.home.display(),
            db = %config.db_path.display(),
            "resolved shelfmark configuration"
        );

        Self {
            config,
            http: Arc::new(ReqwestHttpClient::new()),
        }
    }

    pub fn aggregator(&self) -> Result<BookAggregator, CliError> {
        let catalog = Catalog::open(self.config.catalog_config())?;
        Ok(BookAggregator::new(
            Arc::new(catalog),
            Arc::new(self.config.image_cache()),
        ))
    }
}

pub async fn run(cli: &Cli) -> Result<Value, CliError> {
    let context = Context::from_cli(cli);

    match &cli.command {
        Command::Latest(args) => books::latest(&context, args),
        Command::Fiction(args) => books::fiction(&context, args, true),
        Command::NonFiction(args) => books::fiction(&context, args, false),
        Command::Browse(args) => books::browse(&context, args),
        Command::Age(args) => books::age(&context, args),
        Command::Collection(args) => books::collection(&context, args),
        Command::Detail(args) => book::detail(&context, args),
        Command::Extract(args) => book::extract(&context, args),
        Command::SimilarAuthors(args) => similar_authors::run(&context, args).await,
        Command::ReviewCounts(args) => review_counts::run(&context, args).await,
        Command::Feed(args) => feed::run(&context, args).await,
    }
}
