use std::sync::Arc;

use serde_json::Value;
use shelfmark_core::{ResilientApiClient, ReviewCountsAdapter};

use super::Context;
use crate::cli::ReviewCountsArgs;
use crate::error::CliError;

pub async fn run(context: &Context, args: &ReviewCountsArgs) -> Result<Value, CliError> {
    let isbns = args
        .isbns
        .iter()
        .map(|isbn| isbn.trim())
        .filter(|isbn| !isbn.is_empty())
        .collect::<Vec<_>>();
    if isbns.is_empty() {
        return Err(CliError::Command(String::from(
            "at least one isbn is required",
        )));
    }

    let mut client = ResilientApiClient::new(
        context.http.clone(),
        Arc::new(ReviewCountsAdapter::default()),
        ReviewCountsAdapter::attributes(&context.config.goodreads_api_key, isbns.as_slice()),
    )
    .with_timeout_ms(context.config.timeout_ms);

    Ok(client.fetch_first_page().await?)
}
