use serde::Serialize;
use serde_json::Value;
use shelfmark_core::{FormatRestriction, QueryCriteria, RecommendationsAdapter};

use super::Context;
use crate::cli::SimilarAuthorsArgs;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct SimilarAuthorsData {
    author: String,
    similar: Vec<String>,
}

pub async fn run(context: &Context, args: &SimilarAuthorsArgs) -> Result<Value, CliError> {
    let author = args.author.trim();
    if author.is_empty() {
        return Err(CliError::Command(String::from("author must not be empty")));
    }

    let criteria = QueryCriteria::new()
        .with_fiction(args.fiction.flag())
        .with_format(if args.paper_only {
            FormatRestriction::PaperOnly
        } else {
            FormatRestriction::Any
        })
        .with_offset(args.offset)
        .with_limit(args.limit);

    let mut client = RecommendationsAdapter::similar_authors_client(
        context.http.clone(),
        &context.config.tastekid_api_key,
        author,
    )
    .with_timeout_ms(context.config.timeout_ms);

    let similar = context
        .aggregator()?
        .similar_authors(&mut client, &criteria)
        .await?;

    Ok(serde_json::to_value(SimilarAuthorsData {
        author: author.to_owned(),
        similar,
    })?)
}
