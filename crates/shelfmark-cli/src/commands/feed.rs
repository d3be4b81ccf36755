use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use shelfmark_core::{
    ExtractsAdapter, ExtractsQuery, ProviderId, ResilientApiClient, SearchFeedAdapter,
    SearchQuery,
};

use super::Context;
use crate::cli::{ExtractsFeedArgs, FeedArgs, FeedBookArgs, FeedCommand, SearchFeedArgs};
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct FeedData {
    provider: ProviderId,
    total_pages: Option<u32>,
    has_more: bool,
    pages: Vec<Value>,
}

pub async fn run(context: &Context, args: &FeedArgs) -> Result<Value, CliError> {
    match &args.feed {
        FeedCommand::Extracts(args) => extracts(context, args).await,
        FeedCommand::Search(args) => search(context, args).await,
        FeedCommand::Book(args) => book(context, args).await,
    }
}

async fn extracts(context: &Context, args: &ExtractsFeedArgs) -> Result<Value, CliError> {
    let query = ExtractsQuery {
        title_contains: args.title.clone(),
        author_contains: args.author.clone(),
        isbn: args.isbn.clone(),
        publication_date_less_than: args.published_before.clone(),
        publication_date_greater_than: args.published_after.clone(),
        ..ExtractsQuery::default()
    };
    let client = ResilientApiClient::new(
        context.http.clone(),
        Arc::new(ExtractsAdapter::default()),
        query.to_attributes(),
    );

    collect_pages(context, client, args.pages).await
}

async fn search(context: &Context, args: &SearchFeedArgs) -> Result<Value, CliError> {
    let query = SearchQuery {
        keyword: args.keyword.clone(),
        collection: args.collection.clone(),
        amount: args.amount,
        page: None,
    };
    let client = ResilientApiClient::new(
        context.http.clone(),
        Arc::new(SearchFeedAdapter::default()),
        SearchFeedAdapter::attributes(&context.config.supadu_auth_token, &query),
    );

    collect_pages(context, client, args.pages).await
}

async fn book(context: &Context, args: &FeedBookArgs) -> Result<Value, CliError> {
    let adapter = SearchFeedAdapter::default();
    let url = adapter.book_url(&args.isbn13);
    let mut client = ResilientApiClient::new(
        context.http.clone(),
        Arc::new(adapter),
        SearchFeedAdapter::attributes(&context.config.supadu_auth_token, &SearchQuery::default()),
    )
    .with_timeout_ms(context.config.timeout_ms);

    Ok(client.fetch_url(&url).await?)
}

async fn collect_pages(
    context: &Context,
    client: ResilientApiClient,
    max_pages: u32,
) -> Result<Value, CliError> {
    if max_pages == 0 {
        return Err(CliError::Command(String::from(
            "--pages must be greater than zero",
        )));
    }

    let mut client = client.with_timeout_ms(context.config.timeout_ms);
    let first = client.fetch_first_page().await?;
    let total_pages = client.total_pages(&first);
    let mut pages = vec![first];

    while client.has_next_page() && pages.len() < max_pages as usize {
        pages.push(client.fetch_next_page().await?);
    }

    Ok(serde_json::to_value(FeedData {
        provider: client.adapter().id(),
        total_pages,
        has_more: client.has_next_page(),
        pages,
    })?)
}
