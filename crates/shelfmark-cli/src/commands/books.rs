use serde_json::Value;
use shelfmark_core::AgeRange;

use super::Context;
use crate::cli::{AgeArgs, BrowseArgs, CatalogBrowseArgs, CollectionArgs};
use crate::error::CliError;

pub fn latest(context: &Context, args: &BrowseArgs) -> Result<Value, CliError> {
    let entries = context.aggregator()?.latest(&args.to_criteria())?;
    Ok(serde_json::to_value(entries)?)
}

pub fn fiction(context: &Context, args: &BrowseArgs, fiction: bool) -> Result<Value, CliError> {
    let aggregator = context.aggregator()?;
    let criteria = args.to_criteria();
    let entries = if fiction {
        aggregator.fiction(&criteria)?
    } else {
        aggregator.non_fiction(&criteria)?
    };
    Ok(serde_json::to_value(entries)?)
}

pub fn browse(context: &Context, args: &CatalogBrowseArgs) -> Result<Value, CliError> {
    let criteria = args.browse.to_criteria().with_fiction(args.fiction.flag());
    let entries = context.aggregator()?.browse(&criteria)?;
    Ok(serde_json::to_value(entries)?)
}

pub fn age(context: &Context, args: &AgeArgs) -> Result<Value, CliError> {
    let range = match args.to {
        Some(to) => AgeRange::between(args.from, to),
        None => AgeRange::exactly(args.from),
    };
    let criteria = args.browse.to_criteria().with_age(range);
    let entries = context.aggregator()?.age_based(&criteria)?;
    Ok(serde_json::to_value(entries)?)
}

pub fn collection(context: &Context, args: &CollectionArgs) -> Result<Value, CliError> {
    let entries = context
        .aggregator()?
        .collection(&args.name, args.offset, args.limit)?;
    Ok(serde_json::to_value(entries)?)
}
