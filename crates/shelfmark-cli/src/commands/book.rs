use serde_json::Value;

use super::Context;
use crate::cli::BookArgs;
use crate::error::CliError;

pub fn detail(context: &Context, args: &BookArgs) -> Result<Value, CliError> {
    let detail = context
        .aggregator()?
        .book_detail(&args.isbn13, args.format())?
        .ok_or_else(|| CliError::NotFound(args.isbn13.clone()))?;
    Ok(serde_json::to_value(detail)?)
}

pub fn extract(context: &Context, args: &BookArgs) -> Result<Value, CliError> {
    let view = context
        .aggregator()?
        .extract_view(&args.isbn13, args.format())?
        .ok_or_else(|| CliError::NotFound(args.isbn13.clone()))?;
    Ok(serde_json::to_value(view)?)
}
