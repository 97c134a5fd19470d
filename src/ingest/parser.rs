use thiserror::Error;

use crate::domain::BatchRecord;

#[derive(Error, Debug)]
#[error("Malformed batch JSON: {0}")]
pub struct ParseError(#[from] serde_json::Error);

/// Parse a decoded Logpush batch: a JSON array of execution records.
pub fn parse_batch(text: &str) -> Result<Vec<BatchRecord>, ParseError> {
    Ok(serde_json::from_str(text)?)
}
