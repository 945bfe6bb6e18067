//! Argument parsing for inbound commands.
//!
//! Only the textual format is checked here; amount semantics (positive,
//! finite) are the engine's call.

#[derive(Debug, thiserror::Error)]
pub(crate) enum ParseError {
    #[error("invalid amount")]
    InvalidAmount,
    #[error("invalid account id")]
    InvalidAccountId,
}

pub(crate) fn parse_amount(input: &str) -> Result<f64, ParseError> {
    input
        .trim()
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidAmount)
}

/// Parses an observer target id. Platform user ids are positive integers.
pub(crate) fn parse_account_id(input: &str) -> Result<i64, ParseError> {
    let id = input
        .trim()
        .parse::<i64>()
        .map_err(|_| ParseError::InvalidAccountId)?;
    if id <= 0 {
        return Err(ParseError::InvalidAccountId);
    }
    Ok(id)
}
