// Error types shared by the API client and the UI loop.
//
// The taxonomy is flat: a request either fails to encode, fails in transit,
// or a numeric field typed by the user does not parse. Closing stdin ends
// the session; any other console I/O error is fatal.

use std::io;
use thiserror::Error;

/// Failure while building or sending a request.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

/// A numeric field typed by the user did not parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("quantity must be an integer")]
    Quantity,
    #[error("amount must be a number")]
    Amount,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("input stream closed")]
    InputClosed,
    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),
}
