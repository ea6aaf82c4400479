// Error types
// Building a query and sending it fail in different ways, so each side
// gets its own error enum

use thiserror::Error;

/// Errors raised while loading a form or turning it into a query
#[derive(Debug, Error)]
pub enum QueryError {
    /// A field label that is not part of the dataset's catalog
    #[error("unknown field '{label}' for dataset '{dataset}' (expected one of: {expected})")]
    UnknownField {
        dataset: String,
        label: String,
        expected: String,
    },

    /// A comparison operator label other than LT, GT, EQ or IS
    #[error("unknown comparison operator '{0}'")]
    UnknownOperator(String),

    /// An aggregation label other than MAX, MIN, AVG, COUNT or SUM
    #[error("unknown apply token '{0}'")]
    UnknownApplyToken(String),

    #[error("failed to read form: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed form state: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while sending a query to the endpoint
#[derive(Debug, Error)]
pub enum SendError {
    /// The request never produced a response (connection refused, timeout, ...)
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered with a non-success status
    #[error("query rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The response body was not valid JSON
    #[error("response is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),

    /// The query could not be encoded as JSON
    #[error("failed to encode query: {0}")]
    Encode(#[source] serde_json::Error),
}
