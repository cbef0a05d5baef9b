//! Unified error types for the crate.

use thiserror::Error;

/// Top-level error for index-store operations.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// A hit's metadata JSON could not be parsed.
    #[error("malformed metadata: {0}")]
    MalformedMetadata(String),

    /// Backend returned a non-success HTTP status.
    #[error("backend HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
        snippet: String,
    },

    /// Underlying HTTP transport error.
    #[error("transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),

    /// Embedding the query failed.
    #[error("embedding error: {0}")]
    Embedding(#[from] llm_service::LlmError),
}
