//! Backend implementations, one module per search system.

pub mod enterprise;
pub mod hybrid;
pub mod vector;

use std::time::Duration;

use crate::errors::IndexError;

/// Builds the HTTP client every backend shares the shape of.
pub(crate) fn http_client(timeout_secs: u64) -> Result<reqwest::Client, IndexError> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

/// Converts a non-success response into [`IndexError::HttpStatus`].
pub(crate) async fn status_error(resp: reqwest::Response, url: &str) -> IndexError {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    let snippet = llm_service::error_handler::make_snippet(&text);
    IndexError::HttpStatus {
        status,
        url: url.to_string(),
        snippet,
    }
}
