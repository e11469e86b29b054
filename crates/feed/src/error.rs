use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status} when fetching {url}")]
    Http {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Failed to parse feed: {0}")]
    Parse(String),
}
