use std::time::Duration;

use reqwest::Client;

use crate::error::FeedError;
use crate::models::FeedItem;
use crate::parser::parse_feed;

/// Hard timeout for a feed download.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Some feed hosts reject non-browser user agents.
const USER_AGENT: &str = "Mozilla/5.0";

/// Feed fetcher client
pub struct FeedClient {
    client: Client,
}

impl FeedClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Create a FeedClient with a custom reqwest Client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetch and parse a feed document.
    ///
    /// Network and HTTP failures are returned unretried; retry policy
    /// belongs to whoever scheduled the fetch.
    pub async fn fetch(&self, url: &str) -> crate::Result<Vec<FeedItem>> {
        tracing::debug!("Fetching feed from: {}", url);

        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            return Err(FeedError::Http {
                status,
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        let items = parse_feed(&bytes)?;

        tracing::debug!("Parsed {} items from {}", items.len(), url);
        Ok(items)
    }
}

impl Default for FeedClient {
    fn default() -> Self {
        Self::new()
    }
}
