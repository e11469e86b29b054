use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::traits::{JobResult, SchedulerJob};
use crate::services::{FetchTrigger, Pipeline};

/// Periodic re-fetch of the configured feed list.
///
/// Dedup makes the re-fetch idempotent: an unchanged feed creates nothing.
pub struct FeedRefreshJob {
    pipeline: Arc<Pipeline>,
    urls: Vec<String>,
    interval: Duration,
}

impl FeedRefreshJob {
    pub fn new(pipeline: Arc<Pipeline>, urls: Vec<String>, interval: Duration) -> Self {
        Self {
            pipeline,
            urls,
            interval,
        }
    }

    async fn refresh_one(&self, url: &str) {
        match self.pipeline.trigger_fetch(url).await {
            Ok(FetchTrigger::Queued) => {
                tracing::debug!("Feed fetch queued: {}", url);
            }
            Ok(FetchTrigger::Completed(summary)) => {
                tracing::info!("Feed fetch completed: {} ({} created)", url, summary.created);
            }
            Err(e) => {
                tracing::error!("Feed fetch failed for {}: {}", url, e);
            }
        }
    }
}

#[async_trait]
impl SchedulerJob for FeedRefreshJob {
    fn name(&self) -> &'static str {
        "FeedRefresh"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn execute(&self) -> JobResult {
        if self.urls.is_empty() {
            tracing::debug!("No feeds configured");
            return Ok(());
        }

        tracing::debug!("Refreshing {} feeds", self.urls.len());
        let futures: Vec<_> = self.urls.iter().map(|url| self.refresh_one(url)).collect();
        futures::future::join_all(futures).await;

        Ok(())
    }
}
