use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use classify::{Classifier, Sentiment};
use feed::{FeedClient, FeedItem};
use sqlx::SqlitePool;

use super::anomaly::AnomalyService;
use super::dispatch::{Dispatch, Job, TaskRunner};
use crate::error::{TrackerError, TrackerResult};
use crate::models::{CreateMention, Mention};
use crate::repositories::{MentionRepository, DEDUP_PREFIX_CHARS};

/// Outcome of `trigger_fetch`, depending on background availability.
#[derive(Debug)]
pub enum FetchTrigger {
    /// Handed to a background worker; results land asynchronously.
    Queued,
    /// Executed inline on the calling task.
    Completed(FetchSummary),
}

/// What one fetch call did.
#[derive(Debug, Default)]
pub struct FetchSummary {
    /// Newly persisted mentions.
    pub created: u32,
}

/// Structured result of one classification step.
#[derive(Debug)]
pub struct ClassifyOutcome {
    pub sentiment: Sentiment,
    /// Whether the anomaly detector raised an alert in this step.
    pub alerted: bool,
}

/// Ingestion-to-alert pipeline.
///
/// Owns the feed client, classifier, anomaly detector and task runner, and
/// exposes the operations outer layers call: [`Pipeline::trigger_fetch`]
/// and [`Pipeline::classify_mention`].
pub struct Pipeline {
    db: SqlitePool,
    feed: Arc<FeedClient>,
    classifier: Arc<dyn Classifier>,
    anomaly: AnomalyService,
    runner: TaskRunner,
}

impl Pipeline {
    pub fn new(
        db: SqlitePool,
        feed: Arc<FeedClient>,
        classifier: Arc<dyn Classifier>,
        anomaly: AnomalyService,
        runner: TaskRunner,
    ) -> Self {
        Self {
            db,
            feed,
            classifier,
            anomaly,
            runner,
        }
    }

    /// Entry point for fetch requests: dispatches to a worker when the
    /// background system is up, otherwise fetches inline before returning.
    pub async fn trigger_fetch(&self, url: &str) -> TrackerResult<FetchTrigger> {
        let job = Job::FetchFeed {
            url: url.to_string(),
        };
        match self.runner.dispatch(job).await {
            Dispatch::Queued => Ok(FetchTrigger::Queued),
            Dispatch::Inline(_) => Ok(FetchTrigger::Completed(self.fetch_feed(url).await?)),
        }
    }

    /// Fetch a feed and ingest its items. Fetch and parse failures
    /// propagate unretried; per-item failures are logged and skipped.
    pub async fn fetch_feed(&self, url: &str) -> TrackerResult<FetchSummary> {
        tracing::info!("Fetching feed: {}", url);
        let items = self.feed.fetch(url).await?;

        let summary = self.ingest_items(&items).await;
        tracing::info!("Created {} new mentions from {}", summary.created, url);

        Ok(summary)
    }

    /// Run the dedup-and-create step for each candidate, then hand the new
    /// mentions to the task runner for classification. One bad item cannot
    /// poison the batch.
    pub async fn ingest_items(&self, items: &[FeedItem]) -> FetchSummary {
        let mut summary = FetchSummary::default();

        for item in items {
            match self.ingest_item(item).await {
                Ok(Some(mention)) => {
                    summary.created += 1;
                    self.queue_classification(mention.id).await;
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("Error processing feed item: {}", e);
                }
            }
        }

        summary
    }

    /// Persist one candidate unless it is empty or a same-day near-duplicate.
    async fn ingest_item(&self, item: &FeedItem) -> TrackerResult<Option<Mention>> {
        let text = item.text();
        if text.is_empty() {
            return Ok(None);
        }

        let prefix: String = text.chars().take(DEDUP_PREFIX_CHARS).collect();
        let (day_start, day_end) = calendar_day(item.published);

        if MentionRepository::exists_similar(&self.db, &prefix, day_start, day_end).await? {
            tracing::debug!("Skipping near-duplicate item: {:.60}", text);
            return Ok(None);
        }

        let mention =
            MentionRepository::create(&self.db, CreateMention::from_feed(text, item.published))
                .await?;

        Ok(Some(mention))
    }

    /// Hand a new mention to the task runner, degrading to inline when no
    /// background capacity exists. Inline failures are logged per item.
    async fn queue_classification(&self, mention_id: i64) {
        match self.runner.dispatch(Job::Classify { mention_id }).await {
            Dispatch::Queued => {}
            Dispatch::Inline(_) => {
                if let Err(e) = self.classify_mention(mention_id).await {
                    tracing::error!("Error classifying mention {}: {}", mention_id, e);
                }
            }
        }
    }

    /// Classification step: load, analyze, persist, then check for a
    /// negative spike. A failed store write takes the terminal-error path
    /// so the mention is never retried forever.
    pub async fn classify_mention(&self, mention_id: i64) -> TrackerResult<ClassifyOutcome> {
        let mention = MentionRepository::get_by_id(&self.db, mention_id)
            .await?
            .ok_or_else(|| TrackerError::not_found(format!("Mention {} not found", mention_id)))?;

        // Total function: degrades to the neutral default instead of failing.
        let classification = self.classifier.analyze(&mention.text).await;

        if let Err(e) =
            MentionRepository::apply_classification(&self.db, mention_id, &classification).await
        {
            tracing::error!(
                "Error persisting classification for mention {}: {}",
                mention_id,
                e
            );
            if let Err(mark_err) = MentionRepository::mark_failed(&self.db, mention_id).await {
                tracing::error!(
                    "Terminal write for mention {} also failed: {}",
                    mention_id,
                    mark_err
                );
            }
            return Err(e.into());
        }

        let mut alerted = false;
        if classification.sentiment == Sentiment::Negative {
            alerted = self.anomaly.check_spike(&mention).await?.is_some();
        }

        tracing::debug!(
            "Processed mention {}: {} ({:.2})",
            mention_id,
            classification.sentiment,
            classification.confidence
        );

        Ok(ClassifyOutcome {
            sentiment: classification.sentiment,
            alerted,
        })
    }

    /// Worker-side execution of a queued job.
    pub async fn execute(&self, job: Job) -> TrackerResult<()> {
        match job {
            Job::FetchFeed { url } => {
                self.fetch_feed(&url).await?;
            }
            Job::Classify { mention_id } => {
                self.classify_mention(mention_id).await?;
            }
        }

        Ok(())
    }
}

/// UTC day bounds for the calendar-day dedup comparison.
fn calendar_day(ts: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc.from_utc_datetime(&ts.date_naive().and_time(NaiveTime::MIN));
    (start, start + Duration::days(1))
}
