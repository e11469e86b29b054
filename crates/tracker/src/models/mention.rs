use chrono::{DateTime, Utc};
use classify::Sentiment;
use serde::Serialize;

/// One ingested and (eventually) classified piece of text from a source.
#[derive(Debug, Clone, Serialize)]
pub struct Mention {
    pub id: i64,
    pub source: String,
    pub external_id: Option<String>,
    pub author: Option<String>,
    pub text: String,
    /// Timestamp of the event at the source. Never null.
    pub event_at: DateTime<Utc>,
    /// When the pipeline ingested the item. Set once.
    pub fetched_at: DateTime<Utc>,
    pub language: String,
    /// None until classification completes.
    pub sentiment: Option<Sentiment>,
    pub sentiment_score: Option<f32>,
    pub topic: Option<String>,
    pub processed: bool,
}

/// Fields needed to persist a new, unprocessed mention.
#[derive(Debug, Clone)]
pub struct CreateMention {
    pub source: String,
    pub external_id: Option<String>,
    pub author: Option<String>,
    pub text: String,
    pub event_at: DateTime<Utc>,
    pub language: String,
}

impl CreateMention {
    /// A plain feed item: no external id or author, default language.
    pub fn from_feed(text: String, event_at: DateTime<Utc>) -> Self {
        Self {
            source: "rss".to_string(),
            external_id: None,
            author: None,
            text,
            event_at,
            language: "en".to_string(),
        }
    }
}
