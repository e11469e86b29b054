use chrono::{DateTime, Utc};
use classify::{Classification, Sentiment};
use sqlx::SqlitePool;

use crate::models::{CreateMention, Mention};

/// Common SELECT fields for mention queries
const SELECT_MENTION: &str = r#"
    SELECT
        id, source, external_id, author, text,
        event_at, fetched_at, language,
        sentiment, sentiment_score, topic, processed
    FROM mention
"#;

/// Leading character window compared during dedup.
pub const DEDUP_PREFIX_CHARS: usize = 120;

pub struct MentionRepository;

impl MentionRepository {
    /// Create a new, unprocessed mention.
    pub async fn create(pool: &SqlitePool, data: CreateMention) -> Result<Mention, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO mention (source, external_id, author, text, event_at, fetched_at, language, processed)
            VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE)
            RETURNING id
            "#,
        )
        .bind(&data.source)
        .bind(&data.external_id)
        .bind(&data.author)
        .bind(&data.text)
        .bind(data.event_at)
        .bind(Utc::now())
        .bind(&data.language)
        .fetch_one(pool)
        .await?;

        let id: i64 = sqlx::Row::get(&result, "id");
        Self::get_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Get a mention by ID
    pub async fn get_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Mention>, sqlx::Error> {
        let query = format!("{} WHERE id = $1", SELECT_MENTION);
        let row = sqlx::query_as::<_, MentionRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// Apply a finished classification in one atomic write.
    pub async fn apply_classification(
        pool: &SqlitePool,
        id: i64,
        classification: &Classification,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE mention SET
                sentiment = $1,
                sentiment_score = $2,
                topic = $3,
                processed = TRUE
            WHERE id = $4
            "#,
        )
        .bind(classification.sentiment.as_str())
        .bind(classification.confidence)
        .bind(&classification.topic)
        .bind(id)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Last-resort terminal write. Keeps a mention whose classification
    /// write failed from being retried forever.
    pub async fn mark_failed(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE mention SET sentiment = 'error', processed = TRUE WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Same-day near-duplicate check: does any mention whose event falls in
    /// `[day_start, day_end)` contain `prefix` (case-insensitive)?
    pub async fn exists_similar(
        pool: &SqlitePool,
        prefix: &str,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM mention
            WHERE event_at >= $1 AND event_at < $2
              AND instr(lower(text), lower($3)) > 0
            "#,
        )
        .bind(day_start)
        .bind(day_end)
        .bind(prefix)
        .fetch_one(pool)
        .await?;

        Ok(count > 0)
    }

    /// Negative-sentiment mentions whose event time falls after `since`.
    pub async fn count_negative_since(
        pool: &SqlitePool,
        since: DateTime<Utc>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM mention WHERE sentiment = 'negative' AND event_at >= $1",
        )
        .bind(since)
        .fetch_one(pool)
        .await
    }
}

/// Internal row type for mapping SQLite results
#[derive(Debug, sqlx::FromRow)]
struct MentionRow {
    id: i64,
    source: String,
    external_id: Option<String>,
    author: Option<String>,
    text: String,
    event_at: DateTime<Utc>,
    fetched_at: DateTime<Utc>,
    language: String,
    sentiment: Option<String>,
    sentiment_score: Option<f32>,
    topic: Option<String>,
    processed: bool,
}

impl From<MentionRow> for Mention {
    fn from(row: MentionRow) -> Self {
        let sentiment = row.sentiment.as_deref().and_then(|s| {
            s.parse::<Sentiment>()
                .map_err(|_| {
                    tracing::warn!("Invalid sentiment '{}' for mention id {}", s, row.id);
                })
                .ok()
        });

        Self {
            id: row.id,
            source: row.source,
            external_id: row.external_id,
            author: row.author,
            text: row.text,
            event_at: row.event_at,
            fetched_at: row.fetched_at,
            language: row.language,
            sentiment,
            sentiment_score: row.sentiment_score,
            topic: row.topic,
            processed: row.processed,
        }
    }
}
