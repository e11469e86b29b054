use std::sync::Arc;

use chrono::{Duration, Utc};
use sqlx::SqlitePool;

use super::broadcast::AlertBroadcaster;
use crate::models::{Alert, CreateAlert, Mention};
use crate::repositories::{AlertRepository, MentionRepository};

/// Sliding window inspected after each negative classification.
const WINDOW_MINUTES: i64 = 10;
/// An alert fires when the window count is strictly greater than this.
const SPIKE_THRESHOLD: i64 = 8;

/// Negative-sentiment spike detector.
///
/// Runs inline after each negative classification; there is no periodic
/// sweep. The window count is a plain read over shared state: concurrent
/// classification bursts may miss or double-see in-flight writes, so the
/// trigger is eventually consistent rather than exact, and a burst can
/// raise several alerts in quick succession.
pub struct AnomalyService {
    db: SqlitePool,
    broadcaster: Arc<AlertBroadcaster>,
}

impl AnomalyService {
    pub fn new(db: SqlitePool, broadcaster: Arc<AlertBroadcaster>) -> Self {
        Self { db, broadcaster }
    }

    /// Count the window and raise at most one alert for this mention.
    pub async fn check_spike(&self, mention: &Mention) -> Result<Option<Alert>, sqlx::Error> {
        let window_start = Utc::now() - Duration::minutes(WINDOW_MINUTES);
        let count = MentionRepository::count_negative_since(&self.db, window_start).await?;

        if count <= SPIKE_THRESHOLD {
            return Ok(None);
        }

        let alert = AlertRepository::create(
            &self.db,
            CreateAlert {
                mention_id: mention.id,
                alert_type: "negative_spike".to_string(),
                description: format!(
                    "{} negative mentions in last {} minutes",
                    count, WINDOW_MINUTES
                ),
            },
        )
        .await?;

        tracing::info!(
            "Negative spike: {} mentions in window, alert {} created",
            count,
            alert.id
        );

        self.broadcaster.broadcast(&alert, &mention.text).await;

        Ok(Some(alert))
    }
}
