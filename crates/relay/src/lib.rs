mod hub;

pub use hub::BroadcastHub;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Group joined by live mention subscribers.
pub const MENTIONS_GROUP: &str = "mentions";

/// Wire event pushed to live subscribers when an alert fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub alert_id: i64,
    pub alert_type: String,
    pub description: String,
    /// Leading snippet of the triggering mention's text.
    pub mention_text: String,
    pub created_at: DateTime<Utc>,
}

/// Live-channel seam.
///
/// Implementations deliver events to whatever transport the outer layers
/// attach: the in-process [`BroadcastHub`], a websocket gateway, tests.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, group: &str, event: &AlertEvent) -> anyhow::Result<()>;
}
