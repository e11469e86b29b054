use std::sync::Arc;

use relay::{AlertEvent, Publisher, MENTIONS_GROUP};

use crate::models::Alert;

/// Leading mention-text length included in the wire event.
const SNIPPET_CHARS: usize = 200;

/// Best-effort fan-out of alert events to live subscribers.
///
/// Alerts are already durable when this runs; a missing transport or a
/// failed publish is logged and otherwise ignored.
pub struct AlertBroadcaster {
    publisher: Option<Arc<dyn Publisher>>,
}

impl AlertBroadcaster {
    pub fn new(publisher: Option<Arc<dyn Publisher>>) -> Self {
        Self { publisher }
    }

    pub async fn broadcast(&self, alert: &Alert, mention_text: &str) {
        let Some(publisher) = &self.publisher else {
            tracing::warn!("Live channel not available, skipping alert broadcast");
            return;
        };

        let event = AlertEvent {
            kind: "mention_alert".to_string(),
            alert_id: alert.id,
            alert_type: alert.alert_type.clone(),
            description: alert.description.clone(),
            mention_text: mention_text.chars().take(SNIPPET_CHARS).collect(),
            created_at: alert.created_at,
        };

        if let Err(e) = publisher.publish(MENTIONS_GROUP, &event).await {
            tracing::warn!("Error broadcasting alert {}: {}", alert.id, e);
        }
    }
}
