use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};

use crate::{AlertEvent, Publisher};

/// Buffered events per group before slow subscribers start lagging.
const GROUP_CAPACITY: usize = 64;

/// In-process fan-out over per-group broadcast channels.
///
/// Groups are created lazily on first subscribe. Publishing to a group
/// nobody joined is a no-op, not an error.
pub struct BroadcastHub {
    groups: RwLock<HashMap<String, broadcast::Sender<AlertEvent>>>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self {
            groups: RwLock::new(HashMap::new()),
        }
    }

    /// Join a group and receive every event published after this call.
    pub async fn subscribe(&self, group: &str) -> broadcast::Receiver<AlertEvent> {
        let mut groups = self.groups.write().await;
        groups
            .entry(group.to_string())
            .or_insert_with(|| broadcast::channel(GROUP_CAPACITY).0)
            .subscribe()
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Publisher for BroadcastHub {
    async fn publish(&self, group: &str, event: &AlertEvent) -> anyhow::Result<()> {
        let groups = self.groups.read().await;
        if let Some(sender) = groups.get(group) {
            // A send error only means every subscriber already left.
            if sender.send(event.clone()).is_err() {
                tracing::debug!("No live subscribers left in group '{}'", group);
            }
        }
        Ok(())
    }
}
