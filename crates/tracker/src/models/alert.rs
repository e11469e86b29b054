use chrono::{DateTime, Utc};
use serde::Serialize;

/// A detected anomaly condition tied to the mention that triggered it.
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub id: i64,
    pub mention_id: i64,
    pub alert_type: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    /// Cleared by an operator action, outside the pipeline.
    pub resolved: bool,
}

/// Fields needed to persist a new alert.
#[derive(Debug, Clone)]
pub struct CreateAlert {
    pub mention_id: i64,
    pub alert_type: String,
    pub description: String,
}
