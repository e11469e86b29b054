use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::{Alert, CreateAlert};

/// Common SELECT fields for alert queries
const SELECT_ALERT: &str = r#"
    SELECT id, mention_id, alert_type, description, created_at, resolved
    FROM alert
"#;

pub struct AlertRepository;

impl AlertRepository {
    /// Create a new alert
    pub async fn create(pool: &SqlitePool, data: CreateAlert) -> Result<Alert, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO alert (mention_id, alert_type, description, created_at, resolved)
            VALUES ($1, $2, $3, $4, FALSE)
            RETURNING id
            "#,
        )
        .bind(data.mention_id)
        .bind(&data.alert_type)
        .bind(&data.description)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        let id: i64 = sqlx::Row::get(&result, "id");
        Self::get_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Get an alert by ID
    pub async fn get_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Alert>, sqlx::Error> {
        let query = format!("{} WHERE id = $1", SELECT_ALERT);
        let row = sqlx::query_as::<_, AlertRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// Get all alerts raised for a mention, newest first
    pub async fn get_by_mention_id(
        pool: &SqlitePool,
        mention_id: i64,
    ) -> Result<Vec<Alert>, sqlx::Error> {
        let query = format!(
            "{} WHERE mention_id = $1 ORDER BY created_at DESC",
            SELECT_ALERT
        );
        let rows = sqlx::query_as::<_, AlertRow>(&query)
            .bind(mention_id)
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Total number of alerts
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM alert")
            .fetch_one(pool)
            .await
    }
}

/// Internal row type for mapping SQLite results
#[derive(Debug, sqlx::FromRow)]
struct AlertRow {
    id: i64,
    mention_id: i64,
    alert_type: String,
    description: String,
    created_at: DateTime<Utc>,
    resolved: bool,
}

impl From<AlertRow> for Alert {
    fn from(row: AlertRow) -> Self {
        Self {
            id: row.id,
            mention_id: row.mention_id,
            alert_type: row.alert_type,
            description: row.description,
            created_at: row.created_at,
            resolved: row.resolved,
        }
    }
}
