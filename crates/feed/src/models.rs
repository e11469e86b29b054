use chrono::{DateTime, Utc};

/// A single entry parsed out of a feed document.
#[derive(Debug, Clone)]
pub struct FeedItem {
    pub title: String,
    pub description: String,
    /// Publish timestamp from the source, or the parse time when the
    /// source value was missing or unparseable.
    pub published: DateTime<Utc>,
}

impl FeedItem {
    /// Combined title and description, as used for dedup and classification.
    pub fn text(&self) -> String {
        let combined = format!("{}\n\n{}", self.title, self.description);
        combined.trim().to_string()
    }
}
