use serde::{Deserialize, Serialize};

/// Sentiment label attached to a classified mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    /// Terminal marker for mentions whose classification write failed.
    Error,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Error => "error",
        }
    }
}

impl std::str::FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Sentiment::Positive),
            "negative" => Ok(Sentiment::Negative),
            "neutral" => Ok(Sentiment::Neutral),
            "error" => Ok(Sentiment::Error),
            other => Err(format!("unknown sentiment '{}'", other)),
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of analyzing one piece of text.
#[derive(Debug, Clone)]
pub struct Classification {
    pub sentiment: Sentiment,
    /// Always within [0.0, 1.0].
    pub confidence: f32,
    pub topic: String,
    /// Tier-dependent; absence is not an error.
    pub embedding: Option<Vec<f32>>,
}

impl Classification {
    /// Default returned for empty input and for any degraded analysis.
    pub fn neutral() -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            confidence: 0.0,
            topic: "general".to_string(),
            embedding: None,
        }
    }
}
