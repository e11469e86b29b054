use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::models::{Classification, Sentiment};
use crate::Classifier;

/// Truncation applied before sending text to the inference endpoint.
const MAX_INFERENCE_CHARS: usize = 512;

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct InferenceResponse {
    label: String,
    score: f32,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    embedding: Option<Vec<f32>>,
}

/// Full-model tier backed by an external inference endpoint.
///
/// Accuracy and latency are the endpoint's concern; this client maps its
/// response onto a [`Classification`] and degrades to the neutral default
/// when the endpoint is unreachable or returns garbage.
pub struct RemoteClassifier {
    client: Client,
    endpoint: String,
}

impl RemoteClassifier {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    async fn infer(&self, text: &str) -> Result<InferenceResponse, reqwest::Error> {
        self.client
            .post(&self.endpoint)
            .json(&InferenceRequest { text })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    fn map_response(res: InferenceResponse) -> Classification {
        let label = res.label.to_lowercase();
        let score = res.score.clamp(0.0, 1.0);

        let sentiment = match label.as_str() {
            "positive" | "pos" => Sentiment::Positive,
            "negative" | "neg" => Sentiment::Negative,
            _ if score > 0.6 => Sentiment::Positive,
            _ if score < 0.4 => Sentiment::Negative,
            _ => Sentiment::Neutral,
        };

        Classification {
            sentiment,
            confidence: score,
            topic: res
                .topic
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "general".to_string()),
            embedding: res.embedding,
        }
    }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    async fn analyze(&self, text: &str) -> Classification {
        let text = text.trim();
        if text.is_empty() {
            return Classification::neutral();
        }

        let truncated: String = text.chars().take(MAX_INFERENCE_CHARS).collect();
        match self.infer(&truncated).await {
            Ok(res) => Self::map_response(res),
            Err(e) => {
                tracing::warn!("Inference request failed, degrading to neutral: {}", e);
                Classification::neutral()
            }
        }
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}
