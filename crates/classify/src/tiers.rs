use std::sync::Arc;

use reqwest::Client;

use crate::{Classifier, KeywordClassifier, RemoteClassifier};

/// Quality tiers, in the order they should be attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Model-backed inference endpoint; needs an endpoint URL.
    Remote,
    /// Keyword heuristic; always constructible.
    Keyword,
}

/// Configuration for classifier selection.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Tiers tried in order; the first constructible one wins.
    pub tiers: Vec<Tier>,
    /// Inference endpoint for the remote tier.
    pub inference_url: Option<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            tiers: vec![Tier::Remote, Tier::Keyword],
            inference_url: None,
        }
    }
}

/// Resolve the configured tier list into a concrete classifier.
///
/// Selection happens once at startup; there is no per-call probing and no
/// fallback between tiers at analysis time.
pub fn build_classifier(config: &ClassifierConfig, client: Client) -> Arc<dyn Classifier> {
    for tier in &config.tiers {
        match tier {
            Tier::Remote => {
                let Some(url) = config.inference_url.as_deref() else {
                    tracing::debug!("Remote tier has no endpoint configured, trying next tier");
                    continue;
                };
                let classifier = RemoteClassifier::new(client.clone(), url);
                tracing::info!("Classifier tier selected: {}", classifier.name());
                return Arc::new(classifier);
            }
            Tier::Keyword => {
                let classifier = KeywordClassifier::new();
                tracing::info!("Classifier tier selected: {}", classifier.name());
                return Arc::new(classifier);
            }
        }
    }

    tracing::warn!("No classifier tier configured, using the keyword heuristic");
    Arc::new(KeywordClassifier::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_remote_tier_falls_through_to_keyword() {
        let classifier = build_classifier(&ClassifierConfig::default(), Client::new());
        assert_eq!(classifier.name(), "keyword");
    }

    #[test]
    fn configured_remote_tier_wins() {
        let config = ClassifierConfig {
            inference_url: Some("http://localhost:8500/analyze".to_string()),
            ..ClassifierConfig::default()
        };

        let classifier = build_classifier(&config, Client::new());
        assert_eq!(classifier.name(), "remote");
    }

    #[test]
    fn tier_order_is_respected() {
        let config = ClassifierConfig {
            tiers: vec![Tier::Keyword, Tier::Remote],
            inference_url: Some("http://localhost:8500/analyze".to_string()),
        };

        let classifier = build_classifier(&config, Client::new());
        assert_eq!(classifier.name(), "keyword");
    }
}
