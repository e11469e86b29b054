use async_trait::async_trait;

use crate::models::{Classification, Sentiment};
use crate::Classifier;

const POSITIVE_KEYWORDS: &[&str] = &[
    "good",
    "great",
    "excellent",
    "amazing",
    "awesome",
    "love",
    "best",
    "fantastic",
    "wonderful",
    "happy",
    "win",
    "success",
    "improved",
    "launch",
    "growth",
    "reliable",
    "recommend",
    "praise",
];

const NEGATIVE_KEYWORDS: &[&str] = &[
    "bad",
    "terrible",
    "awful",
    "horrible",
    "hate",
    "worst",
    "fail",
    "failure",
    "broken",
    "bug",
    "crash",
    "outage",
    "scandal",
    "lawsuit",
    "breach",
    "loss",
    "angry",
    "disappointed",
    "scam",
    "refund",
];

/// Confidence floor for any decided label, and the value used for a tie.
const CONFIDENCE_FLOOR: f32 = 0.5;
/// Confidence cap for the keyword heuristic.
const CONFIDENCE_CAP: f32 = 0.9;
/// Confidence gained per hit of margin between the two keyword sets.
const CONFIDENCE_STEP: f32 = 0.1;

/// Lightweight fallback tier: counts curated keyword hits.
/// Bounded cost, pure computation, no external model dependency.
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }

    fn count_hits(tokens: &[String], keywords: &[&str]) -> usize {
        tokens
            .iter()
            .filter(|t| keywords.contains(&t.as_str()))
            .count()
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Classifier for KeywordClassifier {
    async fn analyze(&self, text: &str) -> Classification {
        let text = text.trim();
        if text.is_empty() {
            return Classification::neutral();
        }

        let tokens: Vec<String> = text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        let positive = Self::count_hits(&tokens, POSITIVE_KEYWORDS);
        let negative = Self::count_hits(&tokens, NEGATIVE_KEYWORDS);

        let (sentiment, margin) = match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => (Sentiment::Positive, positive - negative),
            std::cmp::Ordering::Less => (Sentiment::Negative, negative - positive),
            std::cmp::Ordering::Equal => (Sentiment::Neutral, 0),
        };

        let confidence = (CONFIDENCE_FLOOR + CONFIDENCE_STEP * margin.saturating_sub(1) as f32)
            .min(CONFIDENCE_CAP);

        Classification {
            sentiment,
            confidence,
            topic: "general".to_string(),
            embedding: None,
        }
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_input_returns_neutral_default() {
        let classifier = KeywordClassifier::new();

        for text in ["", "   ", "\n\t  "] {
            let result = classifier.analyze(text).await;
            assert_eq!(result.sentiment, Sentiment::Neutral);
            assert_eq!(result.confidence, 0.0);
            assert_eq!(result.topic, "general");
            assert!(result.embedding.is_none());
        }
    }

    #[tokio::test]
    async fn positive_majority_yields_positive_label() {
        let classifier = KeywordClassifier::new();

        let result = classifier
            .analyze("A great launch, reliable and awesome despite one bug")
            .await;
        assert_eq!(result.sentiment, Sentiment::Positive);
        assert!(result.confidence >= 0.5 && result.confidence <= 0.9);
    }

    #[tokio::test]
    async fn negative_majority_yields_negative_label() {
        let classifier = KeywordClassifier::new();

        let result = classifier.analyze("Terrible outage, broken again").await;
        assert_eq!(result.sentiment, Sentiment::Negative);
        assert!(result.confidence >= 0.5 && result.confidence <= 0.9);
    }

    #[tokio::test]
    async fn tie_is_neutral_with_half_confidence() {
        let classifier = KeywordClassifier::new();

        let result = classifier.analyze("A great product with a bad cable").await;
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert_eq!(result.confidence, 0.5);

        let no_hits = classifier.analyze("The quarterly report was published").await;
        assert_eq!(no_hits.sentiment, Sentiment::Neutral);
        assert_eq!(no_hits.confidence, 0.5);
    }

    #[tokio::test]
    async fn confidence_scales_with_margin_and_caps() {
        let classifier = KeywordClassifier::new();

        let narrow = classifier.analyze("bad news today").await;
        assert_eq!(narrow.sentiment, Sentiment::Negative);
        assert_eq!(narrow.confidence, 0.5);

        let wide = classifier
            .analyze("terrible awful horrible broken crash outage scandal")
            .await;
        assert_eq!(wide.sentiment, Sentiment::Negative);
        assert_eq!(wide.confidence, 0.9);
    }

    #[tokio::test]
    async fn matching_is_case_insensitive_and_word_based() {
        let classifier = KeywordClassifier::new();

        let result = classifier.analyze("GREAT launch!").await;
        assert_eq!(result.sentiment, Sentiment::Positive);

        // "bugs" is not "bug": tokens are matched whole.
        let result = classifier.analyze("ladybugs are insects").await;
        assert_eq!(result.sentiment, Sentiment::Neutral);
    }
}
