mod keyword;
mod models;
mod remote;
mod tiers;

pub use keyword::KeywordClassifier;
pub use models::{Classification, Sentiment};
pub use remote::RemoteClassifier;
pub use tiers::{build_classifier, ClassifierConfig, Tier};

use async_trait::async_trait;

/// Text analysis seam.
///
/// Implementations are total: they degrade to the neutral default instead
/// of failing, so classification can never block ingestion.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn analyze(&self, text: &str) -> Classification;

    /// Short tier name used for logging.
    fn name(&self) -> &'static str;
}
