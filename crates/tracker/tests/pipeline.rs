use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use classify::{Classification, KeywordClassifier, Sentiment};
use feed::{FeedClient, FeedItem};
use relay::{AlertEvent, BroadcastHub, Publisher, MENTIONS_GROUP};
use sqlx::SqlitePool;
use tracker::models::CreateMention;
use tracker::repositories::{AlertRepository, MentionRepository};
use tracker::services::{
    AlertBroadcaster, AnomalyService, DispatchError, Dispatcher, Job, Pipeline, TaskRunner,
};
use tracker::TrackerError;

/// Dispatcher that reports itself available but rejects every submit,
/// as a broker that dies between probe and use would.
struct RejectingDispatcher;

#[async_trait]
impl Dispatcher for RejectingDispatcher {
    async fn probe(&self) -> bool {
        true
    }

    async fn submit(&self, job: Job) -> Result<(), DispatchError> {
        Err(DispatchError::Closed(job))
    }
}

/// Publisher whose transport always fails.
struct FailingPublisher;

#[async_trait]
impl Publisher for FailingPublisher {
    async fn publish(&self, _group: &str, _event: &AlertEvent) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("transport unavailable"))
    }
}

async fn test_pool() -> SqlitePool {
    tracker::create_pool("sqlite::memory:", 1)
        .await
        .expect("in-memory pool")
}

fn build_pipeline(
    pool: &SqlitePool,
    publisher: Option<Arc<dyn Publisher>>,
    runner: TaskRunner,
) -> Pipeline {
    let broadcaster = Arc::new(AlertBroadcaster::new(publisher));
    let anomaly = AnomalyService::new(pool.clone(), broadcaster);

    Pipeline::new(
        pool.clone(),
        Arc::new(FeedClient::new()),
        Arc::new(KeywordClassifier::new()),
        anomaly,
        runner,
    )
}

fn item(title: &str, description: &str) -> FeedItem {
    FeedItem {
        title: title.to_string(),
        description: description.to_string(),
        published: Utc::now(),
    }
}

/// Insert `n` already-classified negative mentions with recent event times.
async fn seed_negative_mentions(pool: &SqlitePool, n: usize) {
    let negative = Classification {
        sentiment: Sentiment::Negative,
        confidence: 0.8,
        topic: "general".to_string(),
        embedding: None,
    };

    for i in 0..n {
        let mention = MentionRepository::create(
            pool,
            CreateMention::from_feed(
                format!("customer complaint number {}", i),
                Utc::now() - Duration::minutes(2),
            ),
        )
        .await
        .unwrap();
        MentionRepository::apply_classification(pool, mention.id, &negative)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn three_unique_items_are_created_and_classified() {
    let pool = test_pool().await;
    let pipeline = build_pipeline(&pool, None, TaskRunner::inline_only());

    let items = vec![
        item("Quarterly numbers published", "Results in line with guidance"),
        item("Conference schedule announced", "Talks start at nine"),
        item("New office opened", "The team moved in this week"),
    ];

    let summary = pipeline.ingest_items(&items).await;
    assert_eq!(summary.created, 3);

    for id in 1..=3 {
        let mention = MentionRepository::get_by_id(&pool, id).await.unwrap().unwrap();
        assert!(mention.processed);
        assert_eq!(mention.sentiment, Some(Sentiment::Neutral));
        assert_eq!(mention.topic.as_deref(), Some("general"));
    }

    assert_eq!(AlertRepository::count(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn same_day_duplicates_are_suppressed() {
    let pool = test_pool().await;
    let pipeline = build_pipeline(&pool, None, TaskRunner::inline_only());

    let items = vec![
        item("Acme announces a major product recall", "Details to follow"),
        item("ACME ANNOUNCES A MAJOR PRODUCT RECALL", "Details to follow"),
    ];

    let summary = pipeline.ingest_items(&items).await;
    assert_eq!(summary.created, 1);
}

#[tokio::test]
async fn reingesting_an_unchanged_document_creates_nothing() {
    let pool = test_pool().await;
    let pipeline = build_pipeline(&pool, None, TaskRunner::inline_only());

    let items = vec![
        item("First story of the day", "Some details"),
        item("Second story of the day", "Other details"),
    ];

    let first = pipeline.ingest_items(&items).await;
    assert_eq!(first.created, 2);

    let second = pipeline.ingest_items(&items).await;
    assert_eq!(second.created, 0);
}

#[tokio::test]
async fn empty_items_are_skipped_silently() {
    let pool = test_pool().await;
    let pipeline = build_pipeline(&pool, None, TaskRunner::inline_only());

    let items = vec![item("  ", "\n"), item("Real story", "")];

    let summary = pipeline.ingest_items(&items).await;
    assert_eq!(summary.created, 1);
}

#[tokio::test]
async fn ninth_negative_mention_triggers_exactly_one_alert() {
    let pool = test_pool().await;
    let pipeline = build_pipeline(&pool, None, TaskRunner::inline_only());

    seed_negative_mentions(&pool, 8).await;

    let mention = MentionRepository::create(
        &pool,
        CreateMention::from_feed(
            "Terrible outage again, everything broken and customers angry".to_string(),
            Utc::now(),
        ),
    )
    .await
    .unwrap();

    let outcome = pipeline.classify_mention(mention.id).await.unwrap();
    assert_eq!(outcome.sentiment, Sentiment::Negative);
    assert!(outcome.alerted);

    assert_eq!(AlertRepository::count(&pool).await.unwrap(), 1);

    let alerts = AlertRepository::get_by_mention_id(&pool, mention.id)
        .await
        .unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].alert_type, "negative_spike");
    assert!(alerts[0].description.contains("9 negative mentions"));
    assert!(!alerts[0].resolved);
}

#[tokio::test]
async fn negative_count_at_threshold_triggers_nothing() {
    let pool = test_pool().await;
    let pipeline = build_pipeline(&pool, None, TaskRunner::inline_only());

    seed_negative_mentions(&pool, 7).await;

    let mention = MentionRepository::create(
        &pool,
        CreateMention::from_feed("Awful service, broken hardware".to_string(), Utc::now()),
    )
    .await
    .unwrap();

    let outcome = pipeline.classify_mention(mention.id).await.unwrap();
    assert_eq!(outcome.sentiment, Sentiment::Negative);
    assert!(!outcome.alerted);

    assert_eq!(AlertRepository::count(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn submit_failure_degrades_to_inline_classification() {
    let pool = test_pool().await;
    let runner = TaskRunner::new(Some(Arc::new(RejectingDispatcher) as Arc<dyn Dispatcher>));
    let pipeline = build_pipeline(&pool, None, runner);

    let summary = pipeline
        .ingest_items(&[item("A perfectly ordinary story", "Nothing to see")])
        .await;
    assert_eq!(summary.created, 1);

    let mention = MentionRepository::get_by_id(&pool, 1).await.unwrap().unwrap();
    assert!(mention.processed);
    assert_eq!(mention.sentiment, Some(Sentiment::Neutral));
}

#[tokio::test]
async fn broadcast_failure_does_not_roll_back_the_alert() {
    let pool = test_pool().await;
    let pipeline = build_pipeline(
        &pool,
        Some(Arc::new(FailingPublisher) as Arc<dyn Publisher>),
        TaskRunner::inline_only(),
    );

    seed_negative_mentions(&pool, 8).await;

    let mention = MentionRepository::create(
        &pool,
        CreateMention::from_feed("Worst outage of the year".to_string(), Utc::now()),
    )
    .await
    .unwrap();

    let outcome = pipeline.classify_mention(mention.id).await.unwrap();
    assert!(outcome.alerted);
    assert_eq!(AlertRepository::count(&pool).await.unwrap(), 1);
}

#[tokio::test]
async fn live_subscribers_receive_the_alert_event() {
    let pool = test_pool().await;
    let hub = Arc::new(BroadcastHub::new());
    let mut subscriber = hub.subscribe(MENTIONS_GROUP).await;

    let pipeline = build_pipeline(
        &pool,
        Some(Arc::clone(&hub) as Arc<dyn Publisher>),
        TaskRunner::inline_only(),
    );

    seed_negative_mentions(&pool, 8).await;

    let long_text = "terrible broken outage ".repeat(12);
    assert!(long_text.chars().count() > 200);

    let mention = MentionRepository::create(
        &pool,
        CreateMention::from_feed(long_text, Utc::now()),
    )
    .await
    .unwrap();
    pipeline.classify_mention(mention.id).await.unwrap();

    let event = tokio::time::timeout(std::time::Duration::from_secs(1), subscriber.recv())
        .await
        .expect("event within a second")
        .unwrap();
    assert_eq!(event.kind, "mention_alert");
    assert_eq!(event.alert_type, "negative_spike");
    assert_eq!(event.mention_text.chars().count(), 200);
}

#[tokio::test]
async fn classifying_a_missing_mention_is_not_found() {
    let pool = test_pool().await;
    let pipeline = build_pipeline(&pool, None, TaskRunner::inline_only());

    let err = pipeline.classify_mention(4242).await.unwrap_err();
    assert!(matches!(err, TrackerError::NotFound(_)));
}

#[tokio::test]
async fn old_negative_mentions_fall_out_of_the_window() {
    let pool = test_pool().await;
    let pipeline = build_pipeline(&pool, None, TaskRunner::inline_only());

    // Nine negatives, but all older than the ten-minute window.
    let negative = Classification {
        sentiment: Sentiment::Negative,
        confidence: 0.8,
        topic: "general".to_string(),
        embedding: None,
    };
    for i in 0..9 {
        let mention = MentionRepository::create(
            &pool,
            CreateMention::from_feed(
                format!("stale complaint {}", i),
                Utc::now() - Duration::minutes(30),
            ),
        )
        .await
        .unwrap();
        MentionRepository::apply_classification(&pool, mention.id, &negative)
            .await
            .unwrap();
    }

    let mention = MentionRepository::create(
        &pool,
        CreateMention::from_feed("Another awful broken day".to_string(), Utc::now()),
    )
    .await
    .unwrap();

    let outcome = pipeline.classify_mention(mention.id).await.unwrap();
    assert_eq!(outcome.sentiment, Sentiment::Negative);
    assert!(!outcome.alerted);
    assert_eq!(AlertRepository::count(&pool).await.unwrap(), 0);
}
