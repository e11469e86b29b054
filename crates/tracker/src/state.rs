use std::sync::Arc;

use classify::{build_classifier, ClassifierConfig};
use feed::FeedClient;
use relay::{BroadcastHub, Publisher};
use sqlx::SqlitePool;

use crate::config::Config;
use crate::services::{
    AlertBroadcaster, AnomalyService, Dispatcher, FeedRefreshJob, Pipeline, SchedulerService,
    TaskRunner, WorkerPool,
};

/// Shared application state wiring the pipeline together.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<Config>,
    /// Live subscribers join alert groups through this hub.
    pub hub: Arc<BroadcastHub>,
    pub pipeline: Arc<Pipeline>,
    pub scheduler: Arc<SchedulerService>,
}

impl AppState {
    pub async fn new(db: SqlitePool, config: Config) -> Self {
        let http_client = reqwest::Client::new();

        let feed = Arc::new(FeedClient::with_client(http_client.clone()));

        let classifier = build_classifier(
            &ClassifierConfig {
                inference_url: config.inference_url.clone(),
                ..ClassifierConfig::default()
            },
            http_client,
        );

        let hub = Arc::new(BroadcastHub::new());
        let broadcaster = Arc::new(AlertBroadcaster::new(Some(
            Arc::clone(&hub) as Arc<dyn Publisher>
        )));

        let anomaly = AnomalyService::new(db.clone(), broadcaster);

        // Background dispatch: in-process worker pool, probed once by the
        // task runner and falling back to inline execution on rejection.
        let workers = WorkerPool::new();
        let runner = TaskRunner::new(Some(Arc::clone(&workers) as Arc<dyn Dispatcher>));

        let pipeline = Arc::new(Pipeline::new(
            db.clone(),
            feed,
            classifier,
            anomaly,
            runner,
        ));
        workers.start(Arc::clone(&pipeline), config.workers).await;

        let scheduler = SchedulerService::new().with_job(FeedRefreshJob::new(
            Arc::clone(&pipeline),
            config.feed_urls.clone(),
            config.fetch_interval,
        ));
        scheduler.start();

        Self {
            db,
            config: Arc::new(config),
            hub,
            pipeline,
            scheduler: Arc::new(scheduler),
        }
    }
}
