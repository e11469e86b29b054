mod anomaly;
mod broadcast;
mod dispatch;
mod pipeline;
mod scheduler;
mod worker;

pub use anomaly::AnomalyService;
pub use broadcast::AlertBroadcaster;
pub use dispatch::{Dispatch, DispatchError, Dispatcher, Job, TaskRunner};
pub use pipeline::{ClassifyOutcome, FetchSummary, FetchTrigger, Pipeline};
pub use scheduler::{FeedRefreshJob, JobResult, SchedulerJob, SchedulerService};
pub use worker::WorkerPool;
