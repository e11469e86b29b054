use std::time::Duration;

use async_trait::async_trait;

/// Result of one job execution.
pub type JobResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// A periodic background task run by the scheduler.
#[async_trait]
pub trait SchedulerJob: Send + Sync {
    /// Job name used for logging.
    fn name(&self) -> &'static str;

    /// Interval between executions.
    fn interval(&self) -> Duration;

    /// Execute the job once.
    async fn execute(&self) -> JobResult;
}
