mod feed_refresh_job;
mod traits;

pub use feed_refresh_job::FeedRefreshJob;
pub use traits::{JobResult, SchedulerJob};

use std::sync::Arc;

/// Runs registered jobs at their own intervals, each in its own tokio task.
pub struct SchedulerService {
    jobs: Vec<Arc<dyn SchedulerJob>>,
}

impl SchedulerService {
    pub fn new() -> Self {
        Self { jobs: Vec::new() }
    }

    /// Adds a job. Jobs are not started until [`start`](Self::start) is
    /// called.
    pub fn with_job<J: SchedulerJob + 'static>(mut self, job: J) -> Self {
        self.jobs.push(Arc::new(job));
        self
    }

    /// Starts all registered jobs and returns immediately.
    pub fn start(&self) {
        for job in &self.jobs {
            let job = Arc::clone(job);
            tokio::spawn(async move {
                Self::run_job_loop(job).await;
            });
        }
    }

    async fn run_job_loop(job: Arc<dyn SchedulerJob>) {
        let name = job.name();

        let mut timer = tokio::time::interval(job.interval());
        timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            timer.tick().await;

            match job.execute().await {
                Ok(()) => {
                    tracing::debug!("Job '{}' completed successfully", name);
                }
                Err(e) => {
                    tracing::error!("Job '{}' failed: {}", name, e);
                }
            }
        }
    }
}

impl Default for SchedulerService {
    fn default() -> Self {
        Self::new()
    }
}
