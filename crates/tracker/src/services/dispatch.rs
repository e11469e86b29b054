use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::OnceCell;

/// A unit of work the pipeline can run inline or hand to a worker.
#[derive(Debug, Clone)]
pub enum Job {
    FetchFeed { url: String },
    Classify { mention_id: i64 },
}

#[derive(Debug, Error)]
pub enum DispatchError {
    /// Queue is full; the job is handed back for inline execution.
    #[error("dispatch queue full")]
    Full(Job),

    /// The worker side is gone.
    #[error("dispatch queue closed")]
    Closed(Job),
}

impl DispatchError {
    /// Recover the job that could not be queued.
    pub fn into_job(self) -> Job {
        match self {
            DispatchError::Full(job) | DispatchError::Closed(job) => job,
        }
    }
}

/// Background-dispatch seam.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Connectivity check. Called at most twice per process; the result is
    /// cached by the task runner.
    async fn probe(&self) -> bool;

    /// Queue a job for background execution.
    async fn submit(&self, job: Job) -> Result<(), DispatchError>;
}

/// How a job ended up being executed.
#[derive(Debug)]
pub enum Dispatch {
    /// Queued to a background worker; the caller does not wait for it.
    Queued,
    /// No background capacity; the caller must run the job itself.
    Inline(Job),
}

/// Timeout for a single availability probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Decides between background dispatch and inline execution.
///
/// Availability is probed once per process lifetime and cached. A submit
/// failure after a positive probe hands the job back for inline execution
/// instead of failing the request, so the pipeline makes forward progress
/// with no background infrastructure at all.
pub struct TaskRunner {
    dispatcher: Option<Arc<dyn Dispatcher>>,
    available: OnceCell<bool>,
}

impl TaskRunner {
    pub fn new(dispatcher: Option<Arc<dyn Dispatcher>>) -> Self {
        Self {
            dispatcher,
            available: OnceCell::new(),
        }
    }

    /// Runner with no background system at all; everything runs inline.
    pub fn inline_only() -> Self {
        Self::new(None)
    }

    pub async fn dispatch(&self, job: Job) -> Dispatch {
        let Some(dispatcher) = &self.dispatcher else {
            return Dispatch::Inline(job);
        };

        if !self.is_available(dispatcher.as_ref()).await {
            return Dispatch::Inline(job);
        }

        match dispatcher.submit(job).await {
            Ok(()) => Dispatch::Queued,
            Err(e) => {
                tracing::warn!("Dispatch failed, running job inline: {}", e);
                Dispatch::Inline(e.into_job())
            }
        }
    }

    /// Probe with a short timeout and a single retry, then reuse the cached
    /// answer for the rest of the process lifetime.
    async fn is_available(&self, dispatcher: &dyn Dispatcher) -> bool {
        *self
            .available
            .get_or_init(|| async {
                match tokio::time::timeout(PROBE_TIMEOUT, dispatcher.probe()).await {
                    Ok(true) => true,
                    _ => matches!(
                        tokio::time::timeout(PROBE_TIMEOUT, dispatcher.probe()).await,
                        Ok(true)
                    ),
                }
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingDispatcher {
        probes: AtomicUsize,
        up: bool,
    }

    #[async_trait]
    impl Dispatcher for CountingDispatcher {
        async fn probe(&self) -> bool {
            self.probes.fetch_add(1, Ordering::SeqCst);
            self.up
        }

        async fn submit(&self, _job: Job) -> Result<(), DispatchError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn availability_is_probed_once_and_cached() {
        let dispatcher = Arc::new(CountingDispatcher {
            probes: AtomicUsize::new(0),
            up: true,
        });
        let runner = TaskRunner::new(Some(dispatcher.clone() as Arc<dyn Dispatcher>));

        for i in 0..3 {
            let decision = runner.dispatch(Job::Classify { mention_id: i }).await;
            assert!(matches!(decision, Dispatch::Queued));
        }

        assert_eq!(dispatcher.probes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unavailable_dispatcher_gets_one_retry_then_inline() {
        let dispatcher = Arc::new(CountingDispatcher {
            probes: AtomicUsize::new(0),
            up: false,
        });
        let runner = TaskRunner::new(Some(dispatcher.clone() as Arc<dyn Dispatcher>));

        let decision = runner.dispatch(Job::Classify { mention_id: 1 }).await;
        assert!(matches!(decision, Dispatch::Inline(_)));
        assert_eq!(dispatcher.probes.load(Ordering::SeqCst), 2);

        // Cached: no further probes.
        let _ = runner.dispatch(Job::Classify { mention_id: 2 }).await;
        assert_eq!(dispatcher.probes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn no_dispatcher_means_inline() {
        let runner = TaskRunner::inline_only();
        let decision = runner
            .dispatch(Job::FetchFeed {
                url: "http://example.com/rss".to_string(),
            })
            .await;
        assert!(matches!(decision, Dispatch::Inline(Job::FetchFeed { .. })));
    }
}
