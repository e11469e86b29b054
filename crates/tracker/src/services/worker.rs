use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

use super::dispatch::{DispatchError, Dispatcher, Job};
use super::pipeline::Pipeline;

/// Bounded queue between the task runner and the workers.
const QUEUE_CAPACITY: usize = 256;

/// In-process background worker pool.
///
/// Jobs are queued over a bounded channel and drained by a fixed set of
/// workers, so classification jobs from one fetch may run concurrently and
/// complete in any order.
pub struct WorkerPool {
    sender: mpsc::Sender<Job>,
    receiver: Mutex<Option<mpsc::Receiver<Job>>>,
}

impl WorkerPool {
    pub fn new() -> Arc<Self> {
        let (sender, receiver) = mpsc::channel(QUEUE_CAPACITY);
        Arc::new(Self {
            sender,
            receiver: Mutex::new(Some(receiver)),
        })
    }

    /// Spawn `workers` tasks draining the queue against the pipeline.
    pub async fn start(&self, pipeline: Arc<Pipeline>, workers: usize) {
        let Some(receiver) = self.receiver.lock().await.take() else {
            tracing::warn!("Worker pool already started");
            return;
        };

        let receiver = Arc::new(Mutex::new(receiver));
        for worker_id in 0..workers.max(1) {
            let receiver = Arc::clone(&receiver);
            let pipeline = Arc::clone(&pipeline);
            tokio::spawn(async move {
                tracing::debug!("Worker {} started", worker_id);
                loop {
                    let job = receiver.lock().await.recv().await;
                    match job {
                        Some(job) => {
                            if let Err(e) = pipeline.execute(job).await {
                                tracing::error!("Worker {}: job failed: {}", worker_id, e);
                            }
                        }
                        None => {
                            tracing::debug!("Worker {} stopped", worker_id);
                            break;
                        }
                    }
                }
            });
        }
    }
}

#[async_trait]
impl Dispatcher for WorkerPool {
    async fn probe(&self) -> bool {
        !self.sender.is_closed()
    }

    async fn submit(&self, job: Job) -> Result<(), DispatchError> {
        self.sender.try_send(job).map_err(|e| match e {
            mpsc::error::TrySendError::Full(job) => DispatchError::Full(job),
            mpsc::error::TrySendError::Closed(job) => DispatchError::Closed(job),
        })
    }
}
