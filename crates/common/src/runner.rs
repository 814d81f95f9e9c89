//! Bounded background job runner
//!
//! Background work for processing and training jobs runs on a shared pool
//! capped by a semaphore, so a burst of admin submissions cannot exhaust
//! the runtime. Each job gets a cancellation token, registered for as long
//! as the job runs; workers are expected to check the token between
//! stages, never mid-write.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::metrics;

/// Shared runner for background jobs
#[derive(Clone)]
pub struct JobRunner {
    semaphore: Arc<Semaphore>,
    tokens: Arc<Mutex<HashMap<Uuid, CancellationToken>>>,
}

impl JobRunner {
    /// Create a runner allowing at most `max_concurrent` jobs at once
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
            tokens: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Spawn a background job.
    ///
    /// Returns immediately; the job waits for a pool slot inside its own
    /// task. The closure receives the job's cancellation token and must
    /// mark the database record failed itself before returning an error,
    /// the runner only logs and counts.
    pub fn spawn<F, Fut>(&self, job_id: Uuid, job_type: &'static str, work: F)
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = crate::errors::Result<()>> + Send + 'static,
    {
        let token = CancellationToken::new();
        self.register(job_id, token.clone());
        metrics::record_job_submitted(job_type);

        let semaphore = Arc::clone(&self.semaphore);
        let tokens = Arc::clone(&self.tokens);

        tokio::spawn(async move {
            // Closed only on runtime teardown
            let Ok(_permit) = semaphore.acquire_owned().await else {
                tokens.lock().expect("token registry poisoned").remove(&job_id);
                return;
            };

            let running = {
                let registry = tokens.lock().expect("token registry poisoned");
                registry.len()
            };
            metrics::set_jobs_running(running);

            let started = Instant::now();
            let result = work(token).await;
            let elapsed = started.elapsed().as_secs_f64();

            match &result {
                Ok(()) => {
                    tracing::info!(job_id = %job_id, job_type, elapsed_secs = elapsed, "background job finished");
                }
                Err(error) => {
                    tracing::error!(job_id = %job_id, job_type, elapsed_secs = elapsed, %error, "background job failed");
                }
            }
            metrics::record_job_finished(job_type, elapsed, result.is_ok());

            let remaining = {
                let mut registry = tokens.lock().expect("token registry poisoned");
                registry.remove(&job_id);
                registry.len()
            };
            metrics::set_jobs_running(remaining);
        });
    }

    /// Cancel a running job's token.
    ///
    /// Returns whether a live token was found. The caller still owns the
    /// database-side status flip; this only wakes the worker.
    pub fn cancel(&self, job_id: Uuid) -> bool {
        let registry = self.tokens.lock().expect("token registry poisoned");
        match registry.get(&job_id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Number of jobs currently registered (queued or running)
    pub fn active_jobs(&self) -> usize {
        self.tokens.lock().expect("token registry poisoned").len()
    }

    fn register(&self, job_id: Uuid, token: CancellationToken) {
        self.tokens
            .lock()
            .expect("token registry poisoned")
            .insert(job_id, token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_spawn_runs_job() {
        let runner = JobRunner::new(4);
        let counter = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&counter);

        runner.spawn(Uuid::new_v4(), "test", move |_token| async move {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(runner.active_jobs(), 0);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let runner = JobRunner::new(1);
        let peak = Arc::new(AtomicUsize::new(0));
        let current = Arc::new(AtomicUsize::new(0));

        for _ in 0..4 {
            let peak = Arc::clone(&peak);
            let current = Arc::clone(&current);
            runner.spawn(Uuid::new_v4(), "test", move |_token| async move {
                let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                current.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            });
        }

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancel_wakes_worker() {
        let runner = JobRunner::new(2);
        let job_id = Uuid::new_v4();
        let cancelled = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&cancelled);

        runner.spawn(job_id, "test", move |token| async move {
            tokio::select! {
                _ = token.cancelled() => {
                    seen.fetch_add(1, Ordering::SeqCst);
                }
                _ = tokio::time::sleep(Duration::from_secs(30)) => {}
            }
            Ok(())
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(runner.cancel(job_id));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(cancelled.load(Ordering::SeqCst), 1);
        // Token is gone once the job exits
        assert!(!runner.cancel(job_id));
    }
}
