use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// How often and how patiently a job is retried.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_tries: Option<u32>,
    wait_between: Duration,
}

impl RetryPolicy {
    /// Retry up to `max_tries` attempts. At least one attempt always runs.
    pub fn new(max_tries: u32, wait_between: Duration) -> Self {
        Self {
            max_tries: Some(max_tries.max(1)),
            wait_between,
        }
    }

    /// Retry until the task succeeds, waiting `wait_between` after every
    /// failure.
    pub fn unlimited(wait_between: Duration) -> Self {
        Self {
            max_tries: None,
            wait_between,
        }
    }

    pub fn max_tries(&self) -> Option<u32> {
        self.max_tries
    }

    pub fn wait_between(&self) -> Duration {
        self.wait_between
    }

    fn allows_another(&self, attempts_made: u32) -> bool {
        self.max_tries.map_or(true, |max| attempts_made < max)
    }
}

/// Terminal failure of a retried job.
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    /// The job failed on every allowed attempt; carries the last error.
    #[error("job gave up after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: E },

    /// The executor was shut down before the job could run another attempt.
    #[error("retry executor shut down")]
    Shutdown,
}

/// Generic bounded-retry runner for independent async jobs.
///
/// Jobs run on tokio tasks with no ordering or mutual exclusion between
/// them; a shared semaphore bounds how many attempts execute at once so a
/// wide fan-out cannot exhaust resources. Within one job, attempts are
/// strictly sequential, separated by a non-busy `tokio::time::sleep`.
#[derive(Clone)]
pub struct RetryExecutor {
    permits: Arc<Semaphore>,
}

impl RetryExecutor {
    pub fn new(max_concurrent_jobs: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent_jobs.max(1))),
        }
    }

    /// Drive one job to its terminal outcome.
    ///
    /// `task` is invoked with the 1-based attempt number and must resolve to
    /// a `Result`; `on_error` observes every failed attempt (for logging or
    /// telemetry) before any wait. On success the value is returned and no
    /// further attempt runs; once the policy is exhausted the last error is
    /// returned inside `RetryError::Exhausted`.
    ///
    /// The pool permit is held only while an attempt executes, so jobs
    /// sleeping between attempts do not occupy pool slots.
    pub async fn run<T, E, F, Fut, O>(
        &self,
        policy: RetryPolicy,
        mut task: F,
        mut on_error: O,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        O: FnMut(u32, &E),
    {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let outcome = {
                let _permit = match Arc::clone(&self.permits).acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return Err(RetryError::Shutdown),
                };
                task(attempt).await
            };

            match outcome {
                Ok(value) => return Ok(value),
                Err(err) => {
                    on_error(attempt, &err);
                    if policy.allows_another(attempt) {
                        tokio::time::sleep(policy.wait_between()).await;
                    } else {
                        return Err(RetryError::Exhausted {
                            attempts: attempt,
                            last_error: err,
                        });
                    }
                }
            }
        }
    }

    /// Schedule a job on its own tokio task without blocking the caller.
    pub fn spawn<T, E, F, Fut, O>(
        &self,
        policy: RetryPolicy,
        task: F,
        on_error: O,
    ) -> JoinHandle<Result<T, RetryError<E>>>
    where
        T: Send + 'static,
        E: Send + 'static,
        F: FnMut(u32) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        O: FnMut(u32, &E) + Send + 'static,
    {
        let executor = self.clone();
        tokio::spawn(async move { executor.run(policy, task, on_error).await })
    }

    /// Stop the pool: every job observes `RetryError::Shutdown` at its next
    /// attempt boundary.
    pub fn shutdown(&self) {
        self.permits.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let executor = RetryExecutor::new(4);
        let policy = RetryPolicy::new(3, Duration::from_millis(1));
        let errors = AtomicU32::new(0);

        let value = executor
            .run(
                policy,
                |attempt| async move { Ok::<_, String>(attempt) },
                |_, _: &String| {
                    errors.fetch_add(1, Ordering::SeqCst);
                },
            )
            .await
            .unwrap();

        assert_eq!(value, 1);
        assert_eq!(errors.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_exhaustion_carries_last_error() {
        let executor = RetryExecutor::new(4);
        let policy = RetryPolicy::new(2, Duration::from_millis(1));

        let err = executor
            .run(
                policy,
                |attempt| async move { Err::<(), String>(format!("boom {attempt}")) },
                |_, _| {},
            )
            .await
            .unwrap_err();

        match err {
            RetryError::Exhausted {
                attempts,
                last_error,
            } => {
                assert_eq!(attempts, 2);
                assert_eq!(last_error, "boom 2");
            }
            other => panic!("unexpected terminal state: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unlimited_policy_keeps_trying() {
        let executor = RetryExecutor::new(4);
        let policy = RetryPolicy::unlimited(Duration::from_millis(1));
        let attempts = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&attempts);

        let value = executor
            .run(
                policy,
                move |attempt| {
                    let seen = Arc::clone(&seen);
                    async move {
                        seen.store(attempt, Ordering::SeqCst);
                        if attempt < 5 {
                            Err("not yet")
                        } else {
                            Ok(attempt)
                        }
                    }
                },
                |_, _| {},
            )
            .await
            .unwrap();

        assert_eq!(value, 5);
        assert_eq!(attempts.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_shutdown_stops_pending_jobs() {
        let executor = RetryExecutor::new(1);
        executor.shutdown();

        let err = executor
            .run(
                RetryPolicy::new(3, Duration::from_millis(1)),
                |_| async { Ok::<(), String>(()) },
                |_, _| {},
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RetryError::Shutdown));
    }

    #[tokio::test]
    async fn test_spawn_does_not_block_caller() {
        let executor = RetryExecutor::new(4);
        let handle = executor.spawn(
            RetryPolicy::new(1, Duration::from_millis(1)),
            |_| async { Ok::<_, String>(42) },
            |_, _| {},
        );
        assert_eq!(handle.await.unwrap().unwrap(), 42);
    }
}
