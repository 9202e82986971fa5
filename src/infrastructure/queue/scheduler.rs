//! # Scheduled Job Runner
//!
//! Fixed-interval job execution with stall detection.
//!
//! Jobs run on a repeat interval. Each run is wrapped in
//! `tokio::time::timeout`: a run that exceeds the stall budget marks the job
//! stalled, logs it for operators, and stops scheduling further runs rather
//! than piling retries on top of a wedged task. Transient per-run failures
//! go through the exponential-backoff [`RetryPolicy`] first.
//!
//! Used for recurring league-data sync, not for notification delivery;
//! notifications flow through the queue workers.

use crate::application::services::retry::{RetryPolicy, Retryable, execute_with_retry};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// A transient or permanent job failure.
#[derive(Debug, Clone)]
pub struct JobError {
    message: String,
    transient: bool,
}

impl JobError {
    /// A failure worth retrying within the same run.
    #[must_use]
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            transient: true,
        }
    }

    /// A failure that retrying will not fix.
    #[must_use]
    pub fn permanent(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            transient: false,
        }
    }
}

impl fmt::Display for JobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Retryable for JobError {
    fn is_retryable(&self) -> bool {
        self.transient
    }
}

/// A job the scheduler runs on a repeat interval.
#[async_trait]
pub trait ScheduledJob: Send + Sync + fmt::Debug {
    /// Stable job name for logs.
    fn name(&self) -> &str;

    /// Performs one run.
    ///
    /// # Errors
    ///
    /// Returns a [`JobError`]; transient errors are retried within the run.
    async fn run(&self) -> Result<(), JobError>;
}

/// Fixed-interval scheduler with per-run stall detection.
#[derive(Debug, Clone)]
pub struct JobScheduler {
    run_interval: Duration,
    stall_timeout: Duration,
    retry_policy: RetryPolicy,
}

impl JobScheduler {
    /// Creates a scheduler.
    #[must_use]
    pub fn new(run_interval: Duration, stall_timeout: Duration, retry_policy: RetryPolicy) -> Self {
        Self {
            run_interval,
            stall_timeout,
            retry_policy,
        }
    }

    /// Spawns the scheduling loop for one job.
    ///
    /// The loop stops when the token is cancelled, or permanently once the
    /// job stalls.
    pub fn spawn(
        &self,
        job: Arc<dyn ScheduledJob>,
        shutdown: CancellationToken,
    ) -> tokio::task::JoinHandle<()> {
        let run_interval = self.run_interval;
        let stall_timeout = self.stall_timeout;
        let policy = self.retry_policy.clone();

        tokio::spawn(async move {
            let mut ticker = interval(run_interval);
            // The first tick fires immediately; skip it so the job starts
            // one interval after spawn.
            ticker.tick().await;

            info!(job = job.name(), interval_ms = run_interval.as_millis() as u64, "job scheduled");
            loop {
                tokio::select! {
                    () = shutdown.cancelled() => {
                        info!(job = job.name(), "job scheduler stopped");
                        return;
                    }
                    _ = ticker.tick() => {}
                }

                let attempt = execute_with_retry(&policy, || job.run());
                match timeout(stall_timeout, attempt).await {
                    Ok(Ok(())) => {
                        debug!(job = job.name(), "job run completed");
                    }
                    Ok(Err(e)) => {
                        error!(job = job.name(), error = %e.into_inner(), "job run failed");
                    }
                    Err(_) => {
                        // Stalled: the run is abandoned and the job marked;
                        // an operator restarts it, the scheduler does not.
                        error!(
                            job = job.name(),
                            stall_timeout_ms = stall_timeout.as_millis() as u64,
                            "job stalled; marking and suspending further runs"
                        );
                        return;
                    }
                }
            }
        })
    }
}

impl Default for JobScheduler {
    fn default() -> Self {
        Self {
            run_interval: Duration::from_secs(300),
            stall_timeout: Duration::from_secs(60),
            retry_policy: RetryPolicy::default(),
        }
    }
}
