//! # Retry Policy
//!
//! Exponential backoff for transient failures in scheduled jobs and
//! transports.
//!
//! [`RetryPolicy`] configures the backoff curve and [`execute_with_retry`]
//! drives an async operation through it. Errors signal through [`Retryable`]
//! whether another attempt is worthwhile; permanent failures short-circuit.
//!
//! # Example
//!
//! ```
//! use league_trades::application::services::retry::{
//!     RetryPolicy, Retryable, execute_with_retry,
//! };
//!
//! #[derive(Debug)]
//! struct Transient;
//!
//! impl Retryable for Transient {
//!     fn is_retryable(&self) -> bool {
//!         true
//!     }
//! }
//!
//! # async fn example() {
//! let policy = RetryPolicy::default();
//! let result: Result<&str, _> =
//!     execute_with_retry(&policy, || async { Ok::<_, Transient>("done") }).await;
//! # }
//! ```

use rand::Rng;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Trait for errors that can indicate whether they are retryable.
pub trait Retryable {
    /// Returns true if the error is transient and the operation should be
    /// retried.
    fn is_retryable(&self) -> bool;
}

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,
    /// Initial delay before the first retry, in milliseconds.
    pub initial_delay_ms: u64,
    /// Maximum delay cap, in milliseconds.
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff.
    pub backoff_multiplier: f64,
    /// Jitter factor (0.0-1.0) randomizing delays to avoid thundering herd.
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 100,
            max_delay_ms: 10_000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
        }
    }
}

impl RetryPolicy {
    /// Creates a new retry policy with custom parameters.
    #[must_use]
    pub fn new(
        max_retries: u32,
        initial_delay_ms: u64,
        max_delay_ms: u64,
        backoff_multiplier: f64,
        jitter_factor: f64,
    ) -> Self {
        Self {
            max_retries,
            initial_delay_ms,
            max_delay_ms,
            backoff_multiplier,
            jitter_factor: jitter_factor.clamp(0.0, 1.0),
        }
    }

    /// Creates a policy with no retries (fail fast).
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Calculates the backoff delay for a 0-indexed retry attempt, capped at
    /// `max_delay_ms`.
    #[must_use]
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let base = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(attempt as i32);
        Duration::from_millis(base.min(self.max_delay_ms as f64) as u64)
    }

    /// Calculates the delay with jitter applied as
    /// `delay * (1 - jitter_factor * random())`.
    #[must_use]
    pub fn calculate_delay_with_jitter(&self, attempt: u32) -> Duration {
        let base = self.calculate_delay(attempt);
        if self.jitter_factor <= 0.0 {
            return base;
        }
        let mut rng = rand::rng();
        let jitter: f64 = rng.random();
        let scaled = base.as_millis() as f64 * (1.0 - self.jitter_factor * jitter);
        Duration::from_millis(scaled.max(1.0) as u64)
    }

    /// Returns true if another retry is allowed after `attempts_made`.
    #[must_use]
    pub fn should_retry(&self, attempts_made: u32) -> bool {
        attempts_made < self.max_retries
    }
}

/// Error returned when retry execution fails.
#[derive(Debug)]
pub enum RetryError<E> {
    /// All retry attempts were exhausted.
    MaxRetriesExceeded {
        /// The last error encountered.
        last_error: E,
        /// Total number of attempts made.
        attempts: u32,
    },
    /// The error was marked as non-retryable.
    NonRetryable {
        /// The non-retryable error.
        error: E,
        /// Attempts made before the non-retryable error.
        attempts: u32,
    },
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxRetriesExceeded {
                last_error,
                attempts,
            } => write!(
                f,
                "max retries exceeded after {attempts} attempts: {last_error}"
            ),
            Self::NonRetryable { error, attempts } => {
                write!(f, "non-retryable error after {attempts} attempts: {error}")
            }
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for RetryError<E> {}

impl<E> RetryError<E> {
    /// Returns the underlying error.
    #[must_use]
    pub fn into_inner(self) -> E {
        match self {
            Self::MaxRetriesExceeded { last_error, .. } => last_error,
            Self::NonRetryable { error, .. } => error,
        }
    }

    /// Returns the number of attempts made.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        match self {
            Self::MaxRetriesExceeded { attempts, .. } | Self::NonRetryable { attempts, .. } => {
                *attempts
            }
        }
    }

    /// Returns true if all retries were exhausted.
    #[must_use]
    pub fn is_max_retries_exceeded(&self) -> bool {
        matches!(self, Self::MaxRetriesExceeded { .. })
    }
}

/// Result type for retry operations.
pub type RetryResult<T, E> = Result<T, RetryError<E>>;

/// Executes an async operation under the given retry policy.
///
/// # Errors
///
/// Returns `RetryError::MaxRetriesExceeded` when attempts run out and
/// `RetryError::NonRetryable` as soon as an error reports itself permanent.
pub async fn execute_with_retry<F, Fut, T, E>(
    policy: &RetryPolicy,
    mut operation: F,
) -> RetryResult<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable,
{
    let mut attempts = 0u32;

    loop {
        attempts = attempts.saturating_add(1);

        match operation().await {
            Ok(result) => return Ok(result),
            Err(error) => {
                if !error.is_retryable() {
                    return Err(RetryError::NonRetryable { error, attempts });
                }
                if !policy.should_retry(attempts) {
                    return Err(RetryError::MaxRetriesExceeded {
                        last_error: error,
                        attempts,
                    });
                }
                // attempts is 1-indexed, the delay curve is 0-indexed
                sleep(policy.calculate_delay_with_jitter(attempts.saturating_sub(1))).await;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug)]
    struct TestError {
        retryable: bool,
    }

    impl fmt::Display for TestError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "test error")
        }
    }

    impl Retryable for TestError {
        fn is_retryable(&self) -> bool {
            self.retryable
        }
    }

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_delay_ms: 1,
            max_delay_ms: 10,
            backoff_multiplier: 2.0,
            jitter_factor: 0.0,
        }
    }

    #[test]
    fn delay_curve_is_exponential_and_capped() {
        let policy = RetryPolicy::new(5, 100, 500, 2.0, 0.0);
        assert_eq!(policy.calculate_delay(0), Duration::from_millis(100));
        assert_eq!(policy.calculate_delay(1), Duration::from_millis(200));
        assert_eq!(policy.calculate_delay(2), Duration::from_millis(400));
        assert_eq!(policy.calculate_delay(3), Duration::from_millis(500));
    }

    #[test]
    fn jitter_never_exceeds_base_delay() {
        let policy = RetryPolicy::new(3, 1000, 10_000, 2.0, 0.5);
        for _ in 0..10 {
            let delay = policy.calculate_delay_with_jitter(0);
            assert!(delay <= Duration::from_millis(1000));
            assert!(delay >= Duration::from_millis(500));
        }
    }

    #[test]
    fn new_clamps_jitter_factor() {
        assert!((RetryPolicy::new(1, 1, 1, 1.0, 1.5).jitter_factor - 1.0).abs() < f64::EPSILON);
        assert!(RetryPolicy::new(1, 1, 1, 1.0, -0.5).jitter_factor.abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&attempts);

        let result: RetryResult<&str, TestError> = execute_with_retry(&fast_policy(5), || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < 3 {
                    Err(TestError { retryable: true })
                } else {
                    Ok("done")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausts_retries() {
        let result: RetryResult<(), TestError> =
            execute_with_retry(&fast_policy(2), || async {
                Err(TestError { retryable: true })
            })
            .await;

        let err = result.unwrap_err();
        assert!(err.is_max_retries_exceeded());
        // initial attempt + 2 retries
        assert_eq!(err.attempts(), 3);
    }

    #[tokio::test]
    async fn stops_on_non_retryable() {
        let result: RetryResult<(), TestError> =
            execute_with_retry(&fast_policy(5), || async {
                Err(TestError { retryable: false })
            })
            .await;

        let err = result.unwrap_err();
        assert!(!err.is_max_retries_exceeded());
        assert_eq!(err.attempts(), 1);
    }

    #[tokio::test]
    async fn no_retry_policy_fails_fast() {
        let result: RetryResult<(), TestError> =
            execute_with_retry(&RetryPolicy::no_retry(), || async {
                Err(TestError { retryable: true })
            })
            .await;

        assert_eq!(result.unwrap_err().attempts(), 1);
    }
}
