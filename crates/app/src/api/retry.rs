//! Bounded retry for idempotent reads.
//!
//! Only GETs go through here. Sign, enable and disable requests are sent
//! exactly once.

use std::{future::Future, time::Duration};

use tracing::warn;

use crate::api::ApiError;

/// Attempts and backoff for idempotent reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// At least one attempt is always made.
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Single attempt, no retry.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before attempt `attempt + 1`, doubling each time.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2_u32.saturating_pow(attempt.saturating_sub(1)))
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error,
    /// or runs out of attempts.
    ///
    /// # Errors
    ///
    /// Returns the last error from `operation`.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut attempt_fn: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut attempt = 1;

        loop {
            match attempt_fn().await {
                Ok(value) => return Ok(value),
                Err(error) if error.is_retryable() && attempt < self.max_attempts => {
                    let delay = self.delay_after(attempt);

                    warn!(
                        operation,
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "retrying after error: {error}"
                    );

                    tokio::time::sleep(delay).await;

                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(200))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use reqwest::StatusCode;

    use super::*;

    fn fast(attempts: u32) -> RetryPolicy {
        RetryPolicy::new(attempts, Duration::ZERO)
    }

    #[test]
    fn delay_doubles_per_attempt() {
        let policy = RetryPolicy::new(4, Duration::from_millis(100));

        assert_eq!(policy.delay_after(1), Duration::from_millis(100));
        assert_eq!(policy.delay_after(2), Duration::from_millis(200));
        assert_eq!(policy.delay_after(3), Duration::from_millis(400));
    }

    #[test]
    fn zero_attempts_means_one() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts(), 1);
    }

    #[tokio::test]
    async fn retries_timeouts_until_success() {
        let counter = AtomicU32::new(0);
        let calls = &counter;

        let result = fast(3)
            .run("test", move || async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(ApiError::Timeout)
                } else {
                    Ok("done")
                }
            })
            .await;

        assert!(matches!(result, Ok("done")));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let counter = AtomicU32::new(0);
        let calls = &counter;

        let result: Result<(), ApiError> = fast(2)
            .run("test", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);

                Err(ApiError::Server {
                    status: StatusCode::SERVICE_UNAVAILABLE,
                    message: None,
                })
            })
            .await;

        assert!(matches!(result, Err(ApiError::Server { .. })));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn does_not_retry_not_found() {
        let counter = AtomicU32::new(0);
        let calls = &counter;

        let result: Result<(), ApiError> = fast(5)
            .run("test", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);

                Err(ApiError::NotFound)
            })
            .await;

        assert!(matches!(result, Err(ApiError::NotFound)));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
