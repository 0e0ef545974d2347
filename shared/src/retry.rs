//! Bounded retry with pluggable backoff
//!
//! ```text
//! attempt 1 ──fail──> sleep(backoff.delay(1)) ──> attempt 2 ──fail──> ...
//!                                                  attempt N ──fail──> Exhausted
//! ```
//!
//! No sleep follows the final attempt, so a policy of 5 attempts with a fixed
//! 5s delay gives up after 4 sleeps (~20s).
//!
//! # Example
//!
//! ```ignore
//! let policy = RetryPolicy::store_default();
//! let db = retry(&policy, "store connect", |attempt| async move {
//!     open_connection(attempt).await
//! })
//! .await?;
//! ```

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Attempts made by the store client before declaring it unreachable
pub const STORE_RETRY_ATTEMPTS: u32 = 5;
/// Fixed pause between store connection attempts
pub const STORE_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Delay schedule between attempts
#[derive(Debug, Clone, PartialEq)]
pub enum Backoff {
    /// Same delay after every failed attempt
    Fixed(Duration),
    /// `initial * multiplier^(attempt-1)`, capped at `max`
    Exponential {
        initial: Duration,
        max: Duration,
        multiplier: f64,
    },
}

impl Backoff {
    /// Delay to wait after the given failed attempt (1-based)
    pub fn delay(&self, attempt: u32) -> Duration {
        match self {
            Backoff::Fixed(delay) => *delay,
            Backoff::Exponential {
                initial,
                max,
                multiplier,
            } => {
                let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
                let secs = initial.as_secs_f64() * multiplier.powi(exponent);
                if !secs.is_finite() || secs >= max.as_secs_f64() {
                    *max
                } else {
                    Duration::from_secs_f64(secs.max(0.0))
                }
            }
        }
    }
}

/// Retry policy: how many attempts, and how long to wait between them
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first one (values below 1 behave as 1)
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    /// Fixed delay between a bounded number of attempts
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self::new(max_attempts, Backoff::Fixed(delay))
    }

    /// Store connection policy: 5 attempts, 5 seconds apart
    pub fn store_default() -> Self {
        Self::fixed(STORE_RETRY_ATTEMPTS, STORE_RETRY_DELAY)
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::store_default()
    }
}

/// Typed outcome of a retry run that never succeeded
#[derive(Debug, Error)]
pub enum RetryError<E> {
    #[error("gave up after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: E },
}

impl<E> RetryError<E> {
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. } => *attempts,
        }
    }

    pub fn into_last_error(self) -> E {
        match self {
            RetryError::Exhausted { last_error, .. } => last_error,
        }
    }
}

/// Run `op` until it succeeds or the policy's attempt budget is spent
///
/// `op` receives the 1-based attempt number.
pub async fn retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut op: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.attempts();
    let mut attempt = 1;

    loop {
        match op(attempt).await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(op = label, attempt, "Succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) if attempt >= max_attempts => {
                tracing::error!(
                    op = label,
                    attempts = attempt,
                    error = %e,
                    "Retry budget exhausted"
                );
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last_error: e,
                });
            }
            Err(e) => {
                let delay = policy.backoff.delay(attempt);
                tracing::warn!(
                    op = label,
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Attempt failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_store_default_policy() {
        let policy = RetryPolicy::store_default();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.backoff.delay(1), Duration::from_secs(5));
        assert_eq!(policy.backoff.delay(4), Duration::from_secs(5));
    }

    #[test]
    fn test_exponential_backoff_caps() {
        let backoff = Backoff::Exponential {
            initial: Duration::from_millis(100),
            max: Duration::from_secs(1),
            multiplier: 2.0,
        };
        assert_eq!(backoff.delay(1), Duration::from_millis(100));
        assert_eq!(backoff.delay(2), Duration::from_millis(200));
        assert_eq!(backoff.delay(4), Duration::from_millis(800));
        assert_eq!(backoff.delay(5), Duration::from_secs(1));
        assert_eq!(backoff.delay(500), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_exhausts_after_exact_attempt_count() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::fixed(5, Duration::ZERO);

        let counter = calls.clone();
        let result: Result<(), _> = retry(&policy, "always fails", move |_| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>("connection refused")
            }
        })
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.attempts(), 5);
        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert_eq!(err.into_last_error(), "connection refused");
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_default_sleeps_between_attempts_only() {
        let started = tokio::time::Instant::now();

        let err = retry(&RetryPolicy::store_default(), "store connect", |_| async {
            Err::<(), _>("connection refused")
        })
        .await
        .unwrap_err();

        assert_eq!(err.attempts(), 5);
        // 4 pauses of 5s, none after the last attempt
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(20), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(25), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_after_retry_waits_once_per_failure() {
        let started = tokio::time::Instant::now();

        let value = retry(&RetryPolicy::store_default(), "store connect", |attempt| async move {
            if attempt < 3 { Err("booting") } else { Ok(attempt) }
        })
        .await
        .unwrap();

        assert_eq!(value, 3);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(10), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(15), "{elapsed:?}");
    }

    #[tokio::test]
    async fn test_stops_on_first_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::fixed(5, Duration::ZERO);

        let counter = calls.clone();
        let value = retry(&policy, "third time lucky", move |attempt| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                if attempt < 3 { Err("not yet") } else { Ok(attempt) }
            }
        })
        .await
        .unwrap();

        assert_eq!(value, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_tries_once() {
        let policy = RetryPolicy::fixed(0, Duration::ZERO);
        let err = retry(&policy, "once", |_| async { Err::<(), _>("nope") })
            .await
            .unwrap_err();
        assert_eq!(err.attempts(), 1);
    }

    #[test]
    fn test_exhausted_message() {
        let err = RetryError::Exhausted {
            attempts: 5,
            last_error: "timeout",
        };
        assert_eq!(err.to_string(), "gave up after 5 attempts: timeout");
    }
}
