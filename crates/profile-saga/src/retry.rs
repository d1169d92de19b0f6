//! Bounded exponential backoff for saga steps.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

/// Retry policy applied uniformly to every I/O step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Multiplier applied to the delay after each failed attempt.
    pub backoff_coefficient: f64,
    /// Total attempts before the step is exhausted.
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(5),
            backoff_coefficient: 1.5,
            max_attempts: 10,
        }
    }
}

impl RetryPolicy {
    /// A policy with no delays, for tests.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            initial_delay: Duration::ZERO,
            backoff_coefficient: 1.0,
            max_attempts,
        }
    }

    /// Delay after the `attempt`-th failure (1-based).
    fn delay_after(&self, attempt: u32) -> Duration {
        let factor = self
            .backoff_coefficient
            .powi(attempt.saturating_sub(1) as i32);
        self.initial_delay.mul_f64(factor)
    }
}

/// Whether exhausting a step's retries fails the whole saga.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepCriticality {
    /// Exhaustion propagates; the host retries the whole saga.
    Required,
    /// Exhaustion is logged and the saga continues.
    BestEffort,
}

/// A step that ran out of attempts.
#[derive(Debug, Error)]
#[error("step '{step}' exhausted after {attempts} attempts: {last_error}")]
pub struct StepExhausted {
    pub step: &'static str,
    pub attempts: u32,
    pub last_error: String,
}

/// Run `op` until it succeeds or the policy's attempt cap is reached.
///
/// Sleeps with multiplicative backoff between attempts and logs each
/// failure at warn. `op` may observe side effects from earlier attempts,
/// so every retried step must be idempotent or safely re-issuable.
pub async fn retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    step: &'static str,
    mut op: F,
) -> Result<T, StepExhausted>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let mut last_error = String::new();
    for attempt in 1..=policy.max_attempts.max(1) {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                warn!(step, attempt, error = %err, "step attempt failed");
                last_error = err.to_string();
                if attempt < policy.max_attempts {
                    tokio::time::sleep(policy.delay_after(attempt)).await;
                }
            }
        }
    }
    Err(StepExhausted {
        step,
        attempts: policy.max_attempts.max(1),
        last_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_backoff_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_secs(5));
        assert_eq!(policy.delay_after(2), Duration::from_millis(7500));
        assert_eq!(policy.delay_after(3), Duration::from_millis(11250));
    }

    #[tokio::test]
    async fn test_first_success_needs_no_retry() {
        let attempts = AtomicU32::new(0);
        let result = retry(&RetryPolicy::immediate(5), "step", || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, &str>(42) }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failures() {
        let attempts = AtomicU32::new(0);
        let result = retry(&RetryPolicy::immediate(5), "step", || {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err("transient")
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_reports_attempts_and_last_error() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), _> = retry(&RetryPolicy::immediate(3), "doomed", || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err("still down") }
        })
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.step, "doomed");
        assert_eq!(err.attempts, 3);
        assert_eq!(err.last_error, "still down");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }
}
