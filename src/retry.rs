// SPDX-License-Identifier: MIT

//! Bounded exponential-backoff retry for fallible async operations.
//!
//! Intentionally minimal: no jitter, no circuit breaker. Callers using this for
//! writes must ensure the underlying write is naturally idempotent (e.g. an
//! upsert keyed by document id), since a failure after a partial effect will be
//! re-attempted.

use crate::error::{AppError, Result};
use std::future::Future;
use std::time::Duration;

/// Default number of total attempts for write operations.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Base delay before the first retry; doubles on each subsequent retry.
const BASE_DELAY_MS: u64 = 1000;

/// Run `operation` up to `max_attempts` times.
///
/// There is no delay before the first attempt; retry `n` (1-based) is preceded
/// by a `2^(n-1) * 1000ms` sleep. Once the budget is exhausted the last error
/// is returned wrapped in [`AppError::OperationFailed`], with the underlying
/// failure preserved as its source.
pub async fn with_backoff<T, F, Fut>(mut operation: F, max_attempts: u32) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    debug_assert!(max_attempts >= 1, "at least one attempt is required");

    let mut attempt: u32 = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(cause) => {
                attempt += 1;
                if attempt >= max_attempts {
                    tracing::warn!(
                        attempts = attempt,
                        error = %cause,
                        "operation exhausted its retry budget"
                    );
                    return Err(AppError::OperationFailed {
                        attempts: attempt,
                        cause: Box::new(cause),
                    });
                }

                let delay = Duration::from_millis(BASE_DELAY_MS << (attempt - 1));
                tracing::debug!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %cause,
                    "operation failed, backing off before retry"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_two_failures_with_expected_delays() {
        let calls = AtomicU32::new(0);
        let started = tokio::time::Instant::now();

        let result = with_backoff(
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(AppError::Store("transient".to_string()))
                    } else {
                        Ok(42u32)
                    }
                }
            },
            3,
        )
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // Delays of 1s then 2s; paused clock auto-advances through the sleeps.
        assert_eq!(started.elapsed(), Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_attempts_and_propagates_last_error() {
        let calls = AtomicU32::new(0);

        let result: Result<()> = with_backoff(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(AppError::Store("still down".to_string())) }
            },
            3,
        )
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match result {
            Err(AppError::OperationFailed { attempts, cause }) => {
                assert_eq!(attempts, 3);
                assert!(matches!(*cause, AppError::Store(ref m) if m == "still down"));
            }
            other => panic!("expected OperationFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn first_success_needs_no_delay() {
        let result = with_backoff(|| async { Ok("immediate") }, 3).await;
        assert_eq!(result.unwrap(), "immediate");
    }

    #[tokio::test(start_paused = true)]
    async fn single_attempt_budget_never_sleeps() {
        let calls = AtomicU32::new(0);
        let started = tokio::time::Instant::now();

        let result: Result<()> = with_backoff(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(AppError::Store("down".to_string())) }
            },
            1,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
