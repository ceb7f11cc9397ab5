//! Bounded-retry execution policy.
//!
//! A policy object decoupled from any handler: `run` wraps any async
//! fallible operation, doubling the sleep between attempts and giving up
//! after a fixed count. Poison inputs therefore cost a bounded amount of
//! wall clock, never an unbounded loop.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

/// Terminal failure after every attempt was spent.
#[derive(Debug, Error)]
pub enum RetryError<E: Display> {
    /// All attempts failed; carries the last error observed.
    #[error("All {attempts} attempts failed: {last}")]
    Exhausted {
        /// Number of attempts made.
        attempts: u32,
        /// Error from the final attempt.
        last: E,
    },
}

/// Fixed-count, doubling-backoff retry policy.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Sleep before the second attempt; doubles each retry after that.
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    /// Five attempts with 2s/4s/8s/16s backoff between them.
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Run an operation until it succeeds or attempts are exhausted.
    ///
    /// # Errors
    ///
    /// `RetryError::Exhausted` with the last attempt's error.
    pub async fn run<T, E, F, Fut>(&self, mut operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        // A zero-attempt policy still runs the operation once.
        let max_attempts = self.max_attempts.max(1);
        let mut backoff = self.initial_backoff;

        for attempt in 1..=max_attempts {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < max_attempts => {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        backoff_secs = backoff.as_secs(),
                        error = %e,
                        "Attempt failed, backing off"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
                Err(last) => {
                    return Err(RetryError::Exhausted {
                        attempts: max_attempts,
                        last,
                    });
                }
            }
        }
        unreachable!("loop returns on the final attempt")
    }
}
