//! Bounded retry with uniformly jittered waits
//!
//! The policy knows nothing about HTTP or files: it repeatedly runs an async
//! operation until it succeeds or the attempt budget is spent, sleeping a
//! random duration drawn uniformly from `[min_delay, max_delay]` between
//! attempts.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::retry;

/// Outcome of a policy whose every attempt failed
#[derive(Debug)]
pub struct Exhausted<E> {
    /// Number of attempts made
    pub attempts: u32,
    /// Error returned by the last attempt
    pub last_error: E,
}

/// Retry policy for a single fallible operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, the first one included
    pub max_attempts: u32,
    /// Shortest wait between attempts
    #[serde(with = "humantime_serde")]
    pub min_delay: Duration,
    /// Longest wait between attempts
    #[serde(with = "humantime_serde")]
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: retry::MAX_ATTEMPTS,
            min_delay: retry::MIN_DELAY,
            max_delay: retry::MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with explicit bounds
    pub fn new(max_attempts: u32, min_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            min_delay,
            max_delay,
        }
    }

    /// A policy that retries immediately, used where waiting adds nothing
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO, Duration::ZERO)
    }

    /// Draw the wait before the next attempt
    pub fn next_delay(&self) -> Duration {
        let min = self.min_delay.as_millis() as u64;
        let max = (self.max_delay.as_millis() as u64).max(min);
        Duration::from_millis(fastrand::u64(min..=max))
    }

    /// Run `operation` until it succeeds or `max_attempts` attempts failed
    ///
    /// The closure receives the 1-based attempt number. At least one attempt
    /// is always made, even when `max_attempts` is zero.
    ///
    /// # Errors
    ///
    /// Returns [`Exhausted`] holding the last attempt's error once the budget
    /// is spent.
    pub async fn run<T, E, F, Fut>(&self, mut operation: F) -> Result<T, Exhausted<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation(attempt).await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!("Succeeded on attempt {}/{}", attempt, max_attempts);
                    }
                    return Ok(value);
                }
                Err(e) if attempt < max_attempts => {
                    let delay = self.next_delay();
                    warn!(
                        "Attempt {}/{} failed: {}. Retrying in {}ms",
                        attempt,
                        max_attempts,
                        e,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    return Err(Exhausted {
                        attempts: attempt,
                        last_error: e,
                    });
                }
            }
        }
    }
}
