//! Bounded retry with a fixed delay.
//!
//! Used to wait for eventually consistent stores to expose a fresh upload, but
//! nothing here is storage specific.

use std::future::Future;
use std::time::Duration;

const DEFAULT_MAX_RETRIES: u32 = 5;
const DEFAULT_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Pause between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            delay: DEFAULT_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryOutcome<T> {
    /// `predicate` accepted `value` on attempt `attempts`
    Satisfied { value: T, attempts: u32 },
    /// Every attempt was rejected; `last` is the final value seen
    Exhausted { last: T, attempts: u32 },
}

impl<T> RetryOutcome<T> {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, RetryOutcome::Satisfied { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            RetryOutcome::Satisfied { attempts, .. } | RetryOutcome::Exhausted { attempts, .. } => {
                *attempts
            }
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            RetryOutcome::Satisfied { value, .. } => value,
            RetryOutcome::Exhausted { last, .. } => last,
        }
    }
}

/// Run `op` until `predicate` accepts its output, at most
/// `policy.max_attempts()` times, sleeping `policy.delay` in between.
///
/// `op` receives the 1-based attempt number.
pub async fn retry_until<T, F, Fut, P>(policy: &RetryPolicy, mut op: F, mut predicate: P) -> RetryOutcome<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = T>,
    P: FnMut(&T) -> bool,
{
    let max_attempts = policy.max_attempts();
    let mut attempt = 1;

    loop {
        let value = op(attempt).await;
        if predicate(&value) {
            return RetryOutcome::Satisfied {
                value,
                attempts: attempt,
            };
        }
        if attempt >= max_attempts {
            return RetryOutcome::Exhausted {
                last: value,
                attempts: attempt,
            };
        }

        tracing::trace!(attempt = attempt, delay_ms = policy.delay.as_millis() as u64, "Retrying");
        tokio::time::sleep(policy.delay).await;
        attempt += 1;
    }
}
