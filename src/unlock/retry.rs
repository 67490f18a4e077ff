//! Bounded retry-on-conflict with exponential backoff.

use crate::deadline::CallContext;
use crate::error::{Result, UnlockError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Backoff between conflict retries.
///
/// `steps` counts total attempts. The delay before attempt `n` (n >= 2) is
/// `initial_delay_ms * factor^(n-2)`, capped at `max_delay_ms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub steps: u32,
    pub initial_delay_ms: u64,
    pub factor: f64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            steps: 4,
            initial_delay_ms: 10,
            factor: 5.0,
            max_delay_ms: 5000,
        }
    }
}

impl RetryPolicy {
    /// Delay to wait before the given 1-based attempt.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(attempt - 2).unwrap_or(i32::MAX);
        let millis = (self.initial_delay_ms as f64 * self.factor.powi(exponent))
            .min(self.max_delay_ms as f64);
        Duration::from_millis(millis as u64)
    }
}

/// A successful result and the attempt that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Retried<T> {
    pub value: T,
    pub attempts: u32,
}

/// Run `op` until it succeeds, fails with a non-conflict error, or the
/// policy's attempts are used up.
///
/// `op` receives the 1-based attempt number. Conflicts are absorbed; any
/// other error is returned unchanged. Exhaustion yields `RetriesExhausted`
/// carrying the last conflict message. Backoff sleeps honor `cx`.
pub fn retry_on_conflict<T, F>(policy: &RetryPolicy, cx: &CallContext, mut op: F) -> Result<Retried<T>>
where
    F: FnMut(u32) -> Result<T>,
{
    let steps = policy.steps.max(1);
    let mut last_conflict = String::new();

    for attempt in 1..=steps {
        if attempt > 1 {
            cx.sleep(policy.delay_before(attempt))?;
        }

        match op(attempt) {
            Ok(value) => return Ok(Retried { value, attempts: attempt }),
            Err(UnlockError::Conflict(message)) => last_conflict = message,
            Err(e) => return Err(e),
        }
    }

    Err(UnlockError::RetriesExhausted {
        attempts: steps,
        last: last_conflict,
    })
}
