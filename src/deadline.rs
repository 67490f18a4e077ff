//! Deadline and cancellation threaded through every store call.

use crate::error::{Result, UnlockError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Per-invocation call context: an optional deadline plus a cancellation flag.
#[derive(Debug, Clone)]
pub struct CallContext {
    deadline: Option<(Instant, Duration)>,
    cancelled: Arc<AtomicBool>,
}

/// Cancels every `CallContext` it was obtained from.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

#[cfg(test)]
impl CancelHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

impl CallContext {
    /// A context that never expires.
    pub fn background() -> Self {
        Self {
            deadline: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some((Instant::now() + timeout, timeout)),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Build from a timeout in seconds, where `0` means no deadline.
    pub fn from_timeout_secs(secs: u64) -> Self {
        if secs == 0 {
            Self::background()
        } else {
            Self::with_timeout(Duration::from_secs(secs))
        }
    }

    #[cfg(test)]
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            cancelled: Arc::clone(&self.cancelled),
        }
    }

    /// Time left before the deadline, or `None` if there is no deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|(at, _)| at.saturating_duration_since(Instant::now()))
    }

    /// Fail if the context has been cancelled or its deadline has passed.
    pub fn check(&self) -> Result<()> {
        if self.cancelled.load(Ordering::SeqCst) {
            return Err(UnlockError::Cancelled);
        }
        if let Some((at, timeout)) = self.deadline
            && Instant::now() >= at
        {
            return Err(UnlockError::DeadlineExceeded(timeout));
        }
        Ok(())
    }

    /// Sleep for `delay`, clipped to the remaining time, then re-check.
    pub fn sleep(&self, delay: Duration) -> Result<()> {
        self.check()?;
        let delay = match self.remaining() {
            Some(left) => delay.min(left),
            None => delay,
        };
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        self.check()
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self::background()
    }
}
