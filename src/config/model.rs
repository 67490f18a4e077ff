//! Config struct definition and default implementation.

use super::types::*;
use crate::unlock::RetryPolicy;
use serde::{Deserialize, Serialize};

/// Configuration for a tfunlock store.
///
/// This struct represents the contents of `.tfunlock/config.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Namespace used when `--namespace` is not given.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Minutes after which a store write lock is considered stale.
    #[serde(default = "default_lock_stale_minutes")]
    pub lock_stale_minutes: u32,

    /// Deadline for one invocation in seconds (0 disables).
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Backoff between conflict retries.
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            lock_stale_minutes: default_lock_stale_minutes(),
            timeout_seconds: default_timeout_seconds(),
            retry: RetryPolicy::default(),
        }
    }
}
