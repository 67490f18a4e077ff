//! Lock information structures.

use super::metadata::LockMetadata;
use crate::resource::ResourceHandle;
use std::path::PathBuf;

/// Information about an active store write lock.
#[derive(Debug, Clone)]
pub struct LockInfo {
    /// The lock file path.
    pub path: PathBuf,

    /// The resource the lock protects.
    pub resource: ResourceHandle,

    /// The lock metadata.
    pub metadata: LockMetadata,

    /// Whether the lock is older than the stale threshold.
    pub is_stale: bool,
}

impl std::fmt::Display for LockInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (owner: {}, age: {}, action: {}{})",
            self.resource,
            self.metadata.owner,
            self.metadata.age_string(),
            self.metadata.action,
            if self.is_stale { ", STALE" } else { "" }
        )
    }
}
