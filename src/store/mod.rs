//! Object store boundary.
//!
//! The store owns the authoritative copy of every resource. Callers read a
//! snapshot with `get`, derive a `MergePatch` from (snapshot, working copy)
//! and submit it with `patch`. A patch carries the snapshot's
//! `resourceVersion`; if the stored object has moved on, `patch` fails with
//! `UnlockError::Conflict` and the caller re-reads.

mod file;
mod patch;

pub use file::FileStore;
pub use patch::{MergePatch, apply_merge_patch};

use crate::deadline::CallContext;
use crate::error::Result;
use crate::resource::{Resource, ResourceHandle};

/// A store of resources with optimistic-concurrency writes.
pub trait ObjectStore {
    /// Fetch the current object.
    ///
    /// Fails with `NotFound` if the object does not exist.
    fn get(&self, handle: &ResourceHandle, cx: &CallContext) -> Result<Resource>;

    /// Apply a merge patch.
    ///
    /// Fails with `Conflict` if the object's version no longer matches the
    /// version the patch was derived from.
    fn patch(&self, handle: &ResourceHandle, patch: &MergePatch, cx: &CallContext) -> Result<()>;
}
