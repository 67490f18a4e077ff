//! Per-resource write locks for the file-backed object store.
//!
//! A write lock serializes the short compare-and-swap inside a single
//! `patch` call. It is never held across a caller's fetch/patch window;
//! concurrent callers are reconciled through `resourceVersion` instead.
//!
//! # Lock Files
//!
//! Lock files are stored in `.tfunlock/locks/{namespace}_{name}.lock` and are
//! created with **create_new** semantics (exclusive create). Each contains
//! JSON metadata:
//! - `owner`: The owner of the lock (e.g., `user@HOST`)
//! - `pid`: The process ID (optional)
//! - `created_at`: RFC3339 timestamp
//! - `action`: The store operation being performed
//!
//! Locks are released by an RAII guard. A lock that outlives its holder (a
//! crashed process) becomes stale and must be cleared explicitly.

mod guard;
mod metadata;
mod operations;
mod types;

#[cfg(test)]
mod tests;

pub use guard::LockGuard;
pub use metadata::LockMetadata;
pub(crate) use metadata::get_owner_string;
pub use operations::{acquire_resource_lock, clear_lock, list_locks};
pub use types::LockInfo;
