//! The read-modify-write transition loop.

use super::intent::{encode_unlock_intent, stamp_reconcile_request};
use super::retry::{RetryPolicy, retry_on_conflict};
use crate::clock::Clock;
use crate::deadline::CallContext;
use crate::error::Result;
use crate::resource::{Resource, ResourceHandle};
use crate::store::{MergePatch, ObjectStore};
use chrono::{DateTime, Utc};
use std::io::Write;

/// Result of a transition that landed.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionOutcome {
    pub resource: ResourceHandle,
    /// Fetch/patch cycles used, including the successful one.
    pub attempts: u32,
    /// The reconcile trigger written by the successful patch.
    pub requested_at: String,
}

/// Drives fetch -> encode -> patch cycles against a store.
pub struct TransitionRequester<'a, S: ObjectStore + ?Sized, C: Clock + ?Sized> {
    store: &'a S,
    clock: &'a C,
    policy: &'a RetryPolicy,
}

impl<'a, S: ObjectStore + ?Sized, C: Clock + ?Sized> TransitionRequester<'a, S, C> {
    pub fn new(store: &'a S, clock: &'a C, policy: &'a RetryPolicy) -> Self {
        Self {
            store,
            clock,
            policy,
        }
    }

    /// Record a one-shot unlock of `lock_id` and request reconciliation.
    pub fn request_unlock(
        &self,
        handle: &ResourceHandle,
        lock_id: &str,
        cx: &CallContext,
        progress: &mut dyn Write,
    ) -> Result<TransitionOutcome> {
        self.transition(handle, cx, |resource, now| {
            encode_unlock_intent(resource, lock_id, now, progress)
        })
    }

    /// Request reconciliation without touching the lock state.
    pub fn request_reconcile(
        &self,
        handle: &ResourceHandle,
        cx: &CallContext,
    ) -> Result<TransitionOutcome> {
        self.transition(handle, cx, |resource, now| {
            stamp_reconcile_request(&mut resource.metadata.annotations, now)
        })
    }

    /// One retried read-modify-write cycle. `encode` mutates a working copy
    /// of the freshly fetched object and returns the trigger it stamped.
    fn transition<F>(
        &self,
        handle: &ResourceHandle,
        cx: &CallContext,
        mut encode: F,
    ) -> Result<TransitionOutcome>
    where
        F: FnMut(&mut Resource, DateTime<Utc>) -> String,
    {
        let retried = retry_on_conflict(self.policy, cx, |_attempt| {
            let snapshot = self.store.get(handle, cx)?;
            let mut working = snapshot.clone();
            let requested_at = encode(&mut working, self.clock.now());

            let patch = MergePatch::from_diff(&snapshot, &working)?;
            self.store.patch(handle, &patch, cx)?;
            Ok(requested_at)
        })?;

        Ok(TransitionOutcome {
            resource: handle.clone(),
            attempts: retried.attempts,
            requested_at: retried.value,
        })
    }
}

/// Force-unlock `lock_id` on `handle` and request reconciliation.
///
/// Writes ` {namespace}/{name} Patched and Reconcile requested` to `out` only
/// after the patch has landed; on failure the first fatal error is returned
/// and nothing is written.
pub fn force_unlock<S: ObjectStore + ?Sized, C: Clock + ?Sized>(
    requester: &TransitionRequester<'_, S, C>,
    handle: &ResourceHandle,
    lock_id: &str,
    cx: &CallContext,
    out: &mut dyn Write,
) -> Result<TransitionOutcome> {
    let outcome = requester.request_unlock(handle, lock_id, cx, out)?;
    let _ = writeln!(out, " {} Patched and Reconcile requested", handle);
    Ok(outcome)
}
