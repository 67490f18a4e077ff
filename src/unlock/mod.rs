//! Force-unlock and reconcile requests against reconciler-owned resources.
//!
//! A request is a read-modify-write cycle: fetch the current object, encode
//! the intent into a working copy, submit the difference as a merge patch.
//! The reconciler may rewrite the object at any time, so a patch derived from
//! an outdated snapshot is rejected by the store and the whole cycle runs
//! again against a fresh read, up to the retry budget.
//!
//! ```text
//! Fetching -> Encoding -> Submitting -> Success
//!    ^                        |
//!    +------ Conflict --------+-------> FatalError
//! ```

mod intent;
mod requester;
mod retry;


pub use intent::{encode_unlock_intent, next_lock_state, stamp_reconcile_request};
pub use requester::{TransitionOutcome, TransitionRequester, force_unlock};
pub use retry::{Retried, RetryPolicy, retry_on_conflict};
