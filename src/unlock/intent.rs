//! Pure encoding of the unlock intent and the reconcile trigger.

use crate::clock::next_trigger;
use crate::resource::{
    ForceUnlockMode, LockStateSpec, RECONCILE_REQUEST_ANNOTATION, Resource,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::io::Write;

/// Lock state after requesting release of `lock_id`.
///
/// The identifier is always replaced. The mode becomes `Yes` unless it is
/// already `Auto`, which is never downgraded. Fields this tool does not
/// interpret are carried over.
pub fn next_lock_state(current: Option<&LockStateSpec>, lock_id: &str) -> LockStateSpec {
    let Some(current) = current else {
        return LockStateSpec::new(ForceUnlockMode::Yes, lock_id);
    };

    let mut next = current.clone();
    next.lock_identifier = lock_id.to_string();
    if next.force_unlock != ForceUnlockMode::Auto {
        next.force_unlock = ForceUnlockMode::Yes;
    }
    next
}

/// Set the reconcile trigger, keeping every other annotation.
///
/// Returns the stamped value, which is strictly newer than any trigger the
/// annotations carried before.
pub fn stamp_reconcile_request(
    annotations: &mut Option<BTreeMap<String, String>>,
    now: DateTime<Utc>,
) -> String {
    let previous = annotations
        .as_ref()
        .and_then(|a| a.get(RECONCILE_REQUEST_ANNOTATION));
    let stamp = next_trigger(previous.map(String::as_str), now);

    annotations
        .get_or_insert_with(BTreeMap::new)
        .insert(RECONCILE_REQUEST_ANNOTATION.to_string(), stamp.clone());
    stamp
}

/// Encode a force-unlock request into `resource` and report progress.
///
/// The progress line is informational; a failing sink is ignored.
pub fn encode_unlock_intent(
    resource: &mut Resource,
    lock_id: &str,
    now: DateTime<Utc>,
    progress: &mut dyn Write,
) -> String {
    resource.spec.tfstate = Some(next_lock_state(resource.spec.tfstate.as_ref(), lock_id));

    let _ = writeln!(
        progress,
        " Setting LockIdentifier to '{}' on resource {}",
        lock_id,
        resource.handle()
    );

    stamp_reconcile_request(&mut resource.metadata.annotations, now)
}
