//! Implementation of the `tfunlock force-unlock` command.

use super::Session;
use crate::cli::{ForceUnlockArgs, GlobalArgs};
use crate::clock::{Clock, SystemClock};
use crate::deadline::CallContext;
use crate::error::{Result, UnlockError};
use crate::events::{Event, EventAction, record_event};
use crate::resource::ResourceHandle;
use crate::unlock::{TransitionOutcome, TransitionRequester, force_unlock};
use serde_json::json;
use std::io::{self, Write};

/// Execute the `tfunlock force-unlock` command.
pub fn cmd_force_unlock(globals: &GlobalArgs, args: ForceUnlockArgs) -> Result<()> {
    let session = Session::open(globals)?;
    let handle = session.handle(&args.resource, globals.namespace.as_deref())?;
    let cx = session.call_context(globals.timeout);

    let mut stdout = io::stdout().lock();
    run_force_unlock(&session, &handle, &args.lock_id, &cx, &SystemClock, &mut stdout)?;
    Ok(())
}

/// Record the unlock intent on `handle` and log the event.
pub(crate) fn run_force_unlock(
    session: &Session,
    handle: &ResourceHandle,
    lock_id: &str,
    cx: &CallContext,
    clock: &dyn Clock,
    out: &mut dyn Write,
) -> Result<TransitionOutcome> {
    if lock_id.trim().is_empty() {
        return Err(UnlockError::UserError(
            "lock ID must not be empty.\n\n\
             Use the ID reported by Terraform in the 'Error acquiring the state lock' message."
                .to_string(),
        ));
    }

    let store = session.store();
    let requester = TransitionRequester::new(&store, clock, &session.config.retry);
    let outcome = force_unlock(&requester, handle, lock_id, cx, out)?;

    let event = Event::new(EventAction::ForceUnlock)
        .with_resource(handle)
        .with_details(json!({
            "lock_id": lock_id,
            "attempts": outcome.attempts,
            "requested_at": outcome.requested_at,
        }));
    record_event(&session.ctx, &event);

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::testing::{SteppingClock, at};
    use crate::exit_codes;
    use crate::resource::ForceUnlockMode;
    use crate::test_support::{HELLOWORLD, create_test_store, read_resource, seed_resource};
    use std::fs;

    fn session_with(yaml: &str) -> (tempfile::TempDir, Session, ResourceHandle) {
        let (temp_dir, ctx) = create_test_store();
        let handle = seed_resource(&ctx, yaml);
        (temp_dir, Session::for_store(ctx).unwrap(), handle)
    }

    #[test]
    fn test_force_unlock_patches_and_confirms() {
        let (_temp_dir, session, handle) = session_with(HELLOWORLD);
        let clock = SteppingClock::fixed(at("2026-10-16T09:00:00Z"));
        let mut out = Vec::new();

        let outcome = run_force_unlock(
            &session,
            &handle,
            "f2ab685b",
            &CallContext::background(),
            &clock,
            &mut out,
        )
        .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            " Setting LockIdentifier to 'f2ab685b' on resource flux-system/helloworld\n \
             flux-system/helloworld Patched and Reconcile requested\n"
        );

        let stored = read_resource(&session.ctx, &handle);
        let lock_state = stored.lock_state().unwrap();
        assert_eq!(lock_state.force_unlock, ForceUnlockMode::Yes);
        assert_eq!(lock_state.lock_identifier, "f2ab685b");
        assert_eq!(
            stored.reconcile_requested_at(),
            Some(outcome.requested_at.as_str())
        );
        assert_eq!(stored.metadata.resource_version.as_deref(), Some("2"));
    }

    #[test]
    fn test_force_unlock_logs_event() {
        let (_temp_dir, session, handle) = session_with(HELLOWORLD);
        let clock = SteppingClock::fixed(at("2026-10-16T09:00:00Z"));

        run_force_unlock(
            &session,
            &handle,
            "abc",
            &CallContext::background(),
            &clock,
            &mut Vec::new(),
        )
        .unwrap();

        let log = fs::read_to_string(session.ctx.events_file()).unwrap();
        let event: Event = serde_json::from_str(log.lines().next().unwrap()).unwrap();
        assert_eq!(event.action, EventAction::ForceUnlock);
        assert_eq!(event.resource.as_deref(), Some("flux-system/helloworld"));
        assert_eq!(event.details["lock_id"], "abc");
        assert_eq!(event.details["attempts"], 1);
        assert_eq!(
            event.details["requested_at"],
            "2026-10-16T09:00:00.000000000Z"
        );
    }

    #[test]
    fn test_force_unlock_missing_resource() {
        let (_temp_dir, session, _) = session_with(HELLOWORLD);
        let missing = ResourceHandle::new("flux-system", "absent").unwrap();
        let clock = SteppingClock::fixed(at("2026-10-16T09:00:00Z"));
        let mut out = Vec::new();

        let err = run_force_unlock(
            &session,
            &missing,
            "abc",
            &CallContext::background(),
            &clock,
            &mut out,
        )
        .unwrap_err();

        assert_eq!(err.exit_code(), exit_codes::NOT_FOUND);
        assert!(out.is_empty());
        assert!(!session.ctx.events_file().exists());
    }

    #[test]
    fn test_force_unlock_rejects_empty_lock_id() {
        let (_temp_dir, session, handle) = session_with(HELLOWORLD);
        let clock = SteppingClock::fixed(at("2026-10-16T09:00:00Z"));

        let err = run_force_unlock(
            &session,
            &handle,
            "  ",
            &CallContext::background(),
            &clock,
            &mut Vec::new(),
        )
        .unwrap_err();

        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
        assert!(read_resource(&session.ctx, &handle).lock_state().is_none());
    }

    #[test]
    fn test_force_unlock_with_held_store_lock_exhausts_retries() {
        let (_temp_dir, mut session, handle) = session_with(HELLOWORLD);
        session.config.retry.initial_delay_ms = 0;
        let _held = crate::locks::acquire_resource_lock(&session.ctx, &handle, "patch", 10).unwrap();
        let clock = SteppingClock::fixed(at("2026-10-16T09:00:00Z"));
        let mut out = Vec::new();

        let err = run_force_unlock(
            &session,
            &handle,
            "abc",
            &CallContext::background(),
            &clock,
            &mut out,
        )
        .unwrap_err();

        assert!(matches!(err, UnlockError::RetriesExhausted { attempts: 4, .. }));
        assert_eq!(err.exit_code(), exit_codes::CONFLICT);
        assert!(!String::from_utf8(out).unwrap().contains("Patched"));
        assert!(read_resource(&session.ctx, &handle).lock_state().is_none());
    }
}
