//! Implementation of the `tfunlock reconcile` command.
//!
//! Stamps the reconcile trigger without touching the lock state, for when
//! the reconciler only needs a nudge.

use super::Session;
use crate::cli::{GlobalArgs, ResourceArgs};
use crate::clock::{Clock, SystemClock};
use crate::deadline::CallContext;
use crate::error::Result;
use crate::events::{Event, EventAction, record_event};
use crate::resource::ResourceHandle;
use crate::unlock::{TransitionOutcome, TransitionRequester};
use serde_json::json;

/// Execute the `tfunlock reconcile` command.
pub fn cmd_reconcile(globals: &GlobalArgs, args: ResourceArgs) -> Result<()> {
    let session = Session::open(globals)?;
    let handle = session.handle(&args.resource, globals.namespace.as_deref())?;
    let cx = session.call_context(globals.timeout);

    let outcome = run_reconcile(&session, &handle, &cx, &SystemClock)?;
    println!(" {} Reconcile requested at {}", handle, outcome.requested_at);
    Ok(())
}

pub(crate) fn run_reconcile(
    session: &Session,
    handle: &ResourceHandle,
    cx: &CallContext,
    clock: &dyn Clock,
) -> Result<TransitionOutcome> {
    let store = session.store();
    let requester = TransitionRequester::new(&store, clock, &session.config.retry);
    let outcome = requester.request_reconcile(handle, cx)?;

    let event = Event::new(EventAction::Reconcile)
        .with_resource(handle)
        .with_details(json!({
            "attempts": outcome.attempts,
            "requested_at": outcome.requested_at,
        }));
    record_event(&session.ctx, &event);

    Ok(outcome)
}
