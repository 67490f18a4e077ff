//! Implementation of the `tfunlock store-lock` commands.

use super::Session;
use crate::cli::{GlobalArgs, StoreLockClearArgs};
use crate::error::{Result, UnlockError};
use crate::events::{Event, EventAction, record_event};
use crate::locks::{self, LockInfo};
use crate::resource::ResourceHandle;
use serde_json::json;
use std::fmt::Write;

/// Execute `tfunlock store-lock list`.
pub fn cmd_store_lock_list(globals: &GlobalArgs) -> Result<()> {
    let session = Session::open(globals)?;
    let locks = locks::list_locks(&session.ctx, session.config.lock_stale_minutes)?;
    print!("{}", render_lock_list(&locks, session.config.lock_stale_minutes));
    Ok(())
}

/// Execute `tfunlock store-lock clear`.
pub fn cmd_store_lock_clear(globals: &GlobalArgs, args: StoreLockClearArgs) -> Result<()> {
    let session = Session::open(globals)?;
    let cleared = run_store_lock_clear(&session, &args)?;

    println!("Cleared lock: {}", cleared.resource);
    println!();
    print!("{}", render_lock_details(&cleared));
    Ok(())
}

pub(crate) fn run_store_lock_clear(session: &Session, args: &StoreLockClearArgs) -> Result<LockInfo> {
    if !args.force {
        return Err(UnlockError::UserError(format!(
            "refusing to clear lock without --force flag.\n\n\
             Clearing a lock whose holder is still writing can lose that write.\n\
             Only clear locks if you are certain the lock holder has crashed.\n\n\
             To clear the lock, run:\n  tfunlock store-lock clear {} --force",
            args.resource
        )));
    }

    let handle = ResourceHandle::parse_qualified(&args.resource)?;
    let cleared = locks::clear_lock(&session.ctx, &handle, session.config.lock_stale_minutes)?;

    let event = Event::new(EventAction::LockClear)
        .with_resource(&handle)
        .with_details(json!({
            "age_minutes": cleared.metadata.age().num_minutes(),
            "was_stale": cleared.is_stale,
            "owner": cleared.metadata.owner,
            "original_action": cleared.metadata.action,
        }));
    record_event(&session.ctx, &event);

    Ok(cleared)
}

pub(crate) fn render_lock_list(locks: &[LockInfo], stale_minutes: u32) -> String {
    let mut out = String::new();

    if locks.is_empty() {
        let _ = writeln!(out, "No active store locks.");
        return out;
    }

    let _ = writeln!(out, "Active store locks ({}):", locks.len());
    let _ = writeln!(out);

    for lock in locks {
        let _ = writeln!(out, "  {}:", lock.resource);
        for line in render_lock_details(lock).lines() {
            let _ = writeln!(out, "  {}", line);
        }
        if lock.is_stale {
            let _ = writeln!(out, "    Note:       exceeds {} min threshold", stale_minutes);
        }
        let _ = writeln!(out);
    }

    let stale_count = locks.iter().filter(|l| l.is_stale).count();
    if stale_count > 0 {
        let _ = writeln!(
            out,
            "Note: {} lock(s) are stale. Use `tfunlock store-lock clear <namespace>/<name> --force` to clear.",
            stale_count
        );
    }

    out
}

fn render_lock_details(lock: &LockInfo) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "  Owner:      {}", lock.metadata.owner);
    if let Some(pid) = lock.metadata.pid {
        let _ = writeln!(out, "  PID:        {}", pid);
    }
    let _ = writeln!(
        out,
        "  Created:    {}",
        lock.metadata.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(out, "  Age:        {}", lock.metadata.age_string());
    let _ = writeln!(out, "  Action:     {}", lock.metadata.action);
    if lock.is_stale {
        let _ = writeln!(out, "  Status:     STALE");
    }
    let _ = writeln!(out, "  Path:       {}", lock.path.display());

    out
}
