//! Lock acquisition, listing, and clearing operations.

use super::guard::LockGuard;
use super::metadata::LockMetadata;
use super::types::LockInfo;
use crate::context::StoreContext;
use crate::error::{Result, UnlockError};
use crate::resource::ResourceHandle;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

/// Acquire the write lock for one resource.
///
/// A lock held by a live writer is reported as `Conflict` so the caller's
/// retry loop backs off and tries again. A stale lock (its holder most likely
/// crashed) is reported as `LockError`, since retrying cannot clear it.
pub fn acquire_resource_lock(
    ctx: &StoreContext,
    handle: &ResourceHandle,
    action: &str,
    stale_minutes: u32,
) -> Result<LockGuard> {
    let lock_path = ctx.lock_path(handle);
    let metadata = LockMetadata::new(action);

    match create_lock_file(&lock_path, &metadata) {
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            Err(held_lock_error(&lock_path, handle, stale_minutes))
        }
        Err(e) => Err(UnlockError::LockError(format!(
            "failed to acquire lock '{}': {}",
            lock_path.display(),
            e
        ))),
        Ok(()) => Ok(LockGuard::new(lock_path)),
    }
}

/// Exclusively create the lock file and write its metadata.
fn create_lock_file(lock_path: &Path, metadata: &LockMetadata) -> std::io::Result<()> {
    if let Some(parent) = lock_path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent)?;
    }

    let json = metadata
        .to_json()
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(lock_path)?;

    let written = file
        .write_all(json.as_bytes())
        .and_then(|()| file.sync_all());
    if written.is_err() {
        let _ = fs::remove_file(lock_path);
    }
    written
}

fn held_lock_error(lock_path: &Path, handle: &ResourceHandle, stale_minutes: u32) -> UnlockError {
    match LockMetadata::from_file(lock_path) {
        Ok(meta) if meta.is_stale(stale_minutes) => UnlockError::LockError(format!(
            "write lock on '{}' is stale (created {} ago by {}, action: {}).\n\
             If the holder has crashed, clear it with:\n  tfunlock store-lock clear {} --force",
            handle,
            meta.age_string(),
            meta.owner,
            meta.action,
            handle
        )),
        Ok(meta) => UnlockError::Conflict(format!(
            "write lock on '{}' is held by {} ({})",
            handle, meta.owner, meta.action
        )),
        // The holder may be between create and write, or just released it.
        Err(_) => UnlockError::Conflict(format!(
            "write lock on '{}' is held by another process",
            handle
        )),
    }
}

/// List all store write locks, sorted by resource.
pub fn list_locks(ctx: &StoreContext, stale_minutes: u32) -> Result<Vec<LockInfo>> {
    let mut locks = Vec::new();

    if !ctx.locks_dir.exists() {
        return Ok(locks);
    }

    let entries = fs::read_dir(&ctx.locks_dir).map_err(|e| {
        UnlockError::LockError(format!(
            "failed to read locks directory '{}': {}",
            ctx.locks_dir.display(),
            e
        ))
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| {
            UnlockError::LockError(format!("failed to read locks directory entry: {}", e))
        })?;
        let path = entry.path();

        if path.extension().and_then(|e| e.to_str()) != Some("lock") {
            continue;
        }

        let Some(resource) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|stem| stem.split_once('_'))
            .and_then(|(ns, name)| ResourceHandle::new(ns, name).ok())
        else {
            continue;
        };

        let Ok(metadata) = LockMetadata::from_file(&path) else {
            continue;
        };

        let is_stale = metadata.is_stale(stale_minutes);
        locks.push(LockInfo {
            path,
            resource,
            metadata,
            is_stale,
        });
    }

    locks.sort_by(|a, b| a.resource.cmp(&b.resource));
    Ok(locks)
}

/// Remove a resource's write lock.
///
/// The caller is responsible for confirming that clearing is appropriate
/// (the CLI requires `--force`).
pub fn clear_lock(
    ctx: &StoreContext,
    handle: &ResourceHandle,
    stale_minutes: u32,
) -> Result<LockInfo> {
    let lock_path = ctx.lock_path(handle);

    if !lock_path.exists() {
        return Err(UnlockError::UserError(format!(
            "no write lock for '{}' at: {}",
            handle,
            lock_path.display()
        )));
    }

    let metadata = LockMetadata::from_file(&lock_path)?;
    let is_stale = metadata.is_stale(stale_minutes);

    fs::remove_file(&lock_path).map_err(|e| {
        UnlockError::LockError(format!(
            "failed to clear lock '{}': {}",
            lock_path.display(),
            e
        ))
    })?;

    Ok(LockInfo {
        path: lock_path,
        resource: handle.clone(),
        metadata,
        is_stale,
    })
}
