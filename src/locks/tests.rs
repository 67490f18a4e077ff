//! Tests for the store write-lock subsystem.

use super::*;
use crate::context::StoreContext;
use crate::error::UnlockError;
use crate::resource::ResourceHandle;
use chrono::{Duration, Utc};
use tempfile::TempDir;

fn create_test_store() -> (TempDir, StoreContext) {
    let temp_dir = TempDir::new().unwrap();
    let ctx = StoreContext::at(temp_dir.path().join(".tfunlock"));
    std::fs::create_dir_all(&ctx.locks_dir).unwrap();
    (temp_dir, ctx)
}

fn handle() -> ResourceHandle {
    ResourceHandle::new("flux-system", "helloworld").unwrap()
}

fn write_lock_created_at(ctx: &StoreContext, handle: &ResourceHandle, minutes_ago: i64) {
    let mut meta = LockMetadata::new("patch");
    meta.created_at = Utc::now() - Duration::minutes(minutes_ago);
    std::fs::write(ctx.lock_path(handle), meta.to_json().unwrap()).unwrap();
}

#[test]
fn test_lock_metadata_creation() {
    let meta = LockMetadata::new("patch");

    assert!(!meta.owner.is_empty());
    assert!(meta.owner.contains('@'));
    assert!(meta.pid.is_some());
    assert_eq!(meta.action, "patch");
    assert!(meta.age().num_minutes() < 1);
}

#[test]
fn test_lock_metadata_serialization() {
    let meta = LockMetadata::new("patch");
    let json = meta.to_json().unwrap();

    assert!(json.contains("owner"));
    assert!(json.contains("created_at"));

    let parsed: LockMetadata = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.action, "patch");
}

#[test]
fn test_lock_staleness() {
    let mut meta = LockMetadata::new("patch");
    assert!(!meta.is_stale(10));

    meta.created_at = Utc::now() - Duration::minutes(15);
    assert!(meta.is_stale(10));
    assert_eq!(meta.age_string(), "15m 0s");
}

#[test]
fn test_acquire_creates_and_guard_releases() {
    let (_temp_dir, ctx) = create_test_store();
    let handle = handle();

    {
        let guard = acquire_resource_lock(&ctx, &handle, "patch", 10).unwrap();
        assert!(guard.path().exists());
        assert_eq!(guard.path(), ctx.lock_path(&handle));
    }

    assert!(!ctx.lock_path(&handle).exists());
}

#[test]
fn test_acquire_creates_missing_locks_dir() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = StoreContext::at(temp_dir.path().join(".tfunlock"));

    let guard = acquire_resource_lock(&ctx, &handle(), "patch", 10).unwrap();
    assert!(guard.path().exists());
}

#[test]
fn test_held_lock_is_a_conflict() {
    let (_temp_dir, ctx) = create_test_store();
    let handle = handle();
    let _held = acquire_resource_lock(&ctx, &handle, "patch", 10).unwrap();

    let err = acquire_resource_lock(&ctx, &handle, "patch", 10).unwrap_err();
    assert!(err.is_conflict(), "expected conflict, got {:?}", err);
}

#[test]
fn test_stale_lock_is_a_lock_error_with_hint() {
    let (_temp_dir, ctx) = create_test_store();
    let handle = handle();
    write_lock_created_at(&ctx, &handle, 30);

    let err = acquire_resource_lock(&ctx, &handle, "patch", 10).unwrap_err();
    assert!(matches!(err, UnlockError::LockError(_)));
    assert!(err.to_string().contains("store-lock clear flux-system/helloworld"));
}

#[test]
fn test_locks_on_different_resources_are_independent() {
    let (_temp_dir, ctx) = create_test_store();
    let a = ResourceHandle::new("flux-system", "a").unwrap();
    let b = ResourceHandle::new("flux-system", "b").unwrap();

    let _a = acquire_resource_lock(&ctx, &a, "patch", 10).unwrap();
    assert!(acquire_resource_lock(&ctx, &b, "patch", 10).is_ok());
}

#[test]
fn test_list_locks_sorted_with_staleness() {
    let (_temp_dir, ctx) = create_test_store();
    let fresh = ResourceHandle::new("team-b", "net").unwrap();
    let stale = ResourceHandle::new("team-a", "db").unwrap();
    write_lock_created_at(&ctx, &fresh, 0);
    write_lock_created_at(&ctx, &stale, 60);
    std::fs::write(ctx.locks_dir.join("README.txt"), "ignored").unwrap();

    let locks = list_locks(&ctx, 10).unwrap();

    assert_eq!(locks.len(), 2);
    assert_eq!(locks[0].resource, stale);
    assert!(locks[0].is_stale);
    assert_eq!(locks[1].resource, fresh);
    assert!(!locks[1].is_stale);
    assert!(locks[0].to_string().contains("STALE"));
}

#[test]
fn test_list_locks_without_dir_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = StoreContext::at(temp_dir.path().join("missing"));
    assert!(list_locks(&ctx, 10).unwrap().is_empty());
}

#[test]
fn test_clear_lock_removes_file() {
    let (_temp_dir, ctx) = create_test_store();
    let handle = handle();
    write_lock_created_at(&ctx, &handle, 30);

    let cleared = clear_lock(&ctx, &handle, 10).unwrap();

    assert!(cleared.is_stale);
    assert_eq!(cleared.resource, handle);
    assert!(!ctx.lock_path(&handle).exists());
}

#[test]
fn test_clear_missing_lock_is_user_error() {
    let (_temp_dir, ctx) = create_test_store();
    let err = clear_lock(&ctx, &handle(), 10).unwrap_err();
    assert!(matches!(err, UnlockError::UserError(_)));
}
