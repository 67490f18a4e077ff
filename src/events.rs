//! Append-only audit log for store mutations.
//!
//! Every command that changes the store appends one NDJSON line (one JSON
//! object per line) to `.tfunlock/events/events.ndjson`, so operators can see
//! who requested an unlock and when.
//!
//! # Event Format
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: `init`, `force_unlock`, `reconcile` or `lock_clear`
//! - `actor`: The owner string (e.g., `user@HOST`)
//! - `resource`: Optional `namespace/name` of the affected resource
//! - `details`: Freeform object with action-specific details
//!
//! The log is informational. Callers report append failures as warnings and
//! never fail a command that already mutated the store.

use crate::context::StoreContext;
use crate::error::{Result, UnlockError};
use crate::locks::get_owner_string;
use crate::resource::ResourceHandle;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Store initialization
    Init,
    /// Unlock intent recorded and reconcile requested
    ForceUnlock,
    /// Reconcile requested without touching lock state
    Reconcile,
    /// Store write lock cleared manually
    LockClear,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Init => write!(f, "init"),
            EventAction::ForceUnlock => write!(f, "force_unlock"),
            EventAction::Reconcile => write!(f, "reconcile"),
            EventAction::LockClear => write!(f, "lock_clear"),
        }
    }
}

/// An event record for the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub ts: DateTime<Utc>,

    pub action: EventAction,

    /// The actor who performed the action (e.g., `user@HOST`).
    pub actor: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,

    pub details: Value,
}

impl Event {
    /// Create a new event stamped with the current time and actor.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: get_owner_string(),
            resource: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_resource(mut self, handle: &ResourceHandle) -> Self {
        self.resource = Some(handle.to_string());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| UnlockError::UserError(format!("failed to serialize event to JSON: {}", e)))
    }
}

/// Append an event to the audit log, creating the file if needed.
pub fn append_event(ctx: &StoreContext, event: &Event) -> Result<()> {
    let events_file = ctx.events_file();
    let json_line = event.to_ndjson_line()?;

    fs::create_dir_all(&ctx.events_dir).map_err(|e| {
        UnlockError::Store(format!(
            "failed to create events directory '{}': {}",
            ctx.events_dir.display(),
            e
        ))
    })?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&events_file)
        .map_err(|e| {
            UnlockError::Store(format!(
                "failed to open events file '{}': {}",
                events_file.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line).map_err(|e| {
        UnlockError::Store(format!(
            "failed to write event to '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    Ok(())
}

/// Append an event, reporting a failure on stderr instead of returning it.
pub fn record_event(ctx: &StoreContext, event: &Event) {
    if let Err(e) = append_event(ctx, event) {
        eprintln!("Warning: failed to record {} event: {}", event.action, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, StoreContext) {
        let temp_dir = TempDir::new().unwrap();
        let ctx = StoreContext::at(temp_dir.path().join(".tfunlock"));
        (temp_dir, ctx)
    }

    fn read_events(ctx: &StoreContext) -> Vec<Event> {
        fs::read_to_string(ctx.events_file())
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_event_creation() {
        let event = Event::new(EventAction::Init);

        assert_eq!(event.action, EventAction::Init);
        assert!(event.actor.contains('@'));
        assert!(event.resource.is_none());
        let age = Utc::now().signed_duration_since(event.ts);
        assert!(age.num_minutes() < 1);
    }

    #[test]
    fn test_event_with_resource_and_details() {
        let handle = ResourceHandle::new("flux-system", "helloworld").unwrap();
        let event = Event::new(EventAction::ForceUnlock)
            .with_resource(&handle)
            .with_details(json!({"lock_id": "abc", "attempts": 2}));

        assert_eq!(event.resource.as_deref(), Some("flux-system/helloworld"));
        assert_eq!(event.details["lock_id"], "abc");
        assert_eq!(event.details["attempts"], 2);
    }

    #[test]
    fn test_event_action_serializes_snake_case() {
        let line = Event::new(EventAction::ForceUnlock).to_ndjson_line().unwrap();
        assert!(line.contains("\"force_unlock\""));
        assert!(!line.contains('\n'));

        let line = Event::new(EventAction::LockClear).to_ndjson_line().unwrap();
        assert!(line.contains("\"lock_clear\""));
    }

    #[test]
    fn test_event_without_resource_omits_field() {
        let line = Event::new(EventAction::Init).to_ndjson_line().unwrap();
        let parsed: Value = serde_json::from_str(&line).unwrap();
        assert!(parsed.get("resource").is_none());
    }

    #[test]
    fn test_append_event_creates_directory_and_file() {
        let (_temp_dir, ctx) = create_test_store();
        assert!(!ctx.events_file().exists());

        append_event(&ctx, &Event::new(EventAction::Init)).unwrap();

        let events = read_events(&ctx);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, EventAction::Init);
    }

    #[test]
    fn test_append_event_appends_in_order() {
        let (_temp_dir, ctx) = create_test_store();
        let handle = ResourceHandle::new("flux-system", "helloworld").unwrap();

        append_event(&ctx, &Event::new(EventAction::Init)).unwrap();
        append_event(&ctx, &Event::new(EventAction::Reconcile).with_resource(&handle)).unwrap();

        let events = read_events(&ctx);
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].action, EventAction::Reconcile);
        assert_eq!(events[1].resource.as_deref(), Some("flux-system/helloworld"));
    }

    #[test]
    fn test_record_event_swallows_failures() {
        let (temp_dir, _) = create_test_store();
        // A regular file where the events directory should be.
        let root = temp_dir.path().join(".tfunlock");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("events"), "not a directory").unwrap();
        let ctx = StoreContext::at(root.clone());

        assert!(append_event(&ctx, &Event::new(EventAction::Init)).is_err());
        record_event(&ctx, &Event::new(EventAction::Init));
    }
}
