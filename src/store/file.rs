//! File-backed object store.
//!
//! One YAML document per resource at
//! `.tfunlock/resources/{namespace}/{name}.yaml`. The reconciler and this tool
//! both write through `patch`, which performs a compare-and-swap on
//! `metadata.resourceVersion` under a short-lived per-resource write lock and
//! replaces the document atomically.

use super::patch::apply_merge_patch;
use super::{MergePatch, ObjectStore};
use crate::context::StoreContext;
use crate::deadline::CallContext;
use crate::error::{Result, UnlockError};
use crate::fs::atomic_write_file;
use crate::locks::acquire_resource_lock;
use crate::resource::{Resource, ResourceHandle};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;

/// Object store backed by YAML documents on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    ctx: StoreContext,
    lock_stale_minutes: u32,
}

impl FileStore {
    pub fn new(ctx: StoreContext, lock_stale_minutes: u32) -> Self {
        Self {
            ctx,
            lock_stale_minutes,
        }
    }

    /// Read a document as a JSON value.
    fn read_document(&self, handle: &ResourceHandle) -> Result<Value> {
        let path = self.ctx.resource_path(handle);

        let content = fs::read_to_string(&path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                UnlockError::NotFound {
                    namespace: handle.namespace.clone(),
                    name: handle.name.clone(),
                }
            } else {
                UnlockError::Store(format!(
                    "failed to read resource '{}': {}",
                    path.display(),
                    e
                ))
            }
        })?;

        serde_yaml::from_str(&content).map_err(|e| {
            UnlockError::Store(format!(
                "failed to parse resource '{}': {}",
                path.display(),
                e
            ))
        })
    }

    fn write_document(&self, handle: &ResourceHandle, document: &Value) -> Result<()> {
        let yaml = serde_yaml::to_string(document).map_err(|e| {
            UnlockError::Store(format!("failed to serialize resource '{}': {}", handle, e))
        })?;
        atomic_write_file(self.ctx.resource_path(handle), &yaml)
    }
}

/// Current `metadata.resourceVersion`, accepting string or integer values.
fn version_of(document: &Value) -> Option<String> {
    match document.pointer("/metadata/resourceVersion")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Version token written after a successful patch.
///
/// Tokens are decimal counters. A document that carries anything else cannot
/// be versioned monotonically and is rejected.
fn next_version(handle: &ResourceHandle, current: Option<&str>) -> Result<String> {
    let Some(current) = current else {
        return Ok("1".to_string());
    };

    current
        .parse::<u64>()
        .ok()
        .and_then(|v| v.checked_add(1))
        .map(|v| v.to_string())
        .ok_or_else(|| {
            UnlockError::Store(format!(
                "resource '{}' has non-numeric resourceVersion '{}'",
                handle, current
            ))
        })
}

/// Fill in identity fields the document may omit and reject mismatches.
fn bind_identity(document: &mut Value, handle: &ResourceHandle) -> Result<()> {
    let Some(metadata) = document
        .get_mut("metadata")
        .and_then(Value::as_object_mut)
    else {
        return Err(UnlockError::Store(format!(
            "resource '{}' has no metadata",
            handle
        )));
    };

    for (key, expected) in [("namespace", &handle.namespace), ("name", &handle.name)] {
        let found = metadata
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string);
        match found.as_deref() {
            None | Some("") => {
                metadata.insert(key.to_string(), Value::String(expected.clone()));
            }
            Some(found) if found == expected.as_str() => {}
            Some(found) => {
                return Err(UnlockError::Store(format!(
                    "resource document for '{}' declares {} '{}'",
                    handle, key, found
                )));
            }
        }
    }

    Ok(())
}

impl ObjectStore for FileStore {
    fn get(&self, handle: &ResourceHandle, cx: &CallContext) -> Result<Resource> {
        cx.check()?;
        let mut document = self.read_document(handle)?;
        bind_identity(&mut document, handle)?;
        Resource::from_json_value(document)
    }

    fn patch(&self, handle: &ResourceHandle, patch: &MergePatch, cx: &CallContext) -> Result<()> {
        cx.check()?;
        let _guard =
            acquire_resource_lock(&self.ctx, handle, "patch", self.lock_stale_minutes)?;

        let mut document = self.read_document(handle)?;
        let current = version_of(&document);

        // An unversioned snapshot only matches a document that is still unversioned.
        if current.as_deref() != patch.resource_version() {
            return Err(UnlockError::Conflict(format!(
                "the object '{}' has been modified; resourceVersion is {} but the patch was \
                 derived from {}",
                handle,
                current.as_deref().unwrap_or("<none>"),
                patch.resource_version().unwrap_or("<none>")
            )));
        }
        let next = next_version(handle, current.as_deref())?;

        apply_merge_patch(&mut document, patch.body());
        bind_identity(&mut document, handle)?;
        if let Some(metadata) = document
            .get_mut("metadata")
            .and_then(Value::as_object_mut)
        {
            metadata.insert(
                "resourceVersion".to_string(),
                Value::String(next),
            );
        }

        // Refuse to persist a document that no longer decodes.
        Resource::from_json_value(document.clone())?;

        cx.check()?;
        self.write_document(handle, &document)
    }
}
