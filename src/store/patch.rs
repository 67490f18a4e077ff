//! JSON merge patches (RFC 7386) with an optimistic-lock precondition.

use crate::error::Result;
use crate::resource::Resource;
use serde_json::{Map, Value};

/// A minimal partial update plus the version it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct MergePatch {
    resource_version: Option<String>,
    body: Value,
}

impl MergePatch {
    /// Build the patch that turns `original` into `modified`.
    ///
    /// Only changed fields are included, so fields written concurrently by
    /// other writers are left alone. The precondition is `original`'s
    /// `resourceVersion`.
    pub fn from_diff(original: &Resource, modified: &Resource) -> Result<Self> {
        let before = original.to_json_value()?;
        let after = modified.to_json_value()?;

        Ok(Self {
            resource_version: original.metadata.resource_version.clone(),
            body: diff(&before, &after).unwrap_or_else(|| Value::Object(Map::new())),
        })
    }

    /// Version the stored object must still carry for the patch to apply.
    pub fn resource_version(&self) -> Option<&str> {
        self.resource_version.as_deref()
    }

    /// The merge patch document.
    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn is_empty(&self) -> bool {
        self.body.as_object().is_some_and(Map::is_empty)
    }
}

/// Compute the merge patch from `original` to `modified`, or `None` if equal.
fn diff(original: &Value, modified: &Value) -> Option<Value> {
    match (original, modified) {
        (Value::Object(before), Value::Object(after)) => {
            let mut patch = Map::new();

            for (key, new_value) in after {
                match before.get(key) {
                    Some(old_value) => {
                        if let Some(changed) = diff(old_value, new_value) {
                            patch.insert(key.clone(), changed);
                        }
                    }
                    None => {
                        patch.insert(key.clone(), new_value.clone());
                    }
                }
            }

            for key in before.keys() {
                if !after.contains_key(key) {
                    patch.insert(key.clone(), Value::Null);
                }
            }

            (!patch.is_empty()).then_some(Value::Object(patch))
        }
        (before, after) if before == after => None,
        (_, after) => Some(after.clone()),
    }
}

/// Apply a merge patch document to `target` in place.
///
/// `null` members delete, objects merge recursively, anything else replaces.
pub fn apply_merge_patch(target: &mut Value, patch: &Value) {
    let Value::Object(patch_members) = patch else {
        *target = patch.clone();
        return;
    };

    if !target.is_object() {
        *target = Value::Object(Map::new());
    }

    if let Value::Object(target_members) = target {
        for (key, value) in patch_members {
            if value.is_null() {
                target_members.remove(key);
            } else {
                apply_merge_patch(
                    target_members.entry(key.clone()).or_insert(Value::Null),
                    value,
                );
            }
        }
    }
}
