//! Resource model for controller-managed Terraform objects.
//!
//! A resource document mirrors the controller's `Terraform` object:
//!
//! ```text
//! apiVersion: infra.contrib.fluxcd.io/v1alpha1
//! kind: Terraform
//! metadata:
//!   name: helloworld
//!   namespace: flux-system
//!   resourceVersion: "7"
//!   annotations:
//!     reconcile.fluxcd.io/requestedAt: "2026-10-16T09:00:00.000000000Z"
//! spec:
//!   tfstate:
//!     forceUnlock: "yes"
//!     lockIdentifier: f2ab685b-f84d-ac0b-a125-378a22877e8d
//! ```
//!
//! Only the lock-state sub-object and the annotation map are interpreted.
//! Every other field is carried through `extra` maps so a read-modify-write
//! never drops data written by the reconciler.

mod handle;
mod io;

pub use handle::ResourceHandle;

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Annotation whose change asks the reconciler to run immediately.
pub const RECONCILE_REQUEST_ANNOTATION: &str = "reconcile.fluxcd.io/requestedAt";

/// API group/version written when a document omits it.
pub const DEFAULT_API_VERSION: &str = "infra.contrib.fluxcd.io/v1alpha1";

/// Kind written when a document omits it.
pub const DEFAULT_KIND: &str = "Terraform";

/// Desired lock-release behavior.
///
/// `Auto` is a standing policy and is never downgraded by a force-unlock
/// request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ForceUnlockMode {
    /// No unlock requested.
    #[default]
    #[serde(rename = "no")]
    Unset,
    /// Release the lock named by `lockIdentifier` once.
    Yes,
    /// Always release contended locks.
    Auto,
}

impl std::fmt::Display for ForceUnlockMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForceUnlockMode::Unset => write!(f, "no"),
            ForceUnlockMode::Yes => write!(f, "yes"),
            ForceUnlockMode::Auto => write!(f, "auto"),
        }
    }
}

/// The `spec.tfstate` sub-object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockStateSpec {
    #[serde(default)]
    pub force_unlock: ForceUnlockMode,

    /// Opaque token naming the lock instance to release.
    #[serde(default)]
    pub lock_identifier: String,

    /// Fields owned by the reconciler that this tool does not interpret.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl LockStateSpec {
    /// Lock state with the given mode and identifier and no extra fields.
    pub fn new(force_unlock: ForceUnlockMode, lock_identifier: impl Into<String>) -> Self {
        Self {
            force_unlock,
            lock_identifier: lock_identifier.into(),
            extra: BTreeMap::new(),
        }
    }
}

/// Object metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,

    #[serde(default)]
    pub namespace: String,

    /// Version token compared at write time.
    #[serde(
        default,
        deserialize_with = "deserialize_version",
        skip_serializing_if = "Option::is_none"
    )]
    pub resource_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// Resource spec. Only `tfstate` is typed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tfstate: Option<LockStateSpec>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// A Terraform resource as stored in the object store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_kind")]
    pub kind: String,

    pub metadata: ObjectMeta,

    #[serde(default)]
    pub spec: ResourceSpec,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<serde_yaml::Value>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_kind() -> String {
    DEFAULT_KIND.to_string()
}

/// Accept `resourceVersion` written either as a string or as a bare integer.
fn deserialize_version<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Version {
        Text(String),
        Number(u64),
    }

    Ok(Option::<Version>::deserialize(deserializer)?.map(|v| match v {
        Version::Text(s) => s,
        Version::Number(n) => n.to_string(),
    }))
}

impl Resource {
    /// The (namespace, name) pair this document describes.
    pub fn handle(&self) -> ResourceHandle {
        ResourceHandle::new_unchecked(&self.metadata.namespace, &self.metadata.name)
    }

    /// Current lock-state sub-object, if any.
    pub fn lock_state(&self) -> Option<&LockStateSpec> {
        self.spec.tfstate.as_ref()
    }

    /// Current reconcile-trigger value, if any.
    pub fn reconcile_requested_at(&self) -> Option<&str> {
        self.metadata
            .annotations
            .as_ref()
            .and_then(|a| a.get(RECONCILE_REQUEST_ANNOTATION))
            .map(String::as_str)
    }
}
