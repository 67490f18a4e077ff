//! Resource identity and name validation.

use crate::error::{Result, UnlockError};
use regex::Regex;
use std::sync::LazyLock;

/// DNS-1123 subdomain: lowercase alphanumerics, '-' and '.', alphanumeric at both ends.
static DNS_SUBDOMAIN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
        .expect("Invalid DNS subdomain regex")
});

const MAX_NAME_LEN: usize = 253;

/// Identifies a resource by (namespace, name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceHandle {
    pub namespace: String,
    pub name: String,
}

impl ResourceHandle {
    /// Create a handle, validating both parts.
    ///
    /// Validated names are safe to use as path components in the file store.
    pub fn new(namespace: &str, name: &str) -> Result<Self> {
        validate_name("namespace", namespace)?;
        validate_name("resource name", name)?;
        Ok(Self::new_unchecked(namespace, name))
    }

    pub(crate) fn new_unchecked(namespace: &str, name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }

    /// Parse a `namespace/name` string.
    pub fn parse_qualified(qualified: &str) -> Result<Self> {
        let (namespace, name) = qualified.split_once('/').ok_or_else(|| {
            UnlockError::UserError(format!(
                "invalid resource reference '{}': expected <namespace>/<name>",
                qualified
            ))
        })?;
        Self::new(namespace, name)
    }
}

impl std::fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

fn validate_name(what: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(UnlockError::UserError(format!("{} must not be empty", what)));
    }

    if value.len() > MAX_NAME_LEN {
        return Err(UnlockError::UserError(format!(
            "{} '{}' is longer than {} characters",
            what, value, MAX_NAME_LEN
        )));
    }

    if !DNS_SUBDOMAIN_REGEX.is_match(value) {
        return Err(UnlockError::UserError(format!(
            "invalid {} '{}': must consist of lowercase alphanumeric characters, '-' or '.', \
             and must start and end with an alphanumeric character",
            what, value
        )));
    }

    Ok(())
}
