//! YAML serialization for resource documents.

use super::Resource;
use crate::error::{Result, UnlockError};

impl Resource {
    /// Parse a resource document.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| UnlockError::Store(format!("failed to parse resource YAML: {}", e)))
    }

    /// Serialize to a YAML document.
    #[cfg(test)]
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| UnlockError::Store(format!("failed to serialize resource: {}", e)))
    }

    /// Convert to a JSON value, the shape merge patches are computed on.
    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| {
            UnlockError::Store(format!(
                "failed to convert resource '{}' to JSON: {}",
                self.handle(),
                e
            ))
        })
    }

    /// Build a resource from a JSON value.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| UnlockError::Store(format!("failed to decode resource: {}", e)))
    }
}
