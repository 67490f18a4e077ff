//! Config loading, validation, and serialization.

use super::model::Config;
use crate::error::{Result, UnlockError};
use crate::resource::ResourceHandle;
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            UnlockError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load config if the file exists, otherwise use defaults.
    ///
    /// A file that exists but fails to parse or validate is an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| UnlockError::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            UnlockError::UserError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values.
    ///
    /// Validation rules:
    /// - `namespace` must be a valid resource namespace
    /// - `lock_stale_minutes` must be positive
    /// - `retry.steps` must be positive
    /// - `retry.factor` must be at least 1.0
    pub fn validate(&self) -> Result<()> {
        ResourceHandle::new(&self.namespace, "probe").map_err(|e| {
            UnlockError::UserError(format!("config validation failed: {}", e))
        })?;

        if self.lock_stale_minutes == 0 {
            return Err(UnlockError::UserError(
                "config validation failed: lock_stale_minutes must be greater than 0".to_string(),
            ));
        }

        if self.retry.steps == 0 {
            return Err(UnlockError::UserError(
                "config validation failed: retry.steps must be greater than 0".to_string(),
            ));
        }

        if self.retry.factor.is_nan() || self.retry.factor < 1.0 {
            return Err(UnlockError::UserError(format!(
                "config validation failed: retry.factor must be at least 1.0 (found {})",
                self.retry.factor
            )));
        }

        Ok(())
    }
}
