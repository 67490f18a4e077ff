//! Store location resolution for tfunlock.
//!
//! Every command operates on a file-backed object store rooted at a
//! `.tfunlock/` directory. The root is either given explicitly (`--store`) or
//! found by walking up from the current working directory, so the tool works
//! from any subdirectory of the project that owns the store.

use crate::error::{Result, UnlockError};
use crate::resource::ResourceHandle;
use std::env;
use std::path::{Path, PathBuf};

/// Name of the store directory searched for in ancestor directories.
pub const STORE_DIR_NAME: &str = ".tfunlock";

/// Resolved store paths. All paths derive from `root`.
#[derive(Debug, Clone)]
pub struct StoreContext {
    /// Store root (default: `{project}/.tfunlock/`).
    pub root: PathBuf,

    /// Resource documents: `{root}/resources/{namespace}/{name}.yaml`.
    pub resources_dir: PathBuf,

    /// Per-resource write locks: `{root}/locks/`.
    pub locks_dir: PathBuf,

    /// Audit log directory: `{root}/events/`.
    pub events_dir: PathBuf,
}

impl StoreContext {
    /// Build a context for a store rooted at `root`.
    pub fn at<P: Into<PathBuf>>(root: P) -> Self {
        let root = root.into();
        Self {
            resources_dir: root.join("resources"),
            locks_dir: root.join("locks"),
            events_dir: root.join("events"),
            root,
        }
    }

    /// Resolve the store from an explicit override or by discovery from the
    /// current working directory.
    ///
    /// Discovery falls back to `{cwd}/.tfunlock` when no ancestor holds a
    /// store; `ensure_initialized` reports that case.
    pub fn resolve(store_override: Option<&Path>) -> Result<Self> {
        if let Some(root) = store_override {
            return Ok(Self::at(root));
        }

        let cwd = env::current_dir().map_err(|e| {
            UnlockError::UserError(format!("failed to get current working directory: {}", e))
        })?;

        Ok(Self::discover_from(&cwd).unwrap_or_else(|| Self::at(cwd.join(STORE_DIR_NAME))))
    }

    /// Find the nearest `.tfunlock/` directory at or above `start`.
    pub fn discover_from(start: &Path) -> Option<Self> {
        start
            .ancestors()
            .map(|dir| dir.join(STORE_DIR_NAME))
            .find(|candidate| candidate.is_dir())
            .map(Self::at)
    }

    /// Check if the store layout exists.
    pub fn exists(&self) -> bool {
        self.root.is_dir() && self.resources_dir.is_dir()
    }

    /// Ensure the store is initialized, returning a helpful error if not.
    pub fn ensure_initialized(&self) -> Result<()> {
        if !self.exists() {
            return Err(UnlockError::UserError(format!(
                "tfunlock store not initialized.\n\
                 Expected store at: {}\n\n\
                 Run `tfunlock init` or pass `--store <dir>`.",
                self.root.display()
            )));
        }
        Ok(())
    }

    /// Get the path to the config file.
    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.yaml")
    }

    /// Get the path to the audit log.
    pub fn events_file(&self) -> PathBuf {
        self.events_dir.join("events.ndjson")
    }

    /// Get the path to a resource document.
    pub fn resource_path(&self, handle: &ResourceHandle) -> PathBuf {
        self.resources_dir
            .join(&handle.namespace)
            .join(format!("{}.yaml", handle.name))
    }

    /// Get the path to a resource's write lock.
    ///
    /// `_` cannot appear in validated names, so the file name is unambiguous.
    pub fn lock_path(&self, handle: &ResourceHandle) -> PathBuf {
        self.locks_dir
            .join(format!("{}_{}.lock", handle.namespace, handle.name))
    }
}

/// Resolve the store and ensure it is initialized.
///
/// Use this in every command except `init`.
pub fn require_initialized_store(store_override: Option<&Path>) -> Result<StoreContext> {
    let ctx = StoreContext::resolve(store_override)?;
    ctx.ensure_initialized()?;
    Ok(ctx)
}
