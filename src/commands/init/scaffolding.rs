//! Directory and file scaffolding for the init command.

use crate::config::Config;
use crate::context::StoreContext;
use crate::error::{Result, UnlockError};
use crate::fs::atomic_write_file;
use std::fs;
use std::path::Path;

/// Entries the store's `.gitignore` must contain.
const GITIGNORE_ENTRIES: &[&str] = &["locks/"];

pub(super) fn create_store_structure(ctx: &StoreContext) -> Result<()> {
    for dir in [&ctx.root, &ctx.resources_dir, &ctx.events_dir, &ctx.locks_dir] {
        create_dir(dir)?;
    }
    Ok(())
}

/// Write `config.yaml` with defaults unless one is already present.
pub(super) fn write_default_config(ctx: &StoreContext) -> Result<()> {
    let config_path = ctx.config_path();
    if config_path.exists() {
        return Ok(());
    }

    let yaml = Config::default().to_yaml()?;
    atomic_write_file(&config_path, &yaml)
}

/// Add any missing entries to the store's `.gitignore`.
pub(super) fn ensure_gitignore(ctx: &StoreContext) -> Result<()> {
    let gitignore_path = ctx.root.join(".gitignore");
    let existing = fs::read_to_string(&gitignore_path).unwrap_or_default();

    let missing: Vec<&str> = GITIGNORE_ENTRIES
        .iter()
        .copied()
        .filter(|entry| !existing.lines().any(|line| line.trim() == *entry))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }

    let mut content = existing;
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    if !content.contains("# Machine-local files") {
        content.push_str("# Machine-local files (never commit)\n");
    }
    for entry in missing {
        content.push_str(entry);
        content.push('\n');
    }
    atomic_write_file(&gitignore_path, &content)
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| {
        UnlockError::UserError(format!(
            "failed to create directory '{}': {}",
            path.display(),
            e
        ))
    })
}
