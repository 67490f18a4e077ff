//! Implementation of the `tfunlock init` command.
//!
//! # What `tfunlock init` does
//!
//! 1. Resolves the store (`--store`, an existing ancestor `.tfunlock/`, or
//!    `./.tfunlock/`)
//! 2. Creates `resources/`, `locks/` and `events/`
//! 3. Creates a `config.yaml` template (if missing)
//! 4. Creates `.gitignore` with a `locks/` entry
//!
//! The command is idempotent: an existing store is left as it is.

mod scaffolding;


use crate::cli::GlobalArgs;
use crate::context::StoreContext;
use crate::error::Result;
use crate::events::{Event, EventAction, record_event};
use serde_json::json;

use scaffolding::*;

/// Execute the `tfunlock init` command.
pub fn cmd_init(globals: &GlobalArgs) -> Result<()> {
    let ctx = StoreContext::resolve(globals.store.as_deref())?;
    let created = init_store(&ctx)?;

    if !created {
        println!("tfunlock store already initialized at {}", ctx.root.display());
        return Ok(());
    }

    let event = Event::new(EventAction::Init).with_details(json!({
        "store": ctx.root.display().to_string(),
    }));
    record_event(&ctx, &event);

    println!("Initialized tfunlock store.");
    println!();
    println!("Store:     {}", ctx.root.display());
    println!("Config:    {}", ctx.config_path().display());
    println!();
    println!("Created directories:");
    println!("  resources/");
    println!("  events/");
    println!("  locks/  (untracked)");
    println!();
    println!("Place resource documents at resources/<namespace>/<name>.yaml.");

    Ok(())
}

/// Create the store layout. Returns `true` if the store did not exist before.
pub(crate) fn init_store(ctx: &StoreContext) -> Result<bool> {
    let existed = ctx.exists();

    create_store_structure(ctx)?;
    write_default_config(ctx)?;
    ensure_gitignore(ctx)?;

    Ok(!existed)
}
