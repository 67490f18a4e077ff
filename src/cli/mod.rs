//! CLI argument parsing for tfunlock.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// tfunlock: request a force-unlock of a Terraform state lock held by a
/// GitOps-managed Terraform resource.
///
/// The tool never touches the state backend. It records the lock to release
/// on the resource and asks the reconciler to act on it.
#[derive(Parser, Debug)]
#[command(name = "tfunlock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub globals: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags accepted by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Namespace of the resource (default: `namespace` from config.yaml).
    #[arg(short, long, global = true)]
    pub namespace: Option<String>,

    /// Store directory to use instead of discovering `.tfunlock/`.
    #[arg(long, global = true, value_name = "DIR")]
    pub store: Option<PathBuf>,

    /// Overall deadline in seconds; 0 disables it (default: from config.yaml).
    #[arg(long, global = true, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

/// Available commands for tfunlock.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a store in the current directory.
    ///
    /// Creates `.tfunlock/` with its resources, locks and events
    /// directories and a default `config.yaml`.
    Init,

    /// Force-unlock a Terraform state lock and request reconciliation.
    ///
    /// Records the lock identifier on the resource, marks the lock for
    /// release, and stamps the reconcile trigger. An `auto` force-unlock
    /// mode is preserved.
    ForceUnlock(ForceUnlockArgs),

    /// Request reconciliation without changing the lock state.
    Reconcile(ResourceArgs),

    /// Show the lock state and reconcile trigger of a resource.
    Show(ResourceArgs),

    /// Store write lock management.
    ///
    /// List or clear the per-resource locks that serialize store writes.
    StoreLock(StoreLockCommand),
}

/// Arguments for the `force-unlock` command.
#[derive(Parser, Debug)]
pub struct ForceUnlockArgs {
    /// Resource name, or `namespace/name`.
    pub resource: String,

    /// Identifier of the lock to release (as reported by Terraform).
    pub lock_id: String,
}

/// A single resource argument.
#[derive(Parser, Debug)]
pub struct ResourceArgs {
    /// Resource name, or `namespace/name`.
    pub resource: String,
}

/// Arguments for the `store-lock` command.
#[derive(Parser, Debug)]
pub struct StoreLockCommand {
    #[command(subcommand)]
    pub action: StoreLockAction,
}

/// Store lock subcommands.
#[derive(Subcommand, Debug)]
pub enum StoreLockAction {
    /// List all store write locks.
    List,

    /// Clear a store write lock.
    ///
    /// Only use this for locks left behind by a crashed process.
    Clear(StoreLockClearArgs),
}

/// Arguments for `store-lock clear`.
#[derive(Parser, Debug)]
pub struct StoreLockClearArgs {
    /// Resource whose lock to clear, as `namespace/name`.
    pub resource: String,

    /// Required to actually clear the lock.
    #[arg(long)]
    pub force: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
