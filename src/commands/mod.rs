//! Command implementations for tfunlock.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the per-invocation `Session` every store command
//! starts from.

mod force_unlock;
mod init;
mod reconcile;
mod show;
mod store_lock;

use crate::cli::{Cli, Command, GlobalArgs, StoreLockAction};
use crate::config::Config;
use crate::context::{StoreContext, require_initialized_store};
use crate::deadline::CallContext;
use crate::error::Result;
use crate::resource::ResourceHandle;
use crate::store::FileStore;

/// Dispatch a command to its implementation.
pub fn dispatch(cli: Cli) -> Result<()> {
    let globals = cli.globals;
    match cli.command {
        Command::Init => init::cmd_init(&globals),
        Command::ForceUnlock(args) => force_unlock::cmd_force_unlock(&globals, args),
        Command::Reconcile(args) => reconcile::cmd_reconcile(&globals, args),
        Command::Show(args) => show::cmd_show(&globals, args),
        Command::StoreLock(cmd) => match cmd.action {
            StoreLockAction::List => store_lock::cmd_store_lock_list(&globals),
            StoreLockAction::Clear(args) => store_lock::cmd_store_lock_clear(&globals, args),
        },
    }
}

/// An initialized store plus its configuration, resolved once per command.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub ctx: StoreContext,
    pub config: Config,
}

impl Session {
    /// Resolve and load the store named by the global flags.
    pub fn open(globals: &GlobalArgs) -> Result<Self> {
        let ctx = require_initialized_store(globals.store.as_deref())?;
        Self::for_store(ctx)
    }

    /// Load the configuration of an already resolved store.
    pub fn for_store(ctx: StoreContext) -> Result<Self> {
        let config = Config::load_or_default(ctx.config_path())?;
        Ok(Self { ctx, config })
    }

    /// Resolve a resource argument.
    ///
    /// `namespace/name` is taken as is; a bare name is qualified with
    /// `--namespace` or, failing that, the configured namespace.
    pub fn handle(&self, resource: &str, namespace: Option<&str>) -> Result<ResourceHandle> {
        if resource.contains('/') {
            return ResourceHandle::parse_qualified(resource);
        }
        let namespace = namespace.unwrap_or(&self.config.namespace);
        ResourceHandle::new(namespace, resource)
    }

    /// Deadline for this invocation: `--timeout`, else the configured value.
    pub fn call_context(&self, timeout: Option<u64>) -> CallContext {
        CallContext::from_timeout_secs(timeout.unwrap_or(self.config.timeout_seconds))
    }

    pub fn store(&self) -> FileStore {
        FileStore::new(self.ctx.clone(), self.config.lock_stale_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UnlockError;
    use crate::test_support::create_test_store;

    #[test]
    fn test_handle_uses_configured_namespace() {
        let (_temp_dir, ctx) = create_test_store();
        let session = Session::for_store(ctx).unwrap();

        let handle = session.handle("helloworld", None).unwrap();
        assert_eq!(handle.to_string(), "flux-system/helloworld");
    }

    #[test]
    fn test_handle_prefers_namespace_flag() {
        let (_temp_dir, ctx) = create_test_store();
        let session = Session::for_store(ctx).unwrap();

        let handle = session.handle("helloworld", Some("infra")).unwrap();
        assert_eq!(handle.to_string(), "infra/helloworld");
    }

    #[test]
    fn test_handle_accepts_qualified_reference() {
        let (_temp_dir, ctx) = create_test_store();
        let session = Session::for_store(ctx).unwrap();

        let handle = session.handle("infra/helloworld", Some("other")).unwrap();
        assert_eq!(handle.to_string(), "infra/helloworld");
    }

    #[test]
    fn test_handle_rejects_invalid_name() {
        let (_temp_dir, ctx) = create_test_store();
        let session = Session::for_store(ctx).unwrap();

        let err = session.handle("Hello_World", None).unwrap_err();
        assert!(matches!(err, UnlockError::UserError(_)));
    }

    #[test]
    fn test_session_reads_config_file() {
        let (_temp_dir, ctx) = create_test_store();
        std::fs::write(ctx.config_path(), "namespace: infra\ntimeout_seconds: 0\n").unwrap();

        let session = Session::for_store(ctx).unwrap();
        assert_eq!(session.config.namespace, "infra");
        assert!(session.call_context(None).remaining().is_none());
        assert!(session.call_context(Some(5)).remaining().is_some());
    }

    #[test]
    fn test_open_uninitialized_store_is_user_error() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let globals = GlobalArgs {
            store: Some(temp_dir.path().join("missing")),
            ..GlobalArgs::default()
        };

        let err = Session::open(&globals).unwrap_err();
        assert!(matches!(err, UnlockError::UserError(_)));
    }
}
