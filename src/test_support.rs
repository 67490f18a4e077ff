use crate::context::StoreContext;
use crate::resource::{Resource, ResourceHandle};
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// A resource with no lock state and no annotations.
pub(crate) const HELLOWORLD: &str = r#"
apiVersion: infra.contrib.fluxcd.io/v1alpha2
kind: Terraform
metadata:
  name: helloworld
  namespace: flux-system
  resourceVersion: "1"
spec:
  interval: 1m
  path: ./terraform
"#;

/// Create an initialized store layout under a fresh temp directory.
pub(crate) fn create_test_store() -> (TempDir, StoreContext) {
    let temp_dir = TempDir::new().unwrap();
    let ctx = StoreContext::at(temp_dir.path().join(".tfunlock"));
    for dir in [&ctx.resources_dir, &ctx.locks_dir, &ctx.events_dir] {
        std::fs::create_dir_all(dir).unwrap();
    }
    (temp_dir, ctx)
}

/// Write a resource document into the store at the path its metadata names.
pub(crate) fn seed_resource(ctx: &StoreContext, yaml: &str) -> ResourceHandle {
    let handle = Resource::from_yaml(yaml).unwrap().handle();
    let path = ctx.resource_path(&handle);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, yaml).unwrap();
    handle
}

/// Read a resource document straight from disk.
pub(crate) fn read_resource(ctx: &StoreContext, handle: &ResourceHandle) -> Resource {
    Resource::from_yaml(&std::fs::read_to_string(ctx.resource_path(handle)).unwrap()).unwrap()
}
