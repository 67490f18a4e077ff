//! Implementation of the `tfunlock show` command.
//!
//! Displays the lock state and reconcile trigger of one resource.

use super::Session;
use crate::cli::{GlobalArgs, ResourceArgs};
use crate::error::Result;
use crate::resource::Resource;
use crate::store::ObjectStore;
use std::fmt::Write;

/// Execute the `tfunlock show` command.
pub fn cmd_show(globals: &GlobalArgs, args: ResourceArgs) -> Result<()> {
    let session = Session::open(globals)?;
    let handle = session.handle(&args.resource, globals.namespace.as_deref())?;
    let cx = session.call_context(globals.timeout);

    let resource = session.store().get(&handle, &cx)?;
    print!("{}", render_resource(&resource));
    Ok(())
}

/// Human-readable summary of a resource.
pub(crate) fn render_resource(resource: &Resource) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{} [{}]", resource.handle(), resource.kind);
    let _ = writeln!(out, "API version:      {}", resource.api_version);
    let _ = writeln!(
        out,
        "Resource version: {}",
        resource.metadata.resource_version.as_deref().unwrap_or("-")
    );
    let _ = writeln!(out);

    match resource.lock_state() {
        Some(lock_state) => {
            let _ = writeln!(out, "Force unlock:     {}", lock_state.force_unlock);
            let lock_id = if lock_state.lock_identifier.is_empty() {
                "-"
            } else {
                lock_state.lock_identifier.as_str()
            };
            let _ = writeln!(out, "Lock identifier:  {}", lock_id);
        }
        None => {
            let _ = writeln!(out, "Force unlock:     (no lock state recorded)");
        }
    }

    let _ = writeln!(
        out,
        "Reconcile requested at: {}",
        resource.reconcile_requested_at().unwrap_or("never")
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_unlocked_resource() {
        let resource = Resource::from_yaml(crate::test_support::HELLOWORLD).unwrap();
        let rendered = render_resource(&resource);

        assert!(rendered.starts_with("flux-system/helloworld [Terraform]\n"));
        assert!(rendered.contains("Resource version: 1\n"));
        assert!(rendered.contains("(no lock state recorded)"));
        assert!(rendered.contains("Reconcile requested at: never\n"));
    }

    #[test]
    fn test_render_locked_resource() {
        let resource = Resource::from_yaml(
            r#"
metadata:
  name: helloworld
  namespace: flux-system
  annotations:
    reconcile.fluxcd.io/requestedAt: "2026-10-16T09:00:00.000000000Z"
spec:
  tfstate:
    forceUnlock: "yes"
    lockIdentifier: f2ab685b
"#,
        )
        .unwrap();
        let rendered = render_resource(&resource);

        assert!(rendered.contains("Resource version: -\n"));
        assert!(rendered.contains("Force unlock:     yes\n"));
        assert!(rendered.contains("Lock identifier:  f2ab685b\n"));
        assert!(rendered.contains("Reconcile requested at: 2026-10-16T09:00:00.000000000Z\n"));
    }
}
