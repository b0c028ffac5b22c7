//! Idempotent start, stop, and remove built on observed status.

use crate::error::Result;
use crate::lxd::status::{instance_status, InstanceStatus};
use crate::lxd::ContainerManager;

/// Start `name` when it is observed stopped.
///
/// `Running` is a no-op. `Nonexistent` and `Unknown` are also left alone;
/// whether those are a problem is the caller's decision, not this one's.
pub async fn ensure_running(manager: &dyn ContainerManager, name: &str) -> Result<()> {
    if instance_status(manager, name).await? == InstanceStatus::Stopped {
        println!("Starting {name}");
        manager.start(name).await?;
    }
    Ok(())
}

/// Stop `name`. Stopping an already-stopped instance is not special; the
/// manager treats that as a no-op worth only a diagnostic.
pub async fn stop_instance(manager: &dyn ContainerManager, name: &str) -> Result<()> {
    manager.stop(name).await
}

/// Force-delete `name`, reporting failure without raising.
///
/// The instance may already be gone or mid-transition; the manager's own
/// output carries the detail, so the operator just gets told the removal
/// did not happen.
pub async fn remove_instance(manager: &dyn ContainerManager, name: &str) {
    match manager.delete_force(name).await {
        Ok(()) => println!("Removed instance {name}"),
        Err(err) => {
            log::debug!("delete of {name} failed: {err}");
            eprintln!("Unable to remove instance {name}");
        }
    }
}
