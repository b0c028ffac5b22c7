//! Instance status queries.

use crate::error::Result;
use crate::lxd::ContainerManager;

/// Observed power state of an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceStatus {
    Nonexistent,
    Stopped,
    Running,
    Unknown,
}

/// Ask the container manager for the current status of `name`.
///
/// A not-found answer becomes `Nonexistent`; any other query failure
/// propagates, since it points at an environment problem rather than a
/// lifecycle state. Nothing is cached: every call re-queries the manager.
pub async fn instance_status(manager: &dyn ContainerManager, name: &str) -> Result<InstanceStatus> {
    match manager.info(name).await? {
        None => Ok(InstanceStatus::Nonexistent),
        Some(text) => Ok(parse_status(&text)),
    }
}

/// Extract the `Status:` field from the manager's info text.
///
/// The text is a flat `key: value` listing. Unrecognized status values map
/// to `Unknown` rather than failing, because callers only ever decide
/// "is it stopped" and "does it exist".
pub fn parse_status(info: &str) -> InstanceStatus {
    for line in info.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        if key.trim() == "Status" {
            let value = value.trim();
            if value.eq_ignore_ascii_case("running") {
                return InstanceStatus::Running;
            }
            if value.eq_ignore_ascii_case("stopped") {
                return InstanceStatus::Stopped;
            }
            return InstanceStatus::Unknown;
        }
    }
    InstanceStatus::Unknown
}
