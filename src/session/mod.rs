//! Session orchestration: creating instances, running work in them, and
//! winding them down.
//!
//! Every orchestrator here runs strictly sequentially and re-queries the
//! manager before acting, so concurrent invocations degrade to ordinary
//! manager errors instead of corrupting anything.

pub mod create;
pub mod exec;
pub mod lifecycle;

use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Default user inside Ubuntu images.
pub const CONTAINER_USER: &str = "ubuntu";
pub const CONTAINER_UID: u32 = 1000;
pub const CONTAINER_GID: u32 = 1000;
pub const CONTAINER_HOME: &str = "/home/ubuntu";

/// The project directory a session operates on.
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Base name of the source directory; instance names derive from it.
    pub project: String,
    /// Host path bind-mounted into instances.
    pub source_dir: PathBuf,
}

impl Workspace {
    /// Workspace for the invoking working directory.
    pub fn current() -> Result<Self> {
        let source_dir = env::current_dir()?;
        let project = source_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or(Error::ProjectName)?;
        Ok(Self {
            project,
            source_dir,
        })
    }

    /// In-container path the project is mounted at.
    pub fn container_path(&self) -> String {
        format!("{CONTAINER_HOME}/{}", self.project)
    }
}
