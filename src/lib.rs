//! Per-project development containers on top of a system container
//! manager.
//!
//! Each project directory gets its own named instances, one per Ubuntu
//! series, with the project tree bind-mounted inside. The crate is split
//! along seams that tests exercise independently: [`lxd`] talks to the
//! manager, [`naming`] decides which instance an invocation means,
//! [`session`] orchestrates creation and sessions, and [`commands`] glues
//! the CLI onto all of it.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod lxd;
pub mod naming;
pub mod series;
pub mod session;

pub use config::{Shell, ShellTemplates};
pub use error::{Error, Result};
pub use lxd::status::InstanceStatus;
pub use lxd::{ContainerManager, ExecRequest, LaunchRequest, LxdClient};
pub use naming::{PromptLines, RandomSuffixes, StdinPrompt, SuffixSource};
pub use series::Series;
pub use session::Workspace;
