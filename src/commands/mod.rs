// Command handlers module
// This module contains one handler per CLI subcommand

pub mod create;
pub mod shell;
pub mod exec;
pub mod start;
pub mod stop;
pub mod remove;

// Re-export all command handlers for easy access
pub use create::*;
pub use shell::*;
pub use exec::*;
pub use start::*;
pub use stop::*;
pub use remove::*;
