//! Command-line definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Shell;
use crate::series::Series;

#[derive(Debug, Parser)]
#[command(
    name = "lxdev",
    about = "Create, shell into, and remove developer containers",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a container using the given Ubuntu series as a base
    Create(CreateArgs),
    /// Open a login shell in the given series's container
    Shell(ShellArgs),
    /// Execute an arbitrary command in the given series's container
    Exec(ExecArgs),
    /// Start the given series's container
    Start(SeriesArgs),
    /// Stop the given series's container
    Stop(SeriesArgs),
    /// Remove a container identified by Ubuntu series
    Remove(SeriesArgs),
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// The Ubuntu series used as the base for the container
    #[arg(value_enum)]
    pub series: Series,

    /// Path to an instance config to apply at launch
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Name of a profile to apply to the instance
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Login shell to install and set for the container user
    #[arg(long, value_enum)]
    pub shell: Option<Shell>,
}

#[derive(Debug, Args)]
pub struct ShellArgs {
    /// The Ubuntu series used as the base for the container
    #[arg(value_enum)]
    pub series: Series,

    /// Shell to attach instead of bash
    #[arg(long, value_enum)]
    pub shell: Option<Shell>,

    /// Stop the container after the shell exits
    #[arg(long)]
    pub stop_after: bool,
}

#[derive(Debug, Args)]
pub struct ExecArgs {
    /// The Ubuntu series used as the base for the container
    #[arg(value_enum)]
    pub series: Series,

    /// Command to run inside the container
    pub command: String,

    /// Extra KEY=VALUE environment for the command (repeatable)
    #[arg(long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    /// Run in a throwaway container that is removed afterwards
    #[arg(long)]
    pub ephemeral: bool,

    /// Stop the container after the command finishes
    #[arg(long)]
    pub stop_after: bool,
}

#[derive(Debug, Args)]
pub struct SeriesArgs {
    /// The Ubuntu series used as the base for the container
    #[arg(value_enum)]
    pub series: Series,
}
