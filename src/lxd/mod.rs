//! Container manager client, backed by the `lxc` command-line tool.
//!
//! Everything this tool knows about instances goes through the
//! [`ContainerManager`] trait. The real implementation, [`LxdClient`],
//! shells out to `lxc` so that remotes, authentication, and terminal
//! handling stay the manager's problem. Queries run with captured output;
//! session and provisioning commands inherit the operator's terminal so
//! progress and interactive I/O are visible as they happen.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output, Stdio};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::{Error, Result};

pub mod status;

/// Marker LXD prints on stderr when an instance does not exist.
const NOT_FOUND_MARKER: &str = "Instance not found";

/// Parameters for launching a new instance.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRequest {
    /// Image reference, e.g. `ubuntu:jammy`.
    pub image: String,
    pub name: String,
    /// Host uid mapped onto the image's default user.
    pub idmap_uid: u32,
    pub profile: Option<String>,
    /// Raw launch-config document fed to the manager on stdin.
    pub config: Option<Vec<u8>>,
}

/// Parameters for running a process inside an instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecRequest {
    pub user: u32,
    pub group: u32,
    pub cwd: String,
    /// Environment assignments, applied in order.
    pub env: Vec<(String, String)>,
    pub argv: Vec<String>,
}

/// Operations this tool needs from the container manager.
///
/// The manager is the source of truth for instance existence and status;
/// none of these answers are cached anywhere. Tests substitute an
/// in-memory fake for the subprocess-backed client.
#[async_trait]
pub trait ContainerManager: Send + Sync {
    /// Raw info text for `name`, or `None` when the instance does not exist.
    async fn info(&self, name: &str) -> Result<Option<String>>;

    /// Names of instances, across all projects, containing `filter`.
    async fn list(&self, filter: &str) -> Result<Vec<String>>;

    /// Create and start a new instance.
    async fn launch(&self, request: &LaunchRequest) -> Result<()>;

    /// Block until the instance's first-boot provisioning finishes.
    async fn wait_init(&self, name: &str) -> Result<()>;

    /// Attach a host directory to the instance as a disk device.
    async fn add_disk_device(
        &self,
        name: &str,
        device: &str,
        source: &Path,
        target: &str,
    ) -> Result<()>;

    async fn start(&self, name: &str) -> Result<()>;

    async fn stop(&self, name: &str) -> Result<()>;

    /// Delete the instance, stopping it first if necessary.
    async fn delete_force(&self, name: &str) -> Result<()>;

    /// Run a process attached to the operator's terminal; returns its exit
    /// code.
    async fn exec(&self, name: &str, request: &ExecRequest) -> Result<i32>;
}

/// [`ContainerManager`] implementation that invokes the `lxc` binary.
#[derive(Debug, Clone)]
pub struct LxdClient {
    binary: PathBuf,
}

impl LxdClient {
    pub fn new() -> Self {
        Self::with_binary("lxc")
    }

    /// Use a specific client binary instead of the `lxc` on `PATH`.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// The full command line, for diagnostics.
    fn command_line(&self, args: &[String]) -> String {
        let mut line = self.binary.display().to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    fn invocation_error(&self, args: &[String], source: io::Error) -> Error {
        Error::ManagerInvocation {
            command: self.command_line(args),
            source,
        }
    }

    fn failure(&self, args: &[String], detail: impl Into<String>) -> Error {
        Error::ManagerFailure {
            command: self.command_line(args),
            detail: detail.into(),
        }
    }

    /// Run the client with stdio inherited from the operator's terminal.
    async fn run(&self, args: &[String]) -> Result<ExitStatus> {
        log::debug!("running {}", self.command_line(args));
        Command::new(&self.binary)
            .args(args)
            .status()
            .await
            .map_err(|source| self.invocation_error(args, source))
    }

    /// Run the client with captured output, for queries.
    async fn run_captured(&self, args: &[String]) -> Result<Output> {
        log::debug!("running {} (captured)", self.command_line(args));
        Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| self.invocation_error(args, source))
    }

    /// Run the client feeding `input` on its stdin, terminal otherwise
    /// inherited.
    async fn run_with_stdin(&self, args: &[String], input: &[u8]) -> Result<ExitStatus> {
        log::debug!(
            "running {} ({} bytes on stdin)",
            self.command_line(args),
            input.len()
        );
        let mut child = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|source| self.invocation_error(args, source))?;
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(err) = stdin.write_all(input).await {
                // A closed pipe means the client already rejected the
                // command; its exit status carries the real diagnostic.
                if err.kind() == io::ErrorKind::BrokenPipe {
                    log::debug!("stdin closed early: {err}");
                } else {
                    return Err(Error::Io(err));
                }
            }
        }
        child
            .wait()
            .await
            .map_err(|source| self.invocation_error(args, source))
    }
}

impl Default for LxdClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContainerManager for LxdClient {
    async fn info(&self, name: &str) -> Result<Option<String>> {
        let args = vec!["info".to_string(), name.to_string()];
        let output = self.run_captured(&args).await?;
        if output.status.success() {
            return Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()));
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains(NOT_FOUND_MARKER) {
            return Ok(None);
        }
        Err(self.failure(&args, stderr.trim().to_string()))
    }

    async fn list(&self, filter: &str) -> Result<Vec<String>> {
        // "-c n" keeps only the name column, "-f csv" prints one bare name
        // per row, so the output needs no further parsing.
        let args = vec![
            "list".to_string(),
            "--all-projects".to_string(),
            "-c".to_string(),
            "n".to_string(),
            "-f".to_string(),
            "csv".to_string(),
            filter.to_string(),
        ];
        let output = self.run_captured(&args).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.failure(&args, stderr.trim().to_string()));
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn launch(&self, request: &LaunchRequest) -> Result<()> {
        let mut args = vec![
            "launch".to_string(),
            request.image.clone(),
            request.name.clone(),
            "--config".to_string(),
            // 1000 is the image's default user inside the container.
            format!("raw.idmap=both {} 1000", request.idmap_uid),
        ];
        if let Some(profile) = &request.profile {
            args.push("--profile".to_string());
            args.push(profile.clone());
        }
        let status = match &request.config {
            Some(config) => self.run_with_stdin(&args, config).await?,
            None => self.run(&args).await?,
        };
        if status.success() {
            Ok(())
        } else {
            Err(self.failure(&args, status.to_string()))
        }
    }

    async fn wait_init(&self, name: &str) -> Result<()> {
        let args = vec![
            "exec".to_string(),
            name.to_string(),
            "--".to_string(),
            "cloud-init".to_string(),
            "status".to_string(),
            "--wait".to_string(),
        ];
        let status = self.run(&args).await?;
        if !status.success() {
            // cloud-init reports its own trouble on the terminal; the
            // instance is still usable enough to mount and inspect.
            log::warn!("cloud-init wait for {name} exited with {status}");
        }
        Ok(())
    }

    async fn add_disk_device(
        &self,
        name: &str,
        device: &str,
        source: &Path,
        target: &str,
    ) -> Result<()> {
        let args = vec![
            "config".to_string(),
            "device".to_string(),
            "add".to_string(),
            name.to_string(),
            device.to_string(),
            "disk".to_string(),
            format!("source={}", source.display()),
            format!("path={target}"),
        ];
        let status = self.run(&args).await?;
        if status.success() {
            Ok(())
        } else {
            Err(self.failure(&args, status.to_string()))
        }
    }

    async fn start(&self, name: &str) -> Result<()> {
        let args = vec!["start".to_string(), name.to_string()];
        let status = self.run(&args).await?;
        if !status.success() {
            log::warn!("lxc start {name} exited with {status}");
        }
        Ok(())
    }

    async fn stop(&self, name: &str) -> Result<()> {
        let args = vec!["stop".to_string(), name.to_string()];
        let status = self.run(&args).await?;
        if !status.success() {
            // Stopping an already-stopped instance lands here; the client
            // has printed its complaint already.
            log::debug!("lxc stop {name} exited with {status}");
        }
        Ok(())
    }

    async fn delete_force(&self, name: &str) -> Result<()> {
        let args = vec![
            "delete".to_string(),
            "--force".to_string(),
            name.to_string(),
        ];
        let status = self.run(&args).await?;
        if status.success() {
            Ok(())
        } else {
            Err(self.failure(&args, status.to_string()))
        }
    }

    async fn exec(&self, name: &str, request: &ExecRequest) -> Result<i32> {
        let mut args = vec![
            "exec".to_string(),
            "--user".to_string(),
            request.user.to_string(),
            "--group".to_string(),
            request.group.to_string(),
            "--cwd".to_string(),
            request.cwd.clone(),
        ];
        for (key, value) in &request.env {
            args.push("--env".to_string());
            args.push(format!("{key}={value}"));
        }
        args.push(name.to_string());
        args.push("--".to_string());
        args.extend(request.argv.iter().cloned());
        let status = self.run(&args).await?;
        // Treat signal deaths as a plain failure code.
        Ok(status.code().unwrap_or(-1))
    }
}
