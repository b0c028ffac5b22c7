//! Multi-step instance creation.

use std::fs;
use std::path::PathBuf;

use crate::config::{post_create_commands, Shell, ShellTemplates};
use crate::error::{Error, Result};
use crate::lxd::{ContainerManager, LaunchRequest};
use crate::naming::{self, SuffixSource};
use crate::series::Series;
use crate::session::{exec, Workspace};

/// What to build and how to provision it.
#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub series: Series,
    /// Explicit instance name; derived from the workspace when `None`.
    pub name: Option<String>,
    /// Launch config file, explicit or discovered.
    pub config: Option<PathBuf>,
    pub profile: Option<String>,
    /// Requested login shell; picks a built-in template when no config
    /// file is in play.
    pub shell: Option<Shell>,
}

impl CreateRequest {
    pub fn new(series: Series) -> Self {
        Self {
            series,
            name: None,
            config: None,
            profile: None,
            shell: None,
        }
    }
}

/// Create and provision an instance, returning its name.
///
/// Aborts before launching when the name is already taken. After a
/// successful launch the instance is left running with the workspace
/// mounted at [`Workspace::container_path`]. Post-create hook commands are
/// best-effort: a failing command is reported and the rest still run, and
/// nothing ever rolls the creation back.
pub async fn create_instance(
    manager: &dyn ContainerManager,
    templates: &ShellTemplates,
    suffixes: &mut dyn SuffixSource,
    workspace: &Workspace,
    request: CreateRequest,
) -> Result<String> {
    let name = match request.name {
        Some(name) => name,
        None => {
            naming::resolve_new(manager, suffixes, &workspace.project, request.series).await?
        }
    };

    // Any info answer at all means the name is taken.
    if manager.info(&name).await?.is_some() {
        return Err(Error::InstanceExists(name));
    }

    // A config file is read exactly once; the same bytes feed the launch
    // and, after the mount, the post-create hook.
    let mut hook_bytes = None;
    let config_bytes = match &request.config {
        Some(path) => {
            println!("Using config {}", path.display());
            match fs::read(path) {
                Ok(bytes) => {
                    hook_bytes = Some(bytes.clone());
                    Some(bytes)
                }
                Err(err) => {
                    eprintln!(
                        "ERROR: Could not read config from {}: {err}",
                        path.display()
                    );
                    None
                }
            }
        }
        None => request.shell.and_then(|shell| {
            let template = templates.get(shell)?;
            log::debug!("using built-in {} template", shell.binary());
            Some(template.to_vec())
        }),
    };

    let uid = unsafe { libc::getuid() };
    manager
        .launch(&LaunchRequest {
            image: request.series.image(),
            name: name.clone(),
            idmap_uid: uid,
            profile: request.profile.clone(),
            config: config_bytes,
        })
        .await?;

    println!(
        "Waiting for {name} to complete initialization and package installation \
         (this might take a while)"
    );
    manager.wait_init(&name).await?;

    let device = format!("{name}-src");
    let target = workspace.container_path();
    if let Err(err) = manager
        .add_disk_device(&name, &device, &workspace.source_dir, &target)
        .await
    {
        // The instance exists but has no source tree; say so instead of
        // leaving a half-configured instance silently behind.
        eprintln!(
            "ERROR: Could not mount {} at {target} in {name}",
            workspace.source_dir.display()
        );
        return Err(err);
    }

    if let (Some(path), Some(bytes)) = (&request.config, &hook_bytes) {
        if let Some(commands) = post_create_commands(bytes, path) {
            run_hook(manager, workspace, &name, &commands).await?;
        }
    }

    Ok(name)
}

/// Run hook commands in order; each one's outcome is reported as it
/// finishes.
async fn run_hook(
    manager: &dyn ContainerManager,
    workspace: &Workspace,
    name: &str,
    commands: &[String],
) -> Result<()> {
    for command in commands {
        println!("Executing: {command}");
        exec::exec_in_instance(manager, workspace, name, command, &[]).await?;
    }
    Ok(())
}
