//! Interactive and one-shot sessions inside an instance.
//!
//! All sessions run as the image's default user with the workspace mount
//! as working directory, whether they came from the shell command, a
//! one-off exec, or the post-create hook.

use crate::config::{Shell, ShellTemplates};
use crate::error::Result;
use crate::lxd::{ContainerManager, ExecRequest};
use crate::naming::{self, PromptLines, SuffixSource};
use crate::series::Series;
use crate::session::create::{create_instance, CreateRequest};
use crate::session::lifecycle::{ensure_running, remove_instance, stop_instance};
use crate::session::{Workspace, CONTAINER_GID, CONTAINER_HOME, CONTAINER_UID, CONTAINER_USER};

/// Attach an interactive shell to the project's instance.
///
/// The shell's own exit code is ignored; leaving a shell with a nonzero
/// status is not a tool failure.
pub async fn interactive_shell(
    manager: &dyn ContainerManager,
    prompt: &mut dyn PromptLines,
    workspace: &Workspace,
    series: Series,
    shell: Shell,
    stop_after: bool,
) -> Result<()> {
    let Some(name) =
        naming::resolve_existing(manager, prompt, &workspace.project, series).await?
    else {
        return Ok(());
    };
    ensure_running(manager, &name).await?;

    let argv = vec![shell.binary().to_string()];
    let _ = manager
        .exec(&name, &dev_exec_request(workspace, argv, &[]))
        .await?;

    if stop_after {
        println!("Stopping {name}");
        stop_instance(manager, &name).await?;
    }
    Ok(())
}

/// Run `command` in the project's instance.
pub async fn run_command(
    manager: &dyn ContainerManager,
    prompt: &mut dyn PromptLines,
    workspace: &Workspace,
    series: Series,
    command: &str,
    env: &[String],
    stop_after: bool,
) -> Result<()> {
    let Some(name) =
        naming::resolve_existing(manager, prompt, &workspace.project, series).await?
    else {
        return Ok(());
    };
    ensure_running(manager, &name).await?;
    exec_in_instance(manager, workspace, &name, command, env).await?;
    if stop_after {
        println!("Stopping {name}");
        stop_instance(manager, &name).await?;
    }
    Ok(())
}

/// Run `command` in a throwaway instance that is stopped and removed
/// before returning, whatever the command did.
pub async fn run_ephemeral(
    manager: &dyn ContainerManager,
    templates: &ShellTemplates,
    suffixes: &mut dyn SuffixSource,
    workspace: &Workspace,
    series: Series,
    command: &str,
    env: &[String],
) -> Result<()> {
    let name = naming::ephemeral_name(suffixes, &workspace.project, series);
    let mut request = CreateRequest::new(series);
    request.name = Some(name.clone());
    create_instance(manager, templates, suffixes, workspace, request).await?;
    ensure_running(manager, &name).await?;

    // Hold the command's outcome until the instance is gone; a surviving
    // ephemeral instance is a leak.
    let run = exec_in_instance(manager, workspace, &name, command, env).await;

    println!("Stopping {name}");
    if let Err(err) = stop_instance(manager, &name).await {
        log::warn!("stop of ephemeral {name} failed: {err}");
    }
    println!("Removing {name}");
    remove_instance(manager, &name).await;

    run.map(|_| ())
}

/// Execute one shell command inside `name` as the image's default user,
/// reporting the outcome.
///
/// The exit code is returned rather than raised so callers like the
/// post-create hook can keep going after a failing command.
pub async fn exec_in_instance(
    manager: &dyn ContainerManager,
    workspace: &Workspace,
    name: &str,
    command: &str,
    env: &[String],
) -> Result<i32> {
    let argv = vec!["bash".to_string(), "-c".to_string(), command.to_string()];
    let code = manager
        .exec(name, &dev_exec_request(workspace, argv, env))
        .await?;
    if code != 0 {
        eprintln!("Error running command {command} on instance {name}");
    } else {
        println!("Command execution completed successfully");
    }
    Ok(code)
}

/// Exec parameters pinning the session to the image's default user, with
/// the workspace mount as working directory.
fn dev_exec_request(workspace: &Workspace, argv: Vec<String>, extra_env: &[String]) -> ExecRequest {
    let mut env = vec![
        ("HOME".to_string(), CONTAINER_HOME.to_string()),
        ("USER".to_string(), CONTAINER_USER.to_string()),
    ];
    for assignment in extra_env {
        match assignment.split_once('=') {
            Some((key, value)) => env.push((key.to_string(), value.to_string())),
            // A bare name sets an empty value.
            None => env.push((assignment.clone(), String::new())),
        }
    }
    ExecRequest {
        user: CONTAINER_UID,
        group: CONTAINER_GID,
        cwd: workspace.container_path(),
        env,
        argv,
    }
}
