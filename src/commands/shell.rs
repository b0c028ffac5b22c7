use crate::cli::ShellArgs;
use crate::config::Shell;
use crate::error::Result;
use crate::lxd::ContainerManager;
use crate::naming::PromptLines;
use crate::session::exec::interactive_shell;
use crate::session::Workspace;

/// Handle the shell subcommand
pub async fn handle_shell(
    manager: &dyn ContainerManager,
    prompt: &mut dyn PromptLines,
    args: ShellArgs,
) -> Result<()> {
    let workspace = Workspace::current()?;
    let shell = args.shell.unwrap_or(Shell::Bash);
    interactive_shell(
        manager,
        prompt,
        &workspace,
        args.series,
        shell,
        args.stop_after,
    )
    .await
}
