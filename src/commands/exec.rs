use crate::cli::ExecArgs;
use crate::config::ShellTemplates;
use crate::error::Result;
use crate::lxd::ContainerManager;
use crate::naming::{PromptLines, SuffixSource};
use crate::session::exec::{run_command, run_ephemeral};
use crate::session::Workspace;

/// Handle the exec subcommand
pub async fn handle_exec(
    manager: &dyn ContainerManager,
    templates: &ShellTemplates,
    prompt: &mut dyn PromptLines,
    suffixes: &mut dyn SuffixSource,
    args: ExecArgs,
) -> Result<()> {
    let workspace = Workspace::current()?;
    if args.ephemeral {
        run_ephemeral(
            manager,
            templates,
            suffixes,
            &workspace,
            args.series,
            &args.command,
            &args.env,
        )
        .await
    } else {
        run_command(
            manager,
            prompt,
            &workspace,
            args.series,
            &args.command,
            &args.env,
            args.stop_after,
        )
        .await
    }
}
