use crate::cli::SeriesArgs;
use crate::error::Result;
use crate::lxd::ContainerManager;
use crate::naming::{self, PromptLines};
use crate::session::lifecycle::ensure_running;
use crate::session::Workspace;

/// Handle the start subcommand
pub async fn handle_start(
    manager: &dyn ContainerManager,
    prompt: &mut dyn PromptLines,
    args: SeriesArgs,
) -> Result<()> {
    let workspace = Workspace::current()?;
    let Some(name) =
        naming::resolve_existing(manager, prompt, &workspace.project, args.series).await?
    else {
        return Ok(());
    };
    ensure_running(manager, &name).await
}
