use crate::cli::SeriesArgs;
use crate::error::Result;
use crate::lxd::ContainerManager;
use crate::naming::{self, PromptLines};
use crate::session::lifecycle::stop_instance;
use crate::session::Workspace;

/// Handle the stop subcommand
pub async fn handle_stop(
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
    println!("Stopping {name}");
    stop_instance(manager, &name).await
}
