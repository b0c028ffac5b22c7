use crate::cli::CreateArgs;
use crate::config::{self, ShellTemplates};
use crate::error::Result;
use crate::lxd::ContainerManager;
use crate::naming::SuffixSource;
use crate::session::create::{create_instance, CreateRequest};
use crate::session::Workspace;

/// Handle the create subcommand
pub async fn handle_create(
    manager: &dyn ContainerManager,
    templates: &ShellTemplates,
    suffixes: &mut dyn SuffixSource,
    args: CreateArgs,
) -> Result<()> {
    let workspace = Workspace::current()?;
    let config = args
        .config
        .or_else(|| config::discover_config(args.series));
    let request = CreateRequest {
        series: args.series,
        name: None,
        config,
        profile: args.profile,
        shell: args.shell,
    };
    create_instance(manager, templates, suffixes, &workspace, request).await?;

    println!("All done! ✨ 🍰 ✨");
    println!();
    println!("Jump into your new instance with:");
    println!("    lxdev shell {}", args.series);
    Ok(())
}
