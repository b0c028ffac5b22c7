use clap::Parser;

use lxdev::cli::{Cli, Command};
use lxdev::commands;
use lxdev::config::ShellTemplates;
use lxdev::lxd::LxdClient;
use lxdev::naming::{RandomSuffixes, StdinPrompt};

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    let cli = Cli::parse();
    let manager = LxdClient::new();
    let templates = ShellTemplates::builtin();
    let mut prompt = StdinPrompt;
    let mut suffixes = RandomSuffixes;

    let result = match cli.command {
        Command::Create(args) => {
            commands::handle_create(&manager, &templates, &mut suffixes, args).await
        }
        Command::Shell(args) => commands::handle_shell(&manager, &mut prompt, args).await,
        Command::Exec(args) => {
            commands::handle_exec(&manager, &templates, &mut prompt, &mut suffixes, args).await
        }
        Command::Start(args) => commands::handle_start(&manager, &mut prompt, args).await,
        Command::Stop(args) => commands::handle_stop(&manager, &mut prompt, args).await,
        Command::Remove(args) => commands::handle_remove(&manager, &mut prompt, args).await,
    };

    if let Err(err) = result {
        eprintln!("ERROR: {err}");
        std::process::exit(err.exit_code());
    }
}
