//! Launch configuration: discovery, shell templates, and the post-create
//! hook.
//!
//! A launch config is a YAML instance-config document handed to the
//! manager verbatim at launch time. This module never interprets the
//! document beyond one key of its own, [`HOOK_KEY`], which lists commands
//! to run inside the instance once creation finishes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;

use crate::series::Series;

/// Directory checked for default launch configs, in the project and in
/// the operator's home.
pub const CONFIG_DOTDIR: &str = ".lxdev";

/// Config key holding the post-create hook commands.
pub const HOOK_KEY: &str = "lxdev-exec";

/// Login shells an instance can be provisioned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

impl Shell {
    /// Binary invoked for interactive sessions.
    pub fn binary(self) -> &'static str {
        match self {
            Shell::Bash => "bash",
            Shell::Zsh => "zsh",
            Shell::Fish => "fish",
        }
    }
}

const ZSH_TEMPLATE: &str = "\
config:
  user.user-data: |
    #cloud-config
    packages:
      - zsh
    runcmd:
      - chsh -s /usr/bin/zsh ubuntu
";

const FISH_TEMPLATE: &str = "\
config:
  user.user-data: |
    #cloud-config
    packages:
      - fish
    runcmd:
      - chsh -s /usr/bin/fish ubuntu
";

/// Built-in launch configs for shells that need installing.
///
/// Built once at startup and passed to creation explicitly. Bash has no
/// entry because it is the base image default.
pub struct ShellTemplates {
    templates: HashMap<Shell, &'static str>,
}

impl ShellTemplates {
    pub fn builtin() -> Self {
        let mut templates = HashMap::new();
        templates.insert(Shell::Zsh, ZSH_TEMPLATE);
        templates.insert(Shell::Fish, FISH_TEMPLATE);
        Self { templates }
    }

    /// Launch config bytes for `shell`, when it has a provisioning
    /// template.
    pub fn get(&self, shell: Shell) -> Option<&'static [u8]> {
        self.templates.get(&shell).map(|template| template.as_bytes())
    }
}

impl Default for ShellTemplates {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Search the default config locations for `series`.
pub fn discover_config(series: Series) -> Option<PathBuf> {
    discover_config_in(Path::new("."), dirs::home_dir().as_deref(), series)
}

/// Discovery with explicit roots, so tests can point it at scratch
/// directories.
///
/// Checked in priority order:
/// 1. `.lxdev/{series}.yaml` in the project
/// 2. `.lxdev/base.yaml` in the project
/// 3. `~/.lxdev/{series}.yaml`
/// 4. `~/.lxdev/base.yaml`
pub fn discover_config_in(
    project_dir: &Path,
    home_dir: Option<&Path>,
    series: Series,
) -> Option<PathBuf> {
    let series_yaml = format!("{series}.yaml");
    let mut paths = vec![
        project_dir.join(CONFIG_DOTDIR).join(&series_yaml),
        project_dir.join(CONFIG_DOTDIR).join("base.yaml"),
    ];
    if let Some(home) = home_dir {
        paths.push(home.join(CONFIG_DOTDIR).join(&series_yaml));
        paths.push(home.join(CONFIG_DOTDIR).join("base.yaml"));
    }
    paths.into_iter().find(|path| path.is_file())
}

#[derive(Debug, Deserialize)]
struct LaunchDoc {
    #[serde(rename = "lxdev-exec", default)]
    exec: Option<serde_yaml::Value>,
}

/// Post-create commands under the [`HOOK_KEY`] entry of a config
/// document.
///
/// `origin` names the config source in diagnostics. Returns `None` when
/// the document has no hook entry or cannot be used; parse and type
/// problems are reported but never abort creation, since the hook is
/// best-effort environment setup. Bare scalars in the list form (an
/// unquoted `false` or `42`) run as their textual form; maps and nested
/// lists are rejected.
pub fn post_create_commands(bytes: &[u8], origin: &Path) -> Option<Vec<String>> {
    let doc: LaunchDoc = match serde_yaml::from_slice(bytes) {
        Ok(doc) => doc,
        Err(err) => {
            eprintln!("ERROR: Could not parse YAML from {}: {err}", origin.display());
            return None;
        }
    };
    match doc.exec? {
        serde_yaml::Value::String(command) => Some(vec![command]),
        serde_yaml::Value::Sequence(entries) => {
            let mut commands = Vec::with_capacity(entries.len());
            for entry in entries {
                match entry {
                    serde_yaml::Value::String(command) => commands.push(command),
                    serde_yaml::Value::Bool(flag) => commands.push(flag.to_string()),
                    serde_yaml::Value::Number(number) => commands.push(number.to_string()),
                    _ => {
                        eprintln!(
                            "ERROR: {HOOK_KEY} in {} must be either a string or list of strings",
                            origin.display()
                        );
                        return None;
                    }
                }
            }
            Some(commands)
        }
        _ => {
            eprintln!(
                "ERROR: {HOOK_KEY} in {} must be either a string or list of strings",
                origin.display()
            );
            None
        }
    }
}
