//! culting CLI library
//!
//! The command-line surface of culting. Parsing and dispatch live in the
//! library so tests can drive commands without spawning the binary.

pub mod cmd;
pub mod command;
pub mod common;
pub mod ui;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use culting_config::{Config, PlatformDirs};
use std::path::PathBuf;

use cmd::forward::{ForwardArgs, ForwardCommand, ForwardTarget};
use command::Command;
use common::RuntimeContext;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("VERGEN_GIT_SHA"),
    "\nbuilt:  ",
    env!("VERGEN_BUILD_DATE"),
    "\nrustc:  ",
    env!("VERGEN_RUSTC_SEMVER"),
);

/// culting - Python project scaffolding
#[derive(Debug, Parser)]
#[command(name = "culting")]
#[command(about = "Create and work on Python projects")]
#[command(version, long_version = LONG_VERSION)]
#[command(long_about = "Create and work on Python projects

culting lays out a new package (git repository, license, .gitignore,
pyproject.toml, source skeleton) and prepares its virtual environment with
the interpreter you choose through pyenv, the py launcher or uv.

It also forwards commands to python, pip and the version managers so one
entry point covers the daily workflow.")]
pub struct Cli {
    /// Path to the config file (defaults to <config dir>/culting.toml)
    #[arg(long, env = "CULTING_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show DEBUG level logs
    #[arg(long)]
    pub debug: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Initialize a new Python project
    #[command(long_about = "Initialize a new Python project

The target directory is created if needed and must be empty. Steps run in
order and stop at the first failure: git repository with the README,
LICENSE / .gitignore / pyproject.toml, virtual environment, baseline tools.
A failed run leaves the partial project in place.

Examples:
  • culting init demo
      → Package 'demo' with the default interpreter

  • culting init ./api --name api_server -p 3.13
      → Python 3.13 found through the configured managers

  • culting init tool -m uv -p 3.14t
      → Free-threaded 3.14 provided by uv")]
    Init(cmd::init::InitCommand),

    /// List installed Python versions per version manager
    Versions(cmd::versions::VersionsCommand),

    /// Run the current project's package inside its venv
    ///
    /// Every argument, `--help` included, goes to the package.
    #[command(disable_help_flag = true)]
    Run(cmd::run::RunCommand),

    /// Add libraries to the current project and install them
    Install(cmd::install::InstallCommand),

    /// Forward arguments to python (the project venv when present)
    #[command(disable_help_flag = true)]
    Python(ForwardArgs),

    /// Forward arguments to pip (the project venv when present)
    #[command(disable_help_flag = true)]
    Pip(ForwardArgs),

    /// Forward arguments to pyenv
    #[command(disable_help_flag = true)]
    Pyenv(ForwardArgs),

    /// Forward arguments to the py launcher
    #[command(disable_help_flag = true)]
    Py(ForwardArgs),

    /// Forward arguments to uv
    #[command(disable_help_flag = true)]
    Uv(ForwardArgs),
}

/// Main entry point for the CLI logic
///
/// Returns the process exit status.
pub fn run(cli: Cli) -> Result<i32> {
    let dirs = PlatformDirs::detect()?;

    let log_file = dirs
        .log_file()
        .context("Failed to prepare the state directory")?;
    culting_config::logging::init(cli.debug, Some(&log_file))?;

    let config = match &cli.config {
        Some(path) => {
            Config::default().save(dirs.default_config_file()?)?;
            Config::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
        None => Config::load_or_default(&dirs).context("Failed to load configuration")?,
    };

    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let context = RuntimeContext::new(config, dirs, cwd);

    execute_command(cli.command, &context)
}

/// Execute the command based on the command type
pub fn execute_command(command: Commands, context: &RuntimeContext) -> Result<i32> {
    tracing::debug!(?command, "Executing");
    match command {
        Commands::Init(init_cmd) => init_cmd.execute(context).map(|()| 0),
        Commands::Versions(versions_cmd) => versions_cmd.execute(context).map(|()| 0),
        Commands::Run(run_cmd) => run_cmd.execute(context),
        Commands::Install(install_cmd) => install_cmd.execute(context).map(|()| 0),
        Commands::Python(args) => ForwardCommand::new(ForwardTarget::Python, args).execute(context),
        Commands::Pip(args) => ForwardCommand::new(ForwardTarget::Pip, args).execute(context),
        Commands::Pyenv(args) => ForwardCommand::new(ForwardTarget::Pyenv, args).execute(context),
        Commands::Py(args) => ForwardCommand::new(ForwardTarget::Py, args).execute(context),
        Commands::Uv(args) => ForwardCommand::new(ForwardTarget::Uv, args).execute(context),
    }
}

/// Help text of one subcommand, as `culting <name> --help` would print it
#[must_use]
pub fn subcommand_help(name: &str) -> String {
    let mut command = Cli::command();
    command.build();
    match command.find_subcommand_mut(name) {
        Some(subcommand) => subcommand.render_long_help().to_string(),
        None => command.render_long_help().to_string(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use culting_core::ManagerKind;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_forwarded_args_keep_hyphens() {
        let cli = Cli::try_parse_from(["culting", "pip", "install", "-U", "--pre", "rich"]).unwrap();
        let Commands::Pip(forward) = cli.command else {
            panic!("expected pip");
        };
        assert_eq!(forward.args, ["install", "-U", "--pre", "rich"]);
    }

    #[test]
    fn test_forwarded_help_is_not_consumed_by_clap() {
        let cli = Cli::try_parse_from(["culting", "uv", "--help"]).unwrap();
        let Commands::Uv(forward) = cli.command else {
            panic!("expected uv");
        };
        assert_eq!(forward.args, ["--help"]);
    }

    #[test]
    fn test_forward_without_args() {
        let cli = Cli::try_parse_from(["culting", "pyenv"]).unwrap();
        assert!(matches!(cli.command, Commands::Pyenv(ref f) if f.args.is_empty()));
    }

    #[test]
    fn test_init_options() {
        let cli = Cli::try_parse_from([
            "culting",
            "--debug",
            "init",
            "demo",
            "--name",
            "demo_app",
            "-m",
            "uv",
            "-p",
            "3.13t",
        ])
        .unwrap();
        assert!(cli.debug);
        let Commands::Init(init) = cli.command else {
            panic!("expected init");
        };
        assert_eq!(init.path, PathBuf::from("demo"));
        assert_eq!(init.name.as_deref(), Some("demo_app"));
        assert_eq!(init.manager, Some(ManagerKind::Uv));
        assert_eq!(init.python_version.as_deref(), Some("3.13t"));
    }

    #[test]
    fn test_init_manager_requires_version() {
        assert!(Cli::try_parse_from(["culting", "init", "demo", "-m", "pyenv"]).is_err());
    }

    #[test]
    fn test_init_python_path_conflicts_with_version() {
        assert!(
            Cli::try_parse_from(["culting", "init", "demo", "--python", "/usr/bin/python3", "-p", "3.12"])
                .is_err()
        );
    }

    #[test]
    fn test_install_requires_libraries() {
        assert!(Cli::try_parse_from(["culting", "install"]).is_err());
    }

    #[test]
    fn test_subcommand_help_names_the_command() {
        let help = subcommand_help("pyenv");
        assert!(help.contains("Forward arguments to pyenv"));
        assert!(help.contains("culting pyenv"));
    }
}
