//! Init command implementation
//!
//! Resolves every collaborator up front (interpreter, git, asset source) and
//! hands over to [`ProjectInitializer`].

use anyhow::{Context, Result};
use clap::Args;
use culting_config::Config;
use culting_core::{ManagerKind, VersionRecord};
use culting_engine::{
    Git, InitOptions, InterpreterRequest, ProjectDescriptor, ProjectInitializer,
    resolve_interpreter,
};
use culting_template::HttpAssetSource;
use std::path::PathBuf;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::ui;

/// Init command
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Project directory, created if missing, must be empty
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Package name (default: the directory name)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Version manager providing --python-version
    #[arg(short, long, value_name = "MANAGER", requires = "python_version")]
    pub manager: Option<ManagerKind>,

    /// Python version, `major.minor` with an optional `t` for free-threaded
    #[arg(short = 'p', long, value_name = "VERSION")]
    pub python_version: Option<String>,

    /// Interpreter to use, bypassing the version managers
    #[arg(long, value_name = "FILE", conflicts_with_all = ["manager", "python_version"])]
    pub python: Option<PathBuf>,

    /// Virtual environment directory
    #[arg(long, value_name = "DIR")]
    pub venv: Option<String>,

    /// Source folder
    #[arg(long, value_name = "DIR")]
    pub src: Option<String>,

    /// License key (mit, apache-2.0, gpl-3.0, ...)
    #[arg(long, value_name = "KEY")]
    pub license: Option<String>,

    /// Readme file name
    #[arg(long, value_name = "FILE")]
    pub readme: Option<String>,

    /// License file name
    #[arg(long, value_name = "FILE")]
    pub license_file: Option<String>,
}

impl InitCommand {
    /// Interpreter choice: flags first, configuration second
    pub fn interpreter_request(&self, config: &Config) -> Result<InterpreterRequest> {
        let version = match self
            .python_version
            .as_deref()
            .or(config.python.version.as_deref())
        {
            Some(version) => Some(version.parse::<VersionRecord>()?),
            None => None,
        };
        let managers = match self.manager {
            Some(manager) => vec![manager],
            None => config.python.managers.clone(),
        };
        // An explicit version on the command line beats a configured path
        let path = match (&self.python, &self.python_version) {
            (Some(path), _) => Some(path.clone()),
            (None, None) => config.python.path.clone(),
            (None, Some(_)) => None,
        };

        Ok(InterpreterRequest {
            path,
            version,
            managers,
        })
    }

    /// Layout choices: configuration overridden by flags
    #[must_use]
    pub fn options(&self, config: &Config) -> InitOptions {
        let mut options = InitOptions::from_config(&self.path, config);
        options.name.clone_from(&self.name);
        for (value, flag) in [
            (&mut options.venv, &self.venv),
            (&mut options.src, &self.src),
            (&mut options.license, &self.license),
            (&mut options.readme, &self.readme),
            (&mut options.license_file, &self.license_file),
        ] {
            if let Some(flag) = flag {
                value.clone_from(flag);
            }
        }
        options
    }

    fn asset_source(context: &RuntimeContext) -> Result<HttpAssetSource> {
        let assets = &context.config.assets;
        let source =
            HttpAssetSource::new(&assets.license_url, &assets.gitignore_url, assets.timeout())?;
        if !assets.cache {
            return Ok(source);
        }
        let cache = context
            .dirs
            .cache_dir()
            .context("Failed to prepare the cache directory")?;
        Ok(source.with_cache_dir(cache.join("assets")))
    }
}

impl Command for InitCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let project = self.initialize(context)?;
        ui::print_success(&format!(
            "Project '{}' created at {} (Python {})",
            project.name,
            project.path.display(),
            project.python_version
        ));
        Ok(())
    }
}

impl InitCommand {
    /// Run the initialization and return what was created
    pub fn initialize(&self, context: &RuntimeContext) -> Result<ProjectDescriptor> {
        let config = &context.config;
        let os = context.os();

        let request = self.interpreter_request(config)?;
        let interpreter = resolve_interpreter(&context.locator, os, &request)?;
        let git = Git::locate(&context.locator)?;
        let assets = Self::asset_source(context)?;

        let spinner = ui::create_spinner("Initializing project");
        let mut initializer =
            ProjectInitializer::new(self.options(config), os, interpreter, git, &assets)?
                .on_stage(|stage| spinner.set_message(stage.to_string()));
        let result = initializer.run();
        spinner.finish_and_clear();

        Ok(result?)
    }
}
