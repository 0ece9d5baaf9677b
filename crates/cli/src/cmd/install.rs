//! Install command implementation
//!
//! Adds libraries to `requirements.in`, recompiles `requirements.lock` with
//! pip-tools and reinstalls the project with its `dev` extra.

use anyhow::{Context, Result};
use clap::Args;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::ui;

/// Install command
#[derive(Debug, Args)]
pub struct InstallCommand {
    /// Libraries to add, as pip requirement specifiers
    #[arg(required = true, value_name = "LIB")]
    pub libs: Vec<String>,
}

impl Command for InstallCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let package = context.package()?;
        let interpreter = package.interpreter(context.timeout())?;

        let added = package.add_requirements(&self.libs)?;
        if added.is_empty() {
            return Ok(());
        }

        let spinner = ui::create_spinner("Compiling requirements.lock");
        let result = package
            .compile_lock(&interpreter)
            .context("Failed to compile requirements.lock")
            .and_then(|()| {
                spinner.set_message("Installing the project");
                package
                    .install_dev(&interpreter)
                    .context("Failed to install the project")
            });
        spinner.finish_and_clear();
        result?;

        ui::print_success(&format!("Installed: {}", added.join(", ")));
        Ok(())
    }
}
