//! Run command implementation
//!
//! `culting run ARGS...` is `<venv python> -m <package> ARGS...` from the
//! project root.

use anyhow::Result;
use clap::Args;
use culting_engine::CommandForwarder;

use crate::cmd::forward::present;
use crate::command::Command;
use crate::common::RuntimeContext;

/// Run command
#[derive(Debug, Args)]
pub struct RunCommand {
    /// Arguments for the package
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

impl Command for RunCommand {
    type Output = i32;

    fn execute(&self, context: &RuntimeContext) -> Result<i32> {
        let package = context.package()?;
        let interpreter = package.interpreter(context.timeout())?;
        tracing::debug!(package = package.name(), "Running package");

        let outcome = CommandForwarder::new(interpreter.binary().clone())
            .with_prefix(["-m", package.name()])
            .in_dir(package.root())
            .passthrough_help()
            .forward(&self.args)?;
        Ok(present(&outcome, "run"))
    }
}
