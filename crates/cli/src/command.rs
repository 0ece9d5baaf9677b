//! Command trait for culting CLI
//!
//! Every subcommand implements [`Command`] so dispatch in [`crate::execute_command`]
//! stays uniform.

use crate::common::RuntimeContext;
use anyhow::Result;

/// Trait for all culting commands
///
/// Commands that only report success return `()`. Commands that relay an
/// external tool return its exit status as `i32`.
///
/// # Example
///
/// ```rust,ignore
/// use crate::command::Command;
/// use crate::common::RuntimeContext;
/// use anyhow::Result;
/// use clap::Args;
///
/// #[derive(Debug, Args)]
/// pub struct MyCommand {
///     #[arg(short, long)]
///     pub some_flag: bool,
/// }
///
/// impl Command for MyCommand {
///     type Output = ();
///
///     fn execute(&self, context: &RuntimeContext) -> Result<()> {
///         let venv = &context.config.package.venv;
///         Ok(())
///     }
/// }
/// ```
pub trait Command {
    /// The type returned by this command
    type Output;

    /// Execute the command with the given runtime context
    ///
    /// # Errors
    ///
    /// Any failure is fatal for the invocation and is rendered by `main`.
    fn execute(&self, context: &RuntimeContext) -> Result<Self::Output>;
}
