//! Forwarding commands
//!
//! `culting python|pip|pyenv|py|uv ARGS...` relay `ARGS` verbatim. With no
//! arguments, or with `-h`/`--help`, culting prints its own help for the
//! subcommand and the tool is not started.

use anyhow::Result;
use clap::Args;
use culting_engine::forward::wants_help;
use culting_engine::{Binary, CommandForwarder, ForwardOutcome};
use std::fmt;

use crate::command::Command;
use crate::common::RuntimeContext;

/// Unconstrained trailing arguments
#[derive(Debug, Clone, Default, Args)]
pub struct ForwardArgs {
    /// Arguments passed through unchanged
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

/// Tool a forwarding subcommand wraps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardTarget {
    /// Project venv interpreter, else the default one
    Python,
    /// `<python> -m pip`
    Pip,
    /// pyenv
    Pyenv,
    /// Windows py launcher
    Py,
    /// uv
    Uv,
}

impl ForwardTarget {
    /// Subcommand name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Pip => "pip",
            Self::Pyenv => "pyenv",
            Self::Py => "py",
            Self::Uv => "uv",
        }
    }

    /// Binary to run and the arguments placed before the forwarded ones
    pub fn resolve(self, context: &RuntimeContext) -> Result<(Binary, Vec<&'static str>)> {
        match self {
            Self::Python | Self::Pip => {
                let interpreter = match context.project_interpreter() {
                    Some(interpreter) => {
                        tracing::debug!(path = %interpreter.path().display(), "Using project venv");
                        interpreter
                    }
                    None => context.default_interpreter()?,
                };
                let prefix = if self == Self::Pip {
                    vec!["-m", "pip"]
                } else {
                    Vec::new()
                };
                Ok((interpreter.binary().clone(), prefix))
            }
            Self::Pyenv | Self::Py | Self::Uv => {
                Ok((context.locator.resolve_mandatory(self.name())?, Vec::new()))
            }
        }
    }
}

impl fmt::Display for ForwardTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A forwarding subcommand ready to run
#[derive(Debug, Clone)]
pub struct ForwardCommand {
    target: ForwardTarget,
    args: Vec<String>,
}

impl ForwardCommand {
    /// Forward `args` to `target`
    #[must_use]
    pub fn new(target: ForwardTarget, args: ForwardArgs) -> Self {
        Self {
            target,
            args: args.args,
        }
    }
}

impl Command for ForwardCommand {
    type Output = i32;

    fn execute(&self, context: &RuntimeContext) -> Result<i32> {
        // Help never needs the tool, which may not even be installed
        if wants_help(&self.args) {
            print!("{}", crate::subcommand_help(self.target.name()));
            return Ok(0);
        }

        let (binary, prefix) = self.target.resolve(context)?;
        let outcome = CommandForwarder::new(binary)
            .with_prefix(prefix)
            .in_dir(context.cwd())
            .forward(&self.args)?;
        Ok(present(&outcome, self.target.name()))
    }
}

/// Print a forwarded outcome and return the exit status to report
///
/// Success shows the tool's stdout, failure its stderr.
pub fn present(outcome: &ForwardOutcome, subcommand: &str) -> i32 {
    match outcome {
        ForwardOutcome::Help => {
            print!("{}", crate::subcommand_help(subcommand));
            0
        }
        ForwardOutcome::Completed(result) if result.success() => {
            print!("{}", result.stdout);
            0
        }
        ForwardOutcome::Completed(result) => {
            tracing::debug!(exit_code = result.exit_code, "{subcommand} failed");
            eprint!("{}", result.stderr);
            result.exit_code
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use culting_engine::ForwardResult;

    #[test]
    fn test_present_returns_tool_status() {
        let failed = ForwardOutcome::Completed(ForwardResult {
            exit_code: 3,
            stdout: String::new(),
            stderr: "boom\n".to_string(),
        });
        assert_eq!(present(&failed, "uv"), 3);

        let ok = ForwardOutcome::Completed(ForwardResult {
            exit_code: 0,
            stdout: "fine\n".to_string(),
            stderr: String::new(),
        });
        assert_eq!(present(&ok, "uv"), 0);
        assert_eq!(present(&ForwardOutcome::Help, "uv"), 0);
    }

    #[test]
    fn test_target_names_match_subcommands() {
        for target in [
            ForwardTarget::Python,
            ForwardTarget::Pip,
            ForwardTarget::Pyenv,
            ForwardTarget::Py,
            ForwardTarget::Uv,
        ] {
            let help = crate::subcommand_help(target.name());
            assert!(help.contains(&format!("culting {target}")), "{help}");
        }
    }
}
