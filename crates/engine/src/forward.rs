//! Command forwarding
//!
//! Arguments are relayed to the target binary verbatim. Unlike
//! [`Invocation::execute`](crate::Invocation::execute), a failing exit status
//! is not an error here: the wrapped tool's own output is what the user sees.

use crate::command::Binary;
use crate::Result;
use std::ffi::OsString;
use std::path::PathBuf;

/// Outcome of one forwarded invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardResult {
    /// Exit status of the wrapped tool
    pub exit_code: i32,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl ForwardResult {
    /// Whether the wrapped tool exited with status 0
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// What a forward request turned into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardOutcome {
    /// Help was requested or no arguments were given; nothing was invoked
    Help,
    /// The binary ran
    Completed(ForwardResult),
}

/// Relays arguments to a resolved binary
#[derive(Debug, Clone)]
pub struct CommandForwarder {
    binary: Binary,
    prefix: Vec<OsString>,
    dir: Option<PathBuf>,
    intercept_help: bool,
}

impl CommandForwarder {
    /// Forward to `binary`, intercepting help requests
    #[must_use]
    pub fn new(binary: Binary) -> Self {
        Self {
            binary,
            prefix: Vec::new(),
            dir: None,
            intercept_help: true,
        }
    }

    /// Fixed arguments placed before the forwarded ones (`-m pip`)
    #[must_use]
    pub fn with_prefix<I, S>(mut self, prefix: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.prefix = prefix.into_iter().map(Into::into).collect();
        self
    }

    /// Run the binary in `dir`
    #[must_use]
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Always invoke the binary, even without arguments or with `--help`
    #[must_use]
    pub fn passthrough_help(mut self) -> Self {
        self.intercept_help = false;
        self
    }

    /// Target binary
    #[must_use]
    pub fn binary(&self) -> &Binary {
        &self.binary
    }

    /// Forward `args` unmodified
    ///
    /// # Errors
    ///
    /// Only failures to run the binary at all (spawn, timeout) are errors.
    pub fn forward(&self, args: &[String]) -> Result<ForwardOutcome> {
        if self.intercept_help && wants_help(args) {
            tracing::debug!(binary = self.binary.name(), "Help requested, not invoking");
            return Ok(ForwardOutcome::Help);
        }

        let mut invocation = self.binary.command(&self.prefix).args(args);
        if let Some(dir) = &self.dir {
            invocation = invocation.dir(dir);
        }
        let result = invocation.capture()?;
        tracing::debug!(
            binary = self.binary.name(),
            exit_code = result.exit_code,
            "Forwarded command finished"
        );
        Ok(ForwardOutcome::Completed(result))
    }
}

/// No arguments, or an explicit `-h` / `--help`
#[must_use]
pub fn wants_help(args: &[String]) -> bool {
    args.is_empty() || args.iter().any(|arg| arg == "-h" || arg == "--help")
}
