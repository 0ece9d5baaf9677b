//! Interpreter resolver

use crate::command::{Binary, Invocation, Locator};
use crate::parse;
use crate::{Error, Result};
use culting_core::{OperatingSystem, VersionRecord};
use std::ffi::OsStr;
use std::path::Path;

/// A Python interpreter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    binary: Binary,
}

impl Interpreter {
    /// Wrap a resolved binary
    #[must_use]
    pub fn new(binary: Binary) -> Self {
        Self { binary }
    }

    /// Resolve the default interpreter for `os`
    ///
    /// POSIX prefers `python3` over `python`. On Windows `python` is used
    /// unless it is a pyenv-win `.bat` shim, in which case the `py`
    /// launcher's default interpreter is taken.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExecutableNotFound`] if no interpreter is found.
    pub fn locate_default(locator: &Locator, os: OperatingSystem) -> Result<Self> {
        let not_found = || Error::ExecutableNotFound {
            name: "python".to_string(),
        };

        match os {
            OperatingSystem::Posix => locator
                .resolve_first(&["python3", "python"])
                .map(Self::new)
                .ok_or_else(not_found),
            OperatingSystem::Windows => {
                if let Some(binary) = locator.resolve_optional("python")
                    && !is_batch_shim(binary.path())
                {
                    return Ok(Self::new(binary));
                }
                let py = locator.resolve_optional("py").ok_or_else(not_found)?;
                let listing = py.execute(["--list-paths"])?;
                let path = parse::launcher_default(&listing).ok_or_else(not_found)?;
                locator.resolve_override(&path).map(Self::new)
            }
        }
    }

    /// Interpreter at an explicit path
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExecutableNotFound`] if `path` is not executable.
    pub fn from_path(locator: &Locator, path: &Path) -> Result<Self> {
        locator.resolve_override(path).map(Self::new)
    }

    /// Underlying binary
    #[must_use]
    pub fn binary(&self) -> &Binary {
        &self.binary
    }

    /// Absolute interpreter path
    #[must_use]
    pub fn path(&self) -> &Path {
        self.binary.path()
    }

    /// Query the version with `-VV`
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutputNotRecognized`] if the output has no
    /// `Python 3.N` version.
    pub fn version(&self) -> Result<VersionRecord> {
        let output = self.binary.execute(["-VV"])?;
        let version =
            parse::interpreter_version(&output).ok_or_else(|| Error::OutputNotRecognized {
                command: format!("{} -VV", self.binary.name()),
                expected: "Python version".to_string(),
            })?;
        tracing::debug!(path = %self.path().display(), %version, "Interpreter version");
        Ok(version)
    }

    /// `python -m <module> ARGS...`
    pub fn module<I, S>(&self, module: &str, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.binary.command(["-m", module]).args(args)
    }
}

fn is_batch_shim(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("bat"))
}
