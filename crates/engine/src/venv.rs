//! Virtual environments

use crate::command::Binary;
use crate::python::Interpreter;
use crate::{Error, Result};
use culting_core::OperatingSystem;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A virtual environment directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Venv {
    root: PathBuf,
    os: OperatingSystem,
}

impl Venv {
    /// Describe a venv at `root` without touching the filesystem
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, os: OperatingSystem) -> Self {
        Self {
            root: root.into(),
            os,
        }
    }

    /// Create a venv at `root` with `python -m venv`
    ///
    /// # Errors
    ///
    /// Fails if the venv module fails or leaves no interpreter behind.
    pub fn create(interpreter: &Interpreter, root: &Path, os: OperatingSystem) -> Result<Self> {
        let mut invocation = interpreter.module("venv", [root]);
        if let Some(parent) = root.parent() {
            invocation = invocation.dir(parent);
        }
        invocation.execute()?;

        let venv = Self::new(root, os);
        if !venv.exists() {
            return Err(Error::Init(format!(
                "Virtual environment created without interpreter at {}",
                venv.python_path().display()
            )));
        }
        tracing::info!(path = %root.display(), "Virtual environment created");
        Ok(venv)
    }

    /// Venv directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Interpreter inside the venv (`bin/python` or `Scripts\python.exe`)
    #[must_use]
    pub fn python_path(&self) -> PathBuf {
        self.os.venv_python(&self.root)
    }

    /// Whether the venv interpreter is present
    #[must_use]
    pub fn exists(&self) -> bool {
        self.python_path().is_file()
    }

    /// The venv's own interpreter
    #[must_use]
    pub fn interpreter(&self, timeout: Option<Duration>) -> Interpreter {
        Interpreter::new(Binary::new("python", self.python_path()).with_timeout(timeout))
    }

    /// Install or upgrade packages with the venv's pip
    ///
    /// # Errors
    ///
    /// Returns [`Error::Subprocess`] if pip fails.
    pub fn install(&self, packages: &[String], timeout: Option<Duration>) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }
        tracing::debug!(packages = ?packages, "Installing into venv");
        self.interpreter(timeout)
            .module(
                "pip",
                ["install", "--disable-pip-version-check", "--quiet", "--upgrade"],
            )
            .args(packages)
            .execute()?;
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use crate::testing::fake_bin;
    use tempfile::TempDir;

    /// `python -m venv DIR` creates DIR/bin/python; `-m pip` logs its args
    const FAKE_PYTHON: &str = r#"
if [ "$1" = "-m" ] && [ "$2" = "venv" ]; then
  mkdir -p "$3/bin"
  printf '#!/bin/sh\necho "$@" >> "$(dirname "$0")/../pip.log"\n' > "$3/bin/python"
  chmod +x "$3/bin/python"
fi
"#;

    #[test]
    fn test_create_and_install() {
        let bin = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        let python = Interpreter::new(Binary::new("python", fake_bin(bin.path(), "python", FAKE_PYTHON)));

        let root = work.path().join(".venv");
        let venv = Venv::create(&python, &root, OperatingSystem::Posix).unwrap();
        assert!(venv.exists());
        assert_eq!(venv.python_path(), root.join("bin").join("python"));

        venv.install(&["pip".to_string(), "pip-tools".to_string()], None)
            .unwrap();
        let log = std::fs::read_to_string(root.join("pip.log")).unwrap();
        assert_eq!(
            log.trim(),
            "-m pip install --disable-pip-version-check --quiet --upgrade pip pip-tools"
        );
    }

    #[test]
    fn test_create_without_interpreter_fails() {
        let bin = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        let python = Interpreter::new(Binary::new("python", fake_bin(bin.path(), "python", "true")));

        let err = Venv::create(&python, &work.path().join(".venv"), OperatingSystem::Posix)
            .unwrap_err();
        assert!(err.is_init());
    }

    #[test]
    fn test_windows_layout() {
        let venv = Venv::new("proj/.venv", OperatingSystem::Windows);
        assert!(venv.python_path().ends_with("Scripts/python.exe"));
        assert!(!venv.exists());
    }
}
