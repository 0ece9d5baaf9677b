//! Runtime context shared by CLI commands

use anyhow::{Context, Result};
use culting_config::{Config, PlatformDirs};
use culting_core::OperatingSystem;
use culting_engine::{Interpreter, Locator, Package};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Everything a command needs besides its own arguments
///
/// Built once in [`crate::run`]; tests assemble one directly with a fake
/// search path and scratch directories.
#[derive(Debug, Clone)]
pub struct RuntimeContext {
    /// Effective configuration
    pub config: Config,
    /// Per-OS directories
    pub dirs: PlatformDirs,
    /// Binary discovery, carrying the configured subprocess timeout
    pub locator: Locator,
    /// Directory commands act on
    pub cwd: PathBuf,
}

impl RuntimeContext {
    /// Context searching the process `PATH`
    #[must_use]
    pub fn new(config: Config, dirs: PlatformDirs, cwd: impl Into<PathBuf>) -> Self {
        let locator = Locator::system().timeout(config.general.timeout());
        Self {
            config,
            dirs,
            locator,
            cwd: cwd.into(),
        }
    }

    /// Replace the binary locator
    #[must_use]
    pub fn with_locator(mut self, locator: Locator) -> Self {
        self.locator = locator.timeout(self.config.general.timeout());
        self
    }

    /// Current operating-system family
    #[must_use]
    pub fn os(&self) -> OperatingSystem {
        self.dirs.os()
    }

    /// Subprocess timeout
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.config.general.timeout()
    }

    /// The culting project in the working directory
    pub fn package(&self) -> Result<Package> {
        Package::open(&self.cwd, &self.config.package.venv, self.os()).with_context(|| {
            format!(
                "Not inside a culting project (looked in {})",
                self.cwd.display()
            )
        })
    }

    /// The venv interpreter of the project in the working directory, if any
    #[must_use]
    pub fn project_interpreter(&self) -> Option<Interpreter> {
        let package = self.package().ok()?;
        package.interpreter(self.timeout()).ok()
    }

    /// Python used when no project venv applies
    pub fn default_interpreter(&self) -> Result<Interpreter> {
        Ok(Interpreter::locate_default(&self.locator, self.os())?)
    }

    /// Working directory
    #[must_use]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }
}
