//! Working inside an existing culting project
//!
//! A directory is a culting project when its `pyproject.toml` declares a
//! `[project].name` and carries a `[tool.culting]` table.

use crate::python::Interpreter;
use crate::venv::Venv;
use crate::{Error, Result};
use culting_core::OperatingSystem;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Manifest file name
pub const MANIFEST: &str = "pyproject.toml";
/// Top-level requirements
pub const REQUIREMENTS_IN: &str = "requirements.in";
/// Pinned requirements compiled from [`REQUIREMENTS_IN`]
pub const REQUIREMENTS_LOCK: &str = "requirements.lock";

#[derive(Debug, Deserialize)]
struct Manifest {
    project: Option<ProjectTable>,
    tool: Option<ToolTable>,
}

#[derive(Debug, Deserialize)]
struct ProjectTable {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ToolTable {
    culting: Option<CultingTable>,
}

#[derive(Debug, Default, Deserialize)]
struct CultingTable {
    venv: Option<String>,
}

/// A culting project found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    root: PathBuf,
    name: String,
    venv: Venv,
}

impl Package {
    /// Open the project rooted at `root`
    ///
    /// `default_venv` is used when `[tool.culting]` does not name a venv.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Init`] if `root` is not a culting project.
    pub fn open(root: &Path, default_venv: &str, os: OperatingSystem) -> Result<Self> {
        let manifest_path = root.join(MANIFEST);
        let content = fs::read_to_string(&manifest_path).map_err(|e| {
            Error::Init(format!("Cannot read {}: {e}", manifest_path.display()))
        })?;
        let manifest: Manifest = toml::from_str(&content).map_err(|e| {
            Error::Init(format!("Invalid {}: {e}", manifest_path.display()))
        })?;

        let culting = manifest
            .tool
            .and_then(|tool| tool.culting)
            .ok_or_else(|| {
                Error::Init(format!(
                    "No [tool.culting] table in {}, not a culting project",
                    manifest_path.display()
                ))
            })?;
        let name = manifest
            .project
            .and_then(|project| project.name)
            .ok_or_else(|| {
                Error::Init(format!("No [project].name in {}", manifest_path.display()))
            })?;
        let venv_dir = culting.venv.as_deref().unwrap_or(default_venv);

        Ok(Self {
            root: root.to_path_buf(),
            venv: Venv::new(root.join(venv_dir), os),
            name,
        })
    }

    /// Project directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Declared package name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The project's venv
    #[must_use]
    pub fn venv(&self) -> &Venv {
        &self.venv
    }

    /// The venv interpreter, which must exist
    ///
    /// # Errors
    ///
    /// Returns [`Error::Init`] if the venv has no interpreter.
    pub fn interpreter(&self, timeout: Option<Duration>) -> Result<Interpreter> {
        if !self.venv.exists() {
            return Err(Error::Init(format!(
                "Virtual environment interpreter not found at {}",
                self.venv.python_path().display()
            )));
        }
        Ok(self.venv.interpreter(timeout))
    }

    /// Add libraries to `requirements.in`
    ///
    /// Libraries already listed are skipped with a warning. The file is
    /// rewritten sorted. Returns the libraries that were actually added.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Init`] if `requirements.in` is missing.
    pub fn add_requirements(&self, libraries: &[String]) -> Result<Vec<String>> {
        let path = self.root.join(REQUIREMENTS_IN);
        if !path.is_file() {
            return Err(Error::Init(format!("{} not found", path.display())));
        }
        let content = fs::read_to_string(&path)?;
        let mut all: BTreeSet<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        let mut added = Vec::new();
        for library in libraries {
            if all.insert(library.clone()) {
                added.push(library.clone());
            } else {
                tracing::warn!("'{library}' already present in {REQUIREMENTS_IN}");
            }
        }

        if added.is_empty() {
            tracing::warn!("No new libraries to add");
            return Ok(added);
        }

        let mut rewritten = all.into_iter().collect::<Vec<_>>().join("\n");
        rewritten.push('\n');
        fs::write(&path, rewritten)?;
        Ok(added)
    }

    /// Compile `requirements.lock` with pip-tools
    ///
    /// # Errors
    ///
    /// Returns [`Error::Subprocess`] if pip-tools fails.
    pub fn compile_lock(&self, interpreter: &Interpreter) -> Result<()> {
        interpreter
            .module(
                "piptools",
                [
                    "compile",
                    "-o",
                    REQUIREMENTS_LOCK,
                    REQUIREMENTS_IN,
                    "--no-strip-extras",
                    "--quiet",
                ],
            )
            .dir(&self.root)
            .execute()?;
        Ok(())
    }

    /// Install the project editable with its `dev` extra, constrained by the lock
    ///
    /// # Errors
    ///
    /// Returns [`Error::Subprocess`] if pip fails.
    pub fn install_dev(&self, interpreter: &Interpreter) -> Result<()> {
        interpreter
            .module(
                "pip",
                [
                    "install",
                    "--disable-pip-version-check",
                    "-e",
                    ".[dev]",
                    "-c",
                    REQUIREMENTS_LOCK,
                    "--quiet",
                ],
            )
            .dir(&self.root)
            .execute()?;
        Ok(())
    }
}
