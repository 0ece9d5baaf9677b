//! Version-manager resolvers
//!
//! Managers are optional: a manager that is not installed lists no versions
//! and only fails when asked for a path. Callers iterate the configured
//! managers in priority order until one yields an interpreter.

use crate::command::{Binary, Locator};
use crate::parse;
use crate::python::Interpreter;
use crate::{Error, Result};
use culting_core::{ManagerKind, OperatingSystem, VersionRecord};
use std::path::{Path, PathBuf};

/// Capabilities shared by every version manager
pub trait PythonManager {
    /// Which manager this is
    fn kind(&self) -> ManagerKind;

    /// Resolved binary, `None` when the manager is not installed
    fn binary(&self) -> Option<&Binary>;

    /// Whether the manager binary was found
    fn is_installed(&self) -> bool {
        self.binary().is_some()
    }

    /// Installed interpreter versions, empty when the manager is absent
    ///
    /// # Errors
    ///
    /// Fails only if an installed manager cannot be queried.
    fn versions(&self) -> Result<Vec<VersionRecord>>;

    /// Executable path of an installed version
    ///
    /// # Errors
    ///
    /// - [`Error::ExecutableNotFound`] if the manager is not installed
    /// - [`Error::VersionNotFound`] if the version is not installed
    fn version_path(&self, version: &VersionRecord) -> Result<PathBuf>;

    /// The binary, or the deferred not-found error
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExecutableNotFound`] if the manager is not installed.
    fn require_binary(&self) -> Result<&Binary> {
        self.binary().ok_or_else(|| Error::ExecutableNotFound {
            name: self.kind().to_string(),
        })
    }
}

/// Build the resolver for a manager kind
#[must_use]
pub fn create_manager(kind: ManagerKind, locator: &Locator) -> Box<dyn PythonManager> {
    match kind {
        ManagerKind::Pyenv => Box::new(Pyenv::locate(locator)),
        ManagerKind::Py => Box::new(PyLauncher::locate(locator)),
        ManagerKind::Uv => Box::new(Uv::locate(locator)),
    }
}

fn version_not_found(kind: ManagerKind, version: &VersionRecord) -> Error {
    Error::VersionNotFound {
        manager: kind.to_string(),
        version: version.to_string(),
    }
}

/// pyenv (and pyenv-win)
#[derive(Debug, Clone)]
pub struct Pyenv {
    binary: Option<Binary>,
}

impl Pyenv {
    /// Best-effort lookup of `pyenv`
    #[must_use]
    pub fn locate(locator: &Locator) -> Self {
        Self {
            binary: locator.resolve_optional("pyenv"),
        }
    }
}

impl PythonManager for Pyenv {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Pyenv
    }

    fn binary(&self) -> Option<&Binary> {
        self.binary.as_ref()
    }

    fn versions(&self) -> Result<Vec<VersionRecord>> {
        let Some(binary) = &self.binary else {
            return Ok(Vec::new());
        };
        let output = binary.execute(["versions", "--skip-envs"])?;
        Ok(parse::version_list(&output))
    }

    /// Newest installed patch release, then `pyenv which` scoped to it
    fn version_path(&self, version: &VersionRecord) -> Result<PathBuf> {
        let binary = self.require_binary()?;
        let listing = binary.execute(["versions", "--bare", "--skip-envs"])?;
        let full = parse::pyenv_full_version(&listing, version)
            .ok_or_else(|| version_not_found(self.kind(), version))?;

        let target = format!("python{version}");
        let path = binary
            .command(["which", target.as_str()])
            .env("PYENV_VERSION", &full)
            .execute()?;
        if path.is_empty() {
            return Err(version_not_found(self.kind(), version));
        }
        tracing::debug!(%version, full = %full, path = %path, "Resolved with pyenv");
        Ok(PathBuf::from(path))
    }
}

/// The Windows `py` launcher
#[derive(Debug, Clone)]
pub struct PyLauncher {
    binary: Option<Binary>,
}

impl PyLauncher {
    /// Best-effort lookup of `py`
    #[must_use]
    pub fn locate(locator: &Locator) -> Self {
        Self {
            binary: locator.resolve_optional("py"),
        }
    }
}

impl PythonManager for PyLauncher {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Py
    }

    fn binary(&self) -> Option<&Binary> {
        self.binary.as_ref()
    }

    fn versions(&self) -> Result<Vec<VersionRecord>> {
        let Some(binary) = &self.binary else {
            return Ok(Vec::new());
        };
        let output = binary.execute(["--list-paths"])?;
        let versions = parse::launcher_entries(&output)
            .into_iter()
            .map(|entry| entry.version)
            .collect();
        Ok(parse::sort_versions(versions))
    }

    fn version_path(&self, version: &VersionRecord) -> Result<PathBuf> {
        let binary = self.require_binary()?;
        let output = binary.execute(["--list-paths"])?;
        parse::launcher_path(&output, version).ok_or_else(|| version_not_found(self.kind(), version))
    }
}

/// astral's uv
#[derive(Debug, Clone)]
pub struct Uv {
    binary: Option<Binary>,
}

impl Uv {
    /// Best-effort lookup of `uv`
    #[must_use]
    pub fn locate(locator: &Locator) -> Self {
        Self {
            binary: locator.resolve_optional("uv"),
        }
    }
}

impl PythonManager for Uv {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Uv
    }

    fn binary(&self) -> Option<&Binary> {
        self.binary.as_ref()
    }

    /// Only interpreters installed under `uv python dir` count
    fn versions(&self) -> Result<Vec<VersionRecord>> {
        let Some(binary) = &self.binary else {
            return Ok(Vec::new());
        };
        let output = binary.execute(["python", "list", "--only-installed"])?;
        let install_dir = binary.execute(["python", "dir"])?;
        let versions = parse::uv_managed(&output, Path::new(install_dir.trim()))
            .into_iter()
            .map(|(version, _)| version)
            .collect();
        Ok(parse::sort_versions(versions))
    }

    fn version_path(&self, version: &VersionRecord) -> Result<PathBuf> {
        let binary = self.require_binary()?;
        let requested = version.to_string();
        let path = binary.execute(["python", "find", requested.as_str()])?;
        if path.is_empty() {
            return Err(version_not_found(self.kind(), version));
        }
        Ok(PathBuf::from(path))
    }
}

/// What the user asked for when choosing an interpreter
#[derive(Debug, Clone, Default)]
pub struct InterpreterRequest {
    /// Explicit interpreter path, wins over everything else
    pub path: Option<PathBuf>,
    /// Specific version to look up with the managers
    pub version: Option<VersionRecord>,
    /// Managers to try, in priority order
    pub managers: Vec<ManagerKind>,
}

/// Resolve the interpreter for a new project
///
/// Order: explicit path, then the requested version through each manager
/// in priority order, then the default interpreter.
///
/// # Errors
///
/// - [`Error::ExecutableNotFound`] if the explicit path or default interpreter is missing
/// - [`Error::VersionNotFound`] if no manager provides the requested version
pub fn resolve_interpreter(
    locator: &Locator,
    os: OperatingSystem,
    request: &InterpreterRequest,
) -> Result<Interpreter> {
    if let Some(path) = &request.path {
        return Interpreter::from_path(locator, path);
    }

    let Some(version) = &request.version else {
        return Interpreter::locate_default(locator, os);
    };

    for kind in &request.managers {
        let manager = create_manager(*kind, locator);
        if !manager.is_installed() {
            tracing::debug!(manager = %kind, "Manager not installed, skipping");
            continue;
        }
        match manager.version_path(version) {
            Ok(path) => {
                tracing::info!(manager = %kind, %version, path = %path.display(), "Using Python");
                return Interpreter::from_path(locator, &path);
            }
            Err(e) => tracing::debug!(manager = %kind, %version, "Lookup failed: {e}"),
        }
    }

    let managers = request
        .managers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    Err(Error::VersionNotFound {
        manager: if managers.is_empty() {
            "no manager".to_string()
        } else {
            managers
        },
        version: version.to_string(),
    })
}
