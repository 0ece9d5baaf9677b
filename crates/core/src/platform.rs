//! Platform detection for cross-platform project scaffolding
//!
//! culting distinguishes two operating-system families:
//! - POSIX (Linux, macOS and the BSDs) → `~/.config`, `bin/python`
//! - Windows → `~/AppData/Local`, `Scripts\python.exe`
//!
//! Any other target is rejected with [`Error::UnsupportedPlatform`].
//! Detection runs once per process and is cached.

use crate::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Detection result for the running process (computed once)
static CURRENT_PLATFORM: LazyLock<std::result::Result<Platform, String>> = LazyLock::new(|| {
    Platform::from_target_os(std::env::consts::OS).map_err(|_| std::env::consts::OS.to_string())
});

/// Supported operating-system families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatingSystem {
    /// Linux, macOS, FreeBSD, NetBSD, OpenBSD
    Posix,
    /// Windows
    Windows,
}

impl OperatingSystem {
    /// Config home relative to the user's home directory
    #[must_use]
    pub const fn config_dirname(self) -> &'static str {
        match self {
            Self::Posix => ".config",
            Self::Windows => "AppData/Local",
        }
    }

    /// State home relative to the user's home directory
    #[must_use]
    pub const fn state_dirname(self) -> &'static str {
        match self {
            Self::Posix => ".local/state",
            Self::Windows => "AppData/Local/Temp",
        }
    }

    /// Cache home relative to the user's home directory
    #[must_use]
    pub const fn cache_dirname(self) -> &'static str {
        match self {
            Self::Posix => ".cache",
            Self::Windows => "AppData/Local/Temp",
        }
    }

    /// Name of the executables directory inside a virtual environment
    #[must_use]
    pub const fn venv_bin_dirname(self) -> &'static str {
        match self {
            Self::Posix => "bin",
            Self::Windows => "Scripts",
        }
    }

    /// File name of an executable, with `.exe` appended on Windows
    #[must_use]
    pub fn executable_name(self, stem: &str) -> String {
        match self {
            Self::Posix => stem.to_string(),
            Self::Windows => format!("{stem}.exe"),
        }
    }

    /// Interpreter path inside a virtual environment
    ///
    /// ```
    /// use culting_core::OperatingSystem;
    /// use std::path::Path;
    ///
    /// let python = OperatingSystem::Posix.venv_python(Path::new(".venv"));
    /// assert_eq!(python, Path::new(".venv/bin/python"));
    /// ```
    #[must_use]
    pub fn venv_python(self, venv: &Path) -> PathBuf {
        venv.join(self.venv_bin_dirname())
            .join(self.executable_name("python"))
    }

    /// Trove classifier describing this family in generated manifests
    #[must_use]
    pub const fn classifier(self) -> &'static str {
        match self {
            Self::Posix => "Operating System :: POSIX",
            Self::Windows => "Operating System :: Microsoft :: Windows",
        }
    }
}

impl fmt::Display for OperatingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Posix => write!(f, "posix"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

/// Platform information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    /// Operating-system family
    pub os: OperatingSystem,
    /// CPU architecture: "x86_64", "aarch64", etc.
    pub arch: &'static str,
}

impl Platform {
    /// Platform of the running process
    ///
    /// Detection happens once; later calls reuse the cached result.
    pub fn current() -> Result<Self> {
        CURRENT_PLATFORM
            .clone()
            .map_err(|os| Error::UnsupportedPlatform { os })
    }

    /// Map a `std::env::consts::OS` value onto a supported family
    pub fn from_target_os(os: &str) -> Result<Self> {
        let family = match os {
            "linux" | "macos" | "freebsd" | "netbsd" | "openbsd" => OperatingSystem::Posix,
            "windows" => OperatingSystem::Windows,
            other => {
                return Err(Error::UnsupportedPlatform {
                    os: other.to_string(),
                });
            }
        };
        Ok(Self {
            os: family,
            arch: std::env::consts::ARCH,
        })
    }
}
