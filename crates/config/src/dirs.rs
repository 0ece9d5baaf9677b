//! Per-OS directory utilities
//!
//! This module derives XDG-style directories for culting from the detected
//! operating-system family and the user's home directory:
//! - config: `~/.config/culting` or `~/AppData/Local/culting`
//! - state: `~/.local/state/culting` or `~/AppData/Local/Temp/culting`
//! - cache: `~/.cache/culting` or `~/AppData/Local/Temp/culting`
//!
//! Directories are created on access (parents included, no error if present).

use crate::{Error, Result};
use culting_core::{APP_NAME, OperatingSystem, Platform};
use std::fs;
use std::path::{Path, PathBuf};

/// User config file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "culting.toml";

/// Reference file holding the built-in defaults
pub const DEFAULT_CONFIG_FILE_NAME: &str = "culting-default.toml";

/// Log file name inside the state directory
pub const LOG_FILE_NAME: &str = "culting.log";

/// Directory layout for one operating-system family and home directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDirs {
    os: OperatingSystem,
    home: PathBuf,
}

impl PlatformDirs {
    /// Directories for the running process
    ///
    /// Fails with [`Error::UnsupportedPlatform`] on unsupported targets.
    pub fn detect() -> Result<Self> {
        let platform = Platform::current()?;
        let home = ::dirs::home_dir().ok_or(Error::HomeDirNotFound)?;
        Ok(Self::new(platform.os, home))
    }

    /// Directories for an explicit family and home directory
    #[must_use]
    pub fn new(os: OperatingSystem, home: impl Into<PathBuf>) -> Self {
        Self {
            os,
            home: home.into(),
        }
    }

    /// Operating-system family these directories were derived for
    #[must_use]
    pub fn os(&self) -> OperatingSystem {
        self.os
    }

    /// Home directory the paths are rooted at
    #[must_use]
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Config directory, created if missing
    pub fn config_dir(&self) -> Result<PathBuf> {
        ensure_dir(self.home.join(self.os.config_dirname()).join(APP_NAME))
    }

    /// State directory, created if missing
    pub fn state_dir(&self) -> Result<PathBuf> {
        ensure_dir(self.home.join(self.os.state_dirname()).join(APP_NAME))
    }

    /// Cache directory, created if missing
    pub fn cache_dir(&self) -> Result<PathBuf> {
        ensure_dir(self.home.join(self.os.cache_dirname()).join(APP_NAME))
    }

    /// User config file path (`culting.toml`)
    pub fn config_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Defaults reference file path (`culting-default.toml`)
    pub fn default_config_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join(DEFAULT_CONFIG_FILE_NAME))
    }

    /// Log file path (`culting.log`)
    pub fn log_file(&self) -> Result<PathBuf> {
        Ok(self.state_dir()?.join(LOG_FILE_NAME))
    }
}

fn ensure_dir(path: PathBuf) -> Result<PathBuf> {
    fs::create_dir_all(&path)?;
    Ok(path)
}
