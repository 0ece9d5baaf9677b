//! Configuration management
//!
//! This module handles loading, validating and saving culting configuration.
//! The user file `culting.toml` is optional; every section and key falls back
//! to a built-in default.

use crate::{Error, PlatformDirs, Result};
use culting_core::ManagerKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// General configuration section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Wall-clock limit for each external process, in seconds (0 disables)
    pub timeout_secs: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { timeout_secs: 600 }
    }
}

impl GeneralConfig {
    /// Subprocess timeout, `None` when disabled
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// Interpreter selection
///
/// ```toml
/// [python]
/// managers = ["pyenv", "uv"]
/// version = "3.13"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PythonConfig {
    /// Version managers to try, in priority order
    pub managers: Vec<ManagerKind>,

    /// Explicit interpreter path, takes precedence over managers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Default `major.minor[t]` version for new projects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Default for PythonConfig {
    fn default() -> Self {
        Self {
            managers: ManagerKind::ALL.to_vec(),
            path: None,
            version: None,
        }
    }
}

/// Git configuration section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Require `user.email` and use it in generated metadata
    pub use_email: bool,

    /// Initial branch name for new repositories
    pub default_branch: String,

    /// Message of the commit holding the initial readme
    pub initial_commit_message: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            use_email: true,
            default_branch: "main".to_string(),
            initial_commit_message: "Initial commit".to_string(),
        }
    }
}

/// Project layout and baseline tooling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Virtual environment directory, relative to the project root
    pub venv: String,

    /// Source folder holding the package, relative to the project root
    pub src: String,

    /// Readme file name
    pub readme: String,

    /// License file name
    pub license_file: String,

    /// License template identifier (GitHub license key)
    pub license: String,

    /// Packages installed into every new venv
    pub baseline: Vec<String>,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            venv: ".venv".to_string(),
            src: "src".to_string(),
            readme: "README.md".to_string(),
            license_file: "LICENSE".to_string(),
            license: "mit".to_string(),
            baseline: vec!["pip".to_string(), "pip-tools".to_string()],
        }
    }
}

/// Remote template assets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// License endpoint, `{id}` is replaced by the license key
    pub license_url: String,

    /// Ignore-file endpoint, `{id}` is replaced by the template name
    pub gitignore_url: String,

    /// Ignore-file template name
    pub gitignore: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Reuse previously fetched assets from the cache directory
    pub cache: bool,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            license_url: "https://api.github.com/licenses/{id}".to_string(),
            gitignore_url: "https://raw.githubusercontent.com/github/gitignore/main/{id}.gitignore"
                .to_string(),
            gitignore: "Python".to_string(),
            timeout_secs: 30,
            cache: true,
        }
    }
}

impl AssetsConfig {
    /// Request timeout
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Interpreter selection
    pub python: PythonConfig,

    /// Git settings
    pub git: GitConfig,

    /// Project layout
    pub package: PackageConfig,

    /// Remote assets
    pub assets: AssetsConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the user configuration, falling back to defaults
    ///
    /// Also refreshes `culting-default.toml` so users can see every key
    /// with its built-in value.
    pub fn load_or_default(dirs: &PlatformDirs) -> Result<Self> {
        Self::default().save(dirs.default_config_file()?)?;

        let path = dirs.config_file()?;
        if path.is_file() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "No user configuration, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Check invariants that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.python.managers.is_empty() {
            return Err(Error::Config(
                "python.managers must list at least one manager".to_string(),
            ));
        }
        for (key, value) in [
            ("package.venv", &self.package.venv),
            ("package.src", &self.package.src),
        ] {
            if value.trim().is_empty() || Path::new(value).is_absolute() {
                return Err(Error::Config(format!(
                    "{key} must be a non-empty relative path, got '{value}'"
                )));
            }
        }
        for (key, value) in [
            ("package.readme", &self.package.readme),
            ("package.license_file", &self.package.license_file),
            ("package.license", &self.package.license),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{key} must not be empty")));
            }
        }
        if self.assets.timeout_secs == 0 {
            return Err(Error::Config(
                "assets.timeout_secs must be greater than zero".to_string(),
            ));
        }
        for (key, value) in [
            ("assets.license_url", &self.assets.license_url),
            ("assets.gitignore_url", &self.assets.gitignore_url),
        ] {
            if !value.contains("{id}") {
                return Err(Error::Config(format!("{key} must contain an {{id}} placeholder")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use culting_core::OperatingSystem;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.package.venv, ".venv");
        assert_eq!(config.python.managers, ManagerKind::ALL.to_vec());
        assert!(config.git.use_email);
        assert_eq!(config.general.timeout(), Some(Duration::from_secs(600)));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = Config::from_toml_str(
            r#"
[python]
managers = ["uv"]
version = "3.13t"

[package]
venv = "env"
"#,
        )
        .unwrap();

        assert_eq!(config.python.managers, vec![ManagerKind::Uv]);
        assert_eq!(config.python.version.as_deref(), Some("3.13t"));
        assert_eq!(config.package.venv, "env");
        assert_eq!(config.package.src, "src");
        assert_eq!(config.git, GitConfig::default());
    }

    #[test]
    fn test_zero_timeout_disables_limit() {
        let config = Config::from_toml_str("[general]\ntimeout_secs = 0\n").unwrap();
        assert_eq!(config.general.timeout(), None);
    }

    #[test]
    fn test_rejects_unknown_manager() {
        let err = Config::from_toml_str("[python]\nmanagers = [\"conda\"]\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_invalid_values() {
        for content in [
            "[python]\nmanagers = []\n",
            "[package]\nvenv = \"\"\n",
            "[package]\nsrc = \"/abs/src\"\n",
            "[package]\nlicense = \" \"\n",
            "[assets]\ntimeout_secs = 0\n",
            "[assets]\nlicense_url = \"https://example.com/mit\"\n",
        ] {
            let err = Config::from_toml_str(content).unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{content} should fail");
        }
    }

    #[test]
    fn test_load_or_default_writes_reference_file() {
        let home = TempDir::new().unwrap();
        let dirs = PlatformDirs::new(OperatingSystem::Posix, home.path());

        let config = Config::load_or_default(&dirs).unwrap();
        assert_eq!(config, Config::default());

        let reference = dirs.default_config_file().unwrap();
        let reloaded = Config::load(&reference).unwrap();
        assert_eq!(reloaded, Config::default());
    }

    #[test]
    fn test_load_or_default_reads_user_file() {
        let home = TempDir::new().unwrap();
        let dirs = PlatformDirs::new(OperatingSystem::Posix, home.path());
        fs::write(dirs.config_file().unwrap(), "[git]\nuse_email = false\n").unwrap();

        let config = Config::load_or_default(&dirs).unwrap();
        assert!(!config.git.use_email);
    }
}
