//! Interpreter version records and version-manager kinds

use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static VERSION_SPEC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(3\.\d{1,2})(t?)$").expect("valid regex"));

/// A `major.minor` interpreter version, optionally a free-threaded build
///
/// Rendered back to users and config as `3.13` or `3.13t`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionRecord {
    major_minor: String,
    free_threaded: bool,
}

impl VersionRecord {
    /// Build a record from an already-extracted `major.minor` string
    #[must_use]
    pub fn new(major_minor: impl Into<String>, free_threaded: bool) -> Self {
        Self {
            major_minor: major_minor.into(),
            free_threaded,
        }
    }

    /// The `major.minor` part, e.g. `3.13`
    #[must_use]
    pub fn major_minor(&self) -> &str {
        &self.major_minor
    }

    /// Whether this is a free-threaded (no-GIL) build
    #[must_use]
    pub fn free_threaded(&self) -> bool {
        self.free_threaded
    }

    /// Minor component used for ordering; unparsable values sort first
    #[must_use]
    pub fn minor(&self) -> u32 {
        self.major_minor
            .split_once('.')
            .and_then(|(_, minor)| minor.parse().ok())
            .unwrap_or(0)
    }

    /// Lower bound suitable for `requires-python`
    #[must_use]
    pub fn requires_python(&self) -> String {
        format!(">={}", self.major_minor)
    }
}

impl fmt::Display for VersionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.free_threaded {
            write!(f, "{}t", self.major_minor)
        } else {
            f.write_str(&self.major_minor)
        }
    }
}

impl FromStr for VersionRecord {
    type Err = Error;

    /// Parse a user-supplied version such as `3.12` or `3.13t`
    fn from_str(s: &str) -> Result<Self> {
        let caps = VERSION_SPEC
            .captures(s.trim())
            .ok_or_else(|| Error::Init(format!("Invalid python version: '{s}'")))?;
        Ok(Self::new(&caps[1], !caps[2].is_empty()))
    }
}

/// Version managers culting knows how to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManagerKind {
    /// pyenv / pyenv-win
    Pyenv,
    /// The Windows `py` launcher
    Py,
    /// astral's uv
    Uv,
}

impl ManagerKind {
    /// All kinds in default priority order
    pub const ALL: [Self; 3] = [Self::Pyenv, Self::Py, Self::Uv];

    /// Short lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pyenv => "pyenv",
            Self::Py => "py",
            Self::Uv => "uv",
        }
    }
}

impl fmt::Display for ManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ManagerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pyenv" => Ok(Self::Pyenv),
            "py" => Ok(Self::Py),
            "uv" => Ok(Self::Uv),
            other => Err(Error::Config(format!("Unknown python manager '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_versions() {
        let v: VersionRecord = "3.12".parse().unwrap();
        assert_eq!(v.major_minor(), "3.12");
        assert!(!v.free_threaded());

        let v: VersionRecord = "3.13t".parse().unwrap();
        assert_eq!(v.major_minor(), "3.13");
        assert!(v.free_threaded());
        assert_eq!(v.to_string(), "3.13t");
    }

    #[test]
    fn test_invalid_versions_are_init_errors() {
        for bad in ["", "3", "2.7", "3.12.1", "3.x", "3.13tt", "py3.12"] {
            let err = bad.parse::<VersionRecord>().unwrap_err();
            assert!(err.is_init(), "{bad:?} should be rejected as init error");
        }
    }

    #[test]
    fn test_minor_and_requires_python() {
        let v = VersionRecord::new("3.9", false);
        assert_eq!(v.minor(), 9);
        assert_eq!(v.requires_python(), ">=3.9");
    }

    #[test]
    fn test_manager_kind_round_trip_names() {
        for kind in ManagerKind::ALL {
            assert_eq!(kind.as_str().parse::<ManagerKind>().unwrap(), kind);
        }
        assert!("conda".parse::<ManagerKind>().is_err());
    }
}
