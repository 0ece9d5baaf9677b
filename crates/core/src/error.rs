//! Base error types for culting
//!
//! Every library crate shares this taxonomy so that the CLI can decide
//! severity (fatal vs. tolerated) by variant instead of by message.

use std::path::PathBuf;
use thiserror::Error;

/// Base error type for shared functionality
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The running operating system is not one of the supported families
    #[error("OS '{os}' not supported")]
    UnsupportedPlatform { os: String },

    /// The user's home directory could not be determined
    #[error("Could not determine the home directory")]
    HomeDirNotFound,

    /// A mandatory executable is not on the search path
    #[error("Executable '{name}' not found")]
    ExecutableNotFound { name: String },

    /// A subprocess wrote to stderr or exited unsuccessfully
    #[error("Command `{command}` failed{}: {}", exit_suffix(.exit_code), stderr_or_placeholder(.stderr))]
    Subprocess {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// A subprocess exceeded its wall-clock limit and was killed
    #[error("Command `{command}` timed out after {seconds} seconds")]
    Timeout { command: String, seconds: u64 },

    /// Tool output did not contain what we were looking for
    #[error("{expected} not found in output of `{command}`")]
    OutputNotRecognized { command: String, expected: String },

    /// A version manager has no interpreter for the requested version
    #[error("Python {version} not found with {manager}")]
    VersionNotFound { manager: String, version: String },

    /// Project initialization validation failure
    #[error("{0}")]
    Init(String),

    /// A path that must not exist or must be empty
    #[error("Directory is not empty: {}", .0.display())]
    DirectoryNotEmpty(PathBuf),

    /// Remote asset fetch failure
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Template rendering failure
    #[error("Template error: {0}")]
    Template(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error message
    #[error("{0}")]
    Message(String),
}

#[allow(clippy::ref_option)]
fn exit_suffix(code: &Option<i32>) -> String {
    code.map(|c| format!(" (exit code {c})")).unwrap_or_default()
}

fn stderr_or_placeholder(stderr: &str) -> &str {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        "no diagnostic output"
    } else {
        trimmed
    }
}

impl Error {
    /// Whether this error belongs to the initialization-validation family
    #[must_use]
    pub fn is_init(&self) -> bool {
        matches!(self, Self::Init(_) | Self::DirectoryNotEmpty(_))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
