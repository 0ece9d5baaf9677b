//! Core types and utilities for culting
//!
//! This is the foundation crate (Layer 0) that all other culting crates depend on.
//! It provides:
//! - Base error types
//! - Platform detection
//! - Interpreter version records and version-manager kinds
//!
//! This crate has no dependencies on other culting crates.

pub mod error;
pub mod platform;
pub mod python;

pub use error::{Error, Result};
pub use platform::{OperatingSystem, Platform};
pub use python::{ManagerKind, VersionRecord};

/// Application name used for directories, log files and config files
pub const APP_NAME: &str = "culting";
