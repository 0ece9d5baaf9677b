//! Configuration management for culting
//!
//! This crate handles:
//! - Per-OS config/state/cache directory derivation
//! - Configuration loading and validation
//! - Logging initialization

pub mod config;
pub mod dirs;
pub mod logging;

// Re-export error types from core
pub use culting_core::{Error, Result};

// Re-export main types
pub use config::{AssetsConfig, Config, GeneralConfig, GitConfig, PackageConfig, PythonConfig};
pub use dirs::PlatformDirs;
