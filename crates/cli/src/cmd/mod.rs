//! CLI command implementations

pub mod forward;
pub mod init;
pub mod install;
pub mod run;
pub mod versions;
