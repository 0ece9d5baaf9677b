//! # Culting Engine
//!
//! Discovery and orchestration of the external tools culting drives.
//!
//! - **Command**: binary resolution on the search path and blocking execution
//! - **Parsers**: pure extraction of versions and paths from tool output
//! - **Resolvers**: the interpreter, version managers (pyenv, py, uv) and git
//! - **Forwarding**: transparent relay of arguments to a resolved binary
//! - **Project**: the ordered steps that bootstrap a new project
//! - **Package**: `run` / `install` support inside an existing project

pub mod command;
pub mod forward;
pub mod git;
pub mod manager;
pub mod package;
pub mod parse;
pub mod project;
pub mod python;
pub mod venv;

// Re-export error types from core
pub use culting_core::{Error, Result};

// Re-export commonly used types
pub use command::{Binary, Invocation, Locator};
pub use forward::{CommandForwarder, ForwardOutcome, ForwardResult};
pub use git::{Git, GitIdentity};
pub use manager::{
    InterpreterRequest, PyLauncher, Pyenv, PythonManager, Uv, create_manager, resolve_interpreter,
};
pub use package::Package;
pub use project::{
    InitOptions, InitStage, NameCheck, ProjectDescriptor, ProjectInitializer,
    validate_project_name,
};
pub use python::Interpreter;
pub use venv::Venv;

#[cfg(all(test, unix))]
#[allow(clippy::unwrap_used)]
mod testing;
