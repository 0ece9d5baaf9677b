//! # Culting Template
//!
//! Generated-file rendering for culting using minijinja, plus the asset
//! source that fetches license and ignore-file texts.
//!
//! Only the *content* of generated files lives here; deciding when and where
//! they are written belongs to the project initializer.

pub mod assets;
pub mod context;
pub mod engine;
pub mod functions;

pub use assets::{AssetSource, HttpAssetSource};
pub use context::ProjectContext;
pub use engine::TemplateEngine;

pub use culting_core::{Error, Result};

/// Convert a minijinja error into a core template error with its location
pub(crate) fn template_error(err: &minijinja::Error) -> Error {
    let location = match (err.name(), err.line()) {
        (Some(name), Some(line)) => format!("{name} line {line}"),
        (Some(name), None) => name.to_string(),
        (None, Some(line)) => format!("line {line}"),
        (None, None) => "unknown location".to_string(),
    };
    Error::Template(format!("{location}: {err}"))
}
