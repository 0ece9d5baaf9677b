//! Versions command implementation
//!
//! Lists what each version manager has installed. Managers that are not
//! installed are skipped silently.

use anyhow::{Context, Result};
use clap::Args;
use culting_core::ManagerKind;
use culting_engine::create_manager;
use owo_colors::OwoColorize;

use crate::command::Command;
use crate::common::RuntimeContext;

/// Versions command
#[derive(Debug, Args)]
pub struct VersionsCommand {
    /// Only query this manager (default: every configured manager)
    #[arg(short, long, value_name = "MANAGER")]
    pub manager: Option<ManagerKind>,
}

impl VersionsCommand {
    fn managers(&self, context: &RuntimeContext) -> Vec<ManagerKind> {
        match self.manager {
            Some(manager) => vec![manager],
            None => context.config.python.managers.clone(),
        }
    }
}

impl Command for VersionsCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        for kind in self.managers(context) {
            let manager = create_manager(kind, &context.locator);
            let versions = manager
                .versions()
                .with_context(|| format!("Failed to list {kind} versions"))?;
            if versions.is_empty() {
                tracing::debug!(manager = %kind, "Nothing to list");
                continue;
            }

            println!("{}", kind.bold());
            for version in versions {
                println!("  {version}");
            }
        }
        Ok(())
    }
}
