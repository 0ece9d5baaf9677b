//! Logging configuration for culting CLI
//!
//! Terminal output goes to stderr so forwarded tool output on stdout stays
//! clean. A persistent debug log is appended to the state directory.

use crate::Result;
use std::path::Path;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the logging system
///
/// # Arguments
/// * `debug` - Enable debug level logging on the terminal
/// * `log_file` - Optional path to append a debug log to
///
/// # Examples
/// ```ignore
/// // Basic usage with info level
/// init(false, None)?;
///
/// // Debug mode, also writing to the state directory
/// init(true, Some(&dirs.log_file()?))?;
/// ```
pub fn init(debug: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if debug { "debug" } else { "info" };

    // Allows overriding with RUST_LOG env var
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "culting={level},culting_engine={level},culting_config={level},culting_template={level}"
        ))
    });

    let terminal_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .with_ansi(true);

    // No timestamps in normal mode
    let terminal_layer = if debug {
        terminal_layer.with_filter(env_filter).boxed()
    } else {
        terminal_layer
            .without_time()
            .with_filter(env_filter)
            .boxed()
    };

    let file_layer = match log_file {
        Some(log_path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)?;

            Some(
                fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        None => None,
    };

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(terminal_layer)
        .with(file_layer)
        .try_init();

    Ok(())
}
