//! Terminal output helpers for culting
//!
//! Spinners for long-running steps and the status lines printed when a
//! command finishes.

pub mod progress;
pub mod status;

pub use progress::create_spinner;
pub use status::print_success;
