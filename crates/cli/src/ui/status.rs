//! Final status lines

use owo_colors::OwoColorize;

/// `✓ message` in green on stdout
pub fn print_success(message: &str) {
    println!("{} {message}", "✓".green().bold());
}

