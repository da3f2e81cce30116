//! Output formatting utilities for consistent CLI presentation.
//!
//! Every subcommand reports through these helpers so messages share one color
//! scheme: red for errors, green for success, white for plain information and
//! bright black for secondary details.

use colored::*;

/// Formats and prints an error message with consistent styling
///
/// # Format
/// ```text
///
/// ✕ Error: <message>
///
/// ```
pub fn print_error(message: &str) {
    println!("\n{} {}\n", "✕ Error:".red(), message.white());
}

/// Formats and prints a success message
///
/// # Format
/// ```text
///
/// ✓ <message>
/// ```
pub fn print_success(message: &str) {
    println!("\n{} {}", "✓".green(), message.white());
}

/// Formats and prints an informational message surrounded by blank lines
pub fn print_info(message: &str) {
    println!("\n{}\n", message.white());
}

/// Formats and prints a section header
pub fn print_section_header(header: &str) {
    println!("\n{}:\n", header.white());
}

/// Prints an aligned `label  value` line below a section header
pub fn print_field(label: &str, value: &str) {
    let label = format!("{:<14}", format!("{label}:"));
    println!("  {}{}", label.bright_black(), value.white());
}
