//! Terminal styling utilities for console output outside the menu frame

use console::{style, Emoji};

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static WAVE: Emoji<'_, '_> = Emoji("👋 ", "");

/// Print a section header with styling
pub fn print_section_header(title: &str) {
    println!();
    println!("    {}", style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print the farewell shown when leaving the menu
pub fn print_farewell() {
    println!();
    println!("    {}{}", WAVE, style("Goodbye!").cyan().bold());
    println!();
}

/// Format a numbered choice list entry (`  1. name`)
pub fn format_choice(index: usize, label: &str) -> String {
    format!("  {:>2}. {}", index + 1, label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_choice_is_one_based() {
        assert_eq!(format_choice(0, "iris.csv"), "   1. iris.csv");
        assert_eq!(format_choice(11, "x"), "  12. x");
    }
}
