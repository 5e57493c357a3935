// ============================================================================
// cropwise-cli/src/terminal.rs
// ============================================================================
//
// TERMINAL OUTPUT: Sections and Status Lines
//
// Human-readable output of the CLI. Results go to stdout; warnings go to
// stderr so `--json` output stays parseable.
//
// AI-ASSISTANT-INFO: Terminal UI helpers for the CLI

use console::style;

/// Styling constants for terminal output
pub mod styling {
    pub const SECTION_PREFIX: &str = "===== ";
    pub const SECTION_SUFFIX: &str = " =====";
    pub const STATUS_INDENT: &str = "  ";
    pub const LABEL_WIDTH: usize = 16;
    pub const WARNING_SYMBOL: &str = "!";
    pub const ERROR_SYMBOL: &str = "✗";
}

pub fn print_section(title: &str) {
    println!();
    println!(
        "{}",
        style(format!("{}{}{}", styling::SECTION_PREFIX, title, styling::SECTION_SUFFIX)).bold()
    );
}

/// Prints `label: value`, with the value emphasized when `highlight` is set.
pub fn print_status(label: &str, value: &str, highlight: bool) {
    let label = format!("{}:", label);
    let value = if highlight {
        style(value).green().bold().to_string()
    } else {
        value.to_string()
    };
    println!(
        "{}{:<width$} {}",
        styling::STATUS_INDENT,
        label,
        value,
        width = styling::LABEL_WIDTH
    );
}

pub fn print_warning(message: &str) {
    eprintln!(
        "{} {}",
        style(styling::WARNING_SYMBOL).yellow().bold().for_stderr(),
        style(message).yellow().for_stderr()
    );
}

pub fn print_error(message: &str) {
    eprintln!(
        "{} {}",
        style(styling::ERROR_SYMBOL).red().bold().for_stderr(),
        style(message).red().for_stderr()
    );
}

/// Formats an optional dimension, `auto` when unset.
#[must_use]
pub fn format_dimension(value: Option<u32>) -> String {
    value.map_or_else(|| "auto".to_string(), |v| v.to_string())
}
