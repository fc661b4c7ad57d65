use colored::Colorize;
use serde_json::Value;

/// Print the computation envelope as pretty JSON, the default `--output`.
pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("{}: could not render result as JSON: {}", "error".red().bold(), e),
    }
}
