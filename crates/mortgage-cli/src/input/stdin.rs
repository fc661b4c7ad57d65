use serde_json::Value;
use std::io::{self, Read};

/// Loan terms piped as JSON, e.g. `echo '{"principal": 200000, ...}' | mtg payment`.
///
/// An interactive terminal or blank input means the caller is using flags.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut piped = String::new();
    io::stdin().read_to_string(&mut piped)?;
    let piped = piped.trim();
    if piped.is_empty() {
        return Ok(None);
    }

    let loan = serde_json::from_str(piped)
        .map_err(|e| format!("Failed to parse loan JSON from stdin: {}", e))?;
    Ok(Some(loan))
}
