pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

use mortgage_core::MortgageError;

/// Typed input from `--input <file>` or piped stdin, if either is present.
pub fn from_file_or_stdin<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_json(path)?));
    }
    match stdin::read_stdin()? {
        Some(data) => Ok(Some(serde_json::from_value(data)?)),
        None => Ok(None),
    }
}

/// A required flag, reported as invalid input naming the flag when missing.
pub fn required<T>(value: Option<T>, field: &str) -> Result<T, MortgageError> {
    value.ok_or_else(|| MortgageError::InvalidInput {
        field: field.to_string(),
        reason: format!("--{} is required (or provide --input)", field.replace('_', "-")),
    })
}
