pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Result fields holding one row per period or year.
const ROW_KEYS: [&str; 3] = ["entries", "monthly_detail", "yearly"];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Split a result object into its scalar fields and its row array, if any.
pub(crate) fn split_rows(result: &Map<String, Value>) -> (Vec<(&str, &Value)>, Option<&[Value]>) {
    let mut rows = None;
    let mut fields = Vec::with_capacity(result.len());
    for (key, val) in result {
        match val {
            Value::Array(arr) if ROW_KEYS.contains(&key.as_str()) => rows = Some(arr.as_slice()),
            _ => fields.push((key.as_str(), val)),
        }
    }
    (fields, rows)
}

/// Flatten a JSON value into a single cell.
pub(crate) fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(cell).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Headers for a row array, taken from the first object.
pub(crate) fn row_headers(rows: &[Value]) -> Vec<String> {
    match rows.first() {
        Some(Value::Object(first)) => first.keys().cloned().collect(),
        _ => Vec::new(),
    }
}

pub(crate) fn row_cells(headers: &[String], row: &Value) -> Vec<String> {
    headers
        .iter()
        .map(|h| row.get(h.as_str()).map(cell).unwrap_or_default())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_rows_separates_schedule() {
        let result = json!({
            "monthly_payment": "1073.64",
            "entries": [{"period": 1, "balance": "199759.69"}],
        });
        let (fields, rows) = split_rows(result.as_object().unwrap());
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].0, "monthly_payment");
        assert_eq!(rows.map(|r| r.len()), Some(1));
    }

    #[test]
    fn test_nested_object_kept_as_field() {
        let result = json!({"old": {"monthly_payment": "1264.14"}});
        let (fields, rows) = split_rows(result.as_object().unwrap());
        assert_eq!(fields.len(), 1);
        assert!(rows.is_none());
    }

    #[test]
    fn test_row_cells_fill_missing_with_empty() {
        let rows = vec![json!({"period": 1, "payment_date": "2025-01-01"}), json!({"period": 2})];
        let headers = row_headers(&rows);
        assert_eq!(row_cells(&headers, &rows[1]), vec!["2".to_string(), String::new()]);
    }
}
