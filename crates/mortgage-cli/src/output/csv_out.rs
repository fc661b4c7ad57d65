use serde_json::Value;
use std::io;

use super::{cell, row_cells, row_headers, split_rows};

/// Write output as CSV to stdout.
///
/// Results carrying per-period rows (a schedule, a payoff timeline, a growth
/// projection) are written one row per period; anything else becomes
/// two-column `field,value` records.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value.get("result").unwrap_or(value);
    match result {
        Value::Object(map) => match split_rows(map) {
            (_, Some(rows)) => write_rows(&mut wtr, rows),
            (fields, None) => {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in fields {
                    let _ = wtr.write_record([key, cell(val).as_str()]);
                }
            }
        },
        Value::Array(arr) => write_rows(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([cell(result)]);
        }
    }

    let _ = wtr.flush();
}

fn write_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    let headers = row_headers(rows);
    if headers.is_empty() {
        for row in rows {
            let _ = wtr.write_record([cell(row)]);
        }
        return;
    }

    let _ = wtr.write_record(&headers);
    for row in rows {
        let _ = wtr.write_record(row_cells(&headers, row));
    }
}
