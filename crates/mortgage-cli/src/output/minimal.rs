use serde_json::Value;

use super::cell;

/// Headline field of each command, in lookup order.
const PRIORITY_KEYS: [&str; 8] = [
    "formatted_payment",
    "formatted_total_cost",
    "monthly_payment",
    "break_even_months",
    "months_to_payoff",
    "months",
    "total_savings",
    "final_balance",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result = value.get("result").unwrap_or(value);

    if let Value::Object(map) = result {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                println!("{}", cell(val));
                return;
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, cell(val));
            return;
        }
    }

    println!("{}", cell(result));
}
