use amortize_core::types::Currency;
use serde_json::Value;

use super::display_scalar;

/// Headline fields, in priority order, for each command's result.
const PRIORITY_KEYS: &[&str] = &[
    "scheduled_payment",
    "initial_payment",
    "total_depreciation",
    "blended_rate",
    "total_interest",
    "final_balance",
];

/// Print just the headline value of a result.
pub fn print_minimal(value: &Value, currency: &Currency) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(*key).filter(|v| !v.is_null()) {
                println!("{}", display_scalar(key, val, currency));
                return;
            }
        }
        if let Some((key, val)) = map.iter().find(|(_, v)| !v.is_array()) {
            println!("{}: {}", key, display_scalar(key, val, currency));
            return;
        }
    }

    println!("{}", display_scalar("", result_obj, currency));
}
