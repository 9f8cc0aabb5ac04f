pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use std::str::FromStr;

use amortize_core::presenter::{format_money, format_rate};
use amortize_core::types::Currency;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::OutputFormat;

/// Fields rendered as percentages in human-facing formats.
const RATE_KEYS: &[&str] = &[
    "rate",
    "annual_rate",
    "initial_rate",
    "index_rate",
    "margin",
    "target_rate",
    "previous_rate",
    "applied_rate",
    "max_rate",
    "lifetime_ceiling",
    "blended_rate",
    "effective_rate",
    "fraction",
    "graduation_rate",
];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, currency: &Currency, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value, currency),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value, currency),
    }
}

/// Render a scalar for display: rates as percentages, other decimals as money.
pub fn display_scalar(key: &str, value: &Value, currency: &Currency) -> String {
    match value {
        Value::String(s) => match Decimal::from_str(s) {
            Ok(d) if RATE_KEYS.contains(&key) => format_rate(d),
            Ok(d) => format_money(d, currency),
            Err(_) => s.clone(),
        },
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rates_render_as_percent() {
        assert_eq!(
            display_scalar("applied_rate", &json!("0.065"), &Currency::USD),
            "6.5%"
        );
    }

    #[test]
    fn test_money_rounds_to_cents() {
        assert_eq!(
            display_scalar("payment", &json!("599.55052515"), &Currency::USD),
            "$599.55"
        );
        assert_eq!(
            display_scalar("balance", &json!("1234567.891"), &Currency::GBP),
            "£1,234,567.89"
        );
    }

    #[test]
    fn test_non_decimal_strings_pass_through() {
        let usd = Currency::USD;
        assert_eq!(display_scalar("date", &json!("2025-02-01"), &usd), "2025-02-01");
        assert_eq!(display_scalar("period", &json!(12), &usd), "12");
    }
}
