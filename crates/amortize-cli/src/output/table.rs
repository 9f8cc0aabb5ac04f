use amortize_core::types::Currency;
use colored::Colorize;
use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::display_scalar;

/// Print a result as tables: scalar fields first, then one table per array
/// field (schedule, adjustments, payment changes), then warnings.
pub fn print_table(value: &Value, currency: &Currency) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => print_result(result, map, currency),
            _ => print_fields(map, currency),
        },
        Value::Array(rows) => print_rows(rows, currency),
        other => println!("{}", display_scalar("", other, currency)),
    }
}

fn print_result(result: &Map<String, Value>, envelope: &Map<String, Value>, currency: &Currency) {
    print_fields(result, currency);

    for (key, val) in result {
        if let Value::Array(rows) = val {
            if rows.iter().any(Value::is_object) {
                println!("\n{}", title(key).bold());
                print_rows(rows, currency);
            }
        }
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\n{}", "Warnings:".yellow());
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_fields(map: &Map<String, Value>, currency: &Currency) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        let cell = match val {
            Value::Array(items) if items.iter().any(Value::is_object) => continue,
            Value::Array(items) => items
                .iter()
                .map(|v| display_scalar(key, v, currency))
                .collect::<Vec<_>>()
                .join(", "),
            _ => display_scalar(key, val, currency),
        };
        builder.push_record([key.as_str(), &cell]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(rows: &[Value], currency: &Currency) {
    let Some(Value::Object(first)) = rows.first() else {
        println!("(empty)");
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);

    for row in rows {
        if let Value::Object(map) = row {
            let cells: Vec<String> = headers
                .iter()
                .map(|h| {
                    map.get(h.as_str())
                        .map(|v| display_scalar(h, v, currency))
                        .unwrap_or_default()
                })
                .collect();
            builder.push_record(cells);
        }
    }

    println!("{}", Table::from(builder));
}

fn title(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for (i, word) in key.split('_').enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let mut chars = word.chars();
        if let Some(c) = chars.next() {
            out.extend(c.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
