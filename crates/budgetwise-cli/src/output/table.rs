use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::format_scalar;

/// Format output as tables using the tabled crate.
///
/// Envelope results print their scalar fields first, then every array field
/// (payoff schedules, ledger entries, occurrence lists) as its own table,
/// then warnings and methodology.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result(result);
                print_envelope_footer(map);
            } else {
                print_object(value);
            }
        }
        Value::Array(arr) => print_rows(arr),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value) {
    let Value::Object(map) = result else {
        println!("{}", result);
        return;
    };

    // Scalar fields as one Field/Value table
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        if !val.is_array() {
            builder.push_record([key.as_str(), &format_scalar(val)]);
        }
    }
    println!("{}", Table::from(builder));

    // Each array field as its own table
    for (key, val) in map {
        if let Value::Array(rows) = val {
            if rows.is_empty() {
                continue;
            }
            println!("\n{}:", key);
            print_rows(rows);
        }
    }
}

fn print_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_scalar(val)]);
        }
        println!("{}", Table::from(builder));
    }
}

fn print_rows(rows: &[Value]) {
    if rows.is_empty() {
        println!("(empty)");
        return;
    }

    match rows.first() {
        Some(Value::Object(first)) => {
            let headers: Vec<String> = first.keys().cloned().collect();
            let mut builder = Builder::default();
            builder.push_record(&headers);
            for row in rows {
                if let Value::Object(map) = row {
                    let record: Vec<String> = headers
                        .iter()
                        .map(|h| map.get(h).map(format_scalar).unwrap_or_default())
                        .collect();
                    builder.push_record(&record);
                }
            }
            println!("{}", Table::from(builder));
        }
        _ => {
            // Array of scalars, one per line
            for row in rows {
                println!("{}", format_scalar(row));
            }
        }
    }
}

fn print_envelope_footer(envelope: &serde_json::Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(methodology)) = envelope.get("methodology") {
        println!("\nMethodology: {}", methodology);
    }
}
