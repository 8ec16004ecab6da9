use serde_json::Value;
use std::io;

use super::format_scalar;

/// Row-shaped result fields, in the order they should win when several are
/// present. A payoff schedule or a projection ledger makes a far more useful
/// CSV than a field/value dump.
const ROW_FIELDS: [&str; 3] = ["entries", "schedule", "occurrences"];

/// Write output as CSV to stdout.
///
/// Envelope results whose payload carries a row array (payoff schedules,
/// ledger entries, occurrence lists) emit that array as CSV rows; everything
/// else falls back to two-column field/value records.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            let result = match map.get("result") {
                Some(Value::Object(result)) => result,
                _ => map,
            };

            let rows = ROW_FIELDS
                .iter()
                .find_map(|f| match result.get(*f) {
                    Some(Value::Array(rows)) if !rows.is_empty() => Some(rows),
                    _ => None,
                });

            match rows {
                Some(rows) => write_array_csv(&mut wtr, rows),
                None => {
                    let _ = wtr.write_record(["field", "value"]);
                    for (key, val) in result {
                        if !val.is_array() {
                            let _ = wtr.write_record([key.as_str(), &format_scalar(val)]);
                        }
                    }
                }
            }
        }
        Value::Array(arr) => {
            write_array_csv(&mut wtr, arr);
        }
        _ => {
            let _ = wtr.write_record([&format_scalar(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    // Headers come from the first object's keys
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_scalar).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_scalar(item)]);
        }
    }
}
