use serde_json::Value;

use super::format_scalar;

/// Print just the key answer value from the output.
///
/// Heuristic: look for well-known result fields in order of priority,
/// then fall back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    // Try to extract the "result" envelope
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // Priority list of key output fields
    let priority_keys = [
        "recommendedStrategy",
        "nextDueDate",
        "endingBalance",
        "interestSavings",
        "isBeneficial",
        "count",
    ];

    if let Value::Object(map) = result_obj {
        // A payoff run's headline number lives one level down in the summary
        if let Some(Value::Object(summary)) = map.get("summary") {
            if let Some(months) = summary.get("monthsToPayoff") {
                println!("{}", format_scalar(months));
                return;
            }
        }

        // Try priority keys first (skip null values)
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_scalar(val));
                    return;
                }
            }
        }

        // Fall back to first field
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_scalar(val));
            return;
        }
    }

    // Not an object, just print directly
    println!("{}", format_scalar(result_obj));
}
