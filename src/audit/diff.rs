//! Diff generation for audit logging
//!
//! Produces a one-line summary of the top-level fields that changed between
//! two serialized entity states. Nested objects (such as an expense's payment
//! method) are compared with dotted paths.

use serde_json::Value;

/// Summarize the changes between two JSON values, or `None` if equal
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let mut changes = Vec::new();
    collect_changes(before, after, "", &mut changes);

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn collect_changes(before: &Value, after: &Value, prefix: &str, changes: &mut Vec<String>) {
    let path = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", prefix, key)
        }
    };

    match (before, after) {
        (Value::Object(before_obj), Value::Object(after_obj)) => {
            for (key, before_val) in before_obj {
                match after_obj.get(key) {
                    Some(after_val) if before_val.is_object() && after_val.is_object() => {
                        collect_changes(before_val, after_val, &path(key), changes);
                    }
                    Some(after_val) if before_val != after_val => changes.push(format!(
                        "{}: {} -> {}",
                        path(key),
                        format_value(before_val),
                        format_value(after_val)
                    )),
                    Some(_) => {}
                    None => changes.push(format!(
                        "{}: {} -> (removed)",
                        path(key),
                        format_value(before_val)
                    )),
                }
            }

            for (key, after_val) in after_obj {
                if !before_obj.contains_key(key) {
                    changes.push(format!("{}: (added) -> {}", path(key), format_value(after_val)));
                }
            }
        }
        _ if before != after => {
            let label = if prefix.is_empty() { "value" } else { prefix };
            changes.push(format!(
                "{}: {} -> {}",
                label,
                format_value(before),
                format_value(after)
            ));
        }
        _ => {}
    }
}

/// Format a JSON value for human-readable display
fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.chars().count() > 50 => {
            let head: String = s.chars().take(47).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_simple_field_change() {
        let before = json!({"description": "Super", "amount": 1000});
        let after = json!({"description": "Super", "amount": 1500});

        let diff = generate_diff(&before, &after).unwrap();
        assert_eq!(diff, "amount: 1000 -> 1500");
    }

    #[test]
    fn test_nested_change_uses_dotted_path() {
        let before = json!({"payment": {"method": "credit", "card": "Visa"}});
        let after = json!({"payment": {"method": "credit", "card": "Master"}});

        let diff = generate_diff(&before, &after).unwrap();
        assert_eq!(diff, "payment.card: \"Visa\" -> \"Master\"");
    }

    #[test]
    fn test_added_and_removed_fields() {
        let before = json!({"cbu": "123"});
        let after = json!({"alias": "mi.alias"});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("cbu: \"123\" -> (removed)"));
        assert!(diff.contains("alias: (added) -> \"mi.alias\""));
    }

    #[test]
    fn test_no_changes() {
        let value = json!({"name": "Galicia"});
        assert!(generate_diff(&value, &value).is_none());
    }

    #[test]
    fn test_long_strings_truncated() {
        let long = "x".repeat(80);
        let diff = generate_diff(&json!({"d": "a"}), &json!({"d": long})).unwrap();
        assert!(diff.ends_with("...\""));
    }
}
