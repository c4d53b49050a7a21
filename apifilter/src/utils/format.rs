//! Human-readable rendering of raw values for error messages

use serde_json::Value as JsonValue;

/// Render a raw value the way error messages quote it
///
/// Strings are rendered without quotes, lists as `[a, b]` and maps as
/// `[key => value]`. Null renders as an empty string.
pub fn format_for_error(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(items) => {
            let formatted: Vec<String> = items.iter().map(format_for_error).collect();
            format!("[{}]", formatted.join(", "))
        }
        JsonValue::Object(map) => {
            let formatted: Vec<String> = map
                .iter()
                .map(|(key, val)| format!("{} => {}", key, format_for_error(val)))
                .collect();
            format!("[{}]", formatted.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_format_scalars() {
        assert_eq!(format_for_error(&json!("value")), "value");
        assert_eq!(format_for_error(&json!(42)), "42");
        assert_eq!(format_for_error(&json!(true)), "true");
        assert_eq!(format_for_error(&JsonValue::Null), "");
    }

    #[test]
    fn test_format_list() {
        assert_eq!(format_for_error(&json!(["a", 1])), "[a, 1]");
    }

    #[test]
    fn test_format_map() {
        assert_eq!(
            format_for_error(&json!({"eq": "(1,2)", "in": ["x", "y"]})),
            "[eq => (1,2), in => [x, y]]"
        );
    }
}
