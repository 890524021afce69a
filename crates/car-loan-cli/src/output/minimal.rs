use serde_json::{Map, Value};

/// Key answers, most important first
const PRIORITY_KEYS: &[&str] = &["is_affordable", "emi", "total"];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", render_minimal(value));
}

/// Look for well-known result fields in order of priority, in the result
/// and one level of nested sections, then fall back to the first field.
pub fn render_minimal(value: &Value) -> String {
    // Try to extract the "result" envelope
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        if let Some(val) = find_priority(map) {
            return format_minimal(val);
        }

        // Fall back to first scalar field
        if let Some((key, val)) = map.iter().find(|(_, v)| !v.is_object() && !v.is_array()) {
            return format!("{}: {}", key, format_minimal(val));
        }
    }

    // Not an object, just print directly
    format_minimal(result_obj)
}

fn find_priority(map: &Map<String, Value>) -> Option<&Value> {
    let nested: Vec<&Map<String, Value>> = map.values().filter_map(Value::as_object).collect();
    for key in PRIORITY_KEYS {
        // skip null values
        if let Some(val) = map.get(*key).filter(|v| !v.is_null()) {
            return Some(val);
        }
        if let Some(val) = nested
            .iter()
            .find_map(|section| section.get(*key).filter(|v| !v.is_null()))
        {
            return Some(val);
        }
    }
    None
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_verdict_from_nested_summary() {
        let v = json!({ "result": { "summary": { "emi": "10", "is_affordable": false } } });
        assert_eq!(render_minimal(&v), "false");
    }

    #[test]
    fn test_emi_for_schedule() {
        let v = json!({ "result": { "emi": "16606.68", "rows": [] } });
        assert_eq!(render_minimal(&v), "16606.68");
    }

    #[test]
    fn test_fallback_to_first_scalar() {
        let v = json!({ "result": { "months": 60 } });
        assert_eq!(render_minimal(&v), "months: 60");
    }
}
