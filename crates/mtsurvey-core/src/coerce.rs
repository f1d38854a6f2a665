//! Permissive conversions from wizard-supplied JSON values into the typed
//! field kinds. A failed conversion returns `None`; the caller decides
//! whether that degrades to a zero-equivalent or surfaces as an error.

use serde_json::{json, Value};

use crate::mirror::FieldKind;

pub fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

pub fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Lists coerce element-wise; a non-numeric element poisons the whole list.
pub fn value_to_f64_list(value: &Value) -> Option<Vec<f64>> {
    match value {
        Value::Array(items) => items.iter().map(value_to_f64).collect(),
        _ => None,
    }
}

/// Convert `value` into the canonical JSON representation of `kind`.
/// `None` means the input was not convertible at all.
pub fn convert(kind: FieldKind, value: &Value) -> Option<Value> {
    match kind {
        FieldKind::Integer => value_to_i64(value).map(|v| json!(v)),
        FieldKind::Float => value_to_f64(value).map(|v| json!(v)),
        FieldKind::Text => Some(json!(value_to_string(value))),
        FieldKind::FloatList => value_to_f64_list(value).map(|v| json!(v)),
    }
}

/// The value a numeric field degrades to when permissive coercion fails.
pub fn zero_equivalent(kind: FieldKind) -> Value {
    match kind {
        FieldKind::Integer => json!(0),
        FieldKind::Float => json!(0.0),
        FieldKind::Text => json!(""),
        FieldKind::FloatList => Value::Array(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_strings_parse() {
        assert_eq!(value_to_f64(&json!("12.5")), Some(12.5));
        assert_eq!(value_to_f64(&json!(" 12.5 ")), Some(12.5));
        assert_eq!(value_to_i64(&json!("7")), Some(7));
        assert_eq!(value_to_i64(&json!("3.9")), Some(3));
    }

    #[test]
    fn junk_does_not_parse() {
        assert_eq!(value_to_f64(&json!("not-a-number")), None);
        assert_eq!(value_to_i64(&json!(null)), None);
        assert_eq!(value_to_f64_list(&json!([1.0, "x"])), None);
    }

    #[test]
    fn convert_respects_kind() {
        assert_eq!(convert(FieldKind::Integer, &json!("42")), Some(json!(42)));
        assert_eq!(convert(FieldKind::Text, &json!(256)), Some(json!("256")));
        assert_eq!(
            convert(FieldKind::FloatList, &json!(["1", 2.5])),
            Some(json!([1.0, 2.5]))
        );
        assert_eq!(convert(FieldKind::Float, &json!("fast")), None);
    }
}
