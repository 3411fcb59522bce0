//! Scalar conversions between configuration text and model values.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

use crate::model::TargetValue;

/// A deferred `{{ VARIABLE }}` expression.
static TEMPLATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([^{}]*?)\s*\}\}").expect("valid regex"));

/// Whether `value` contains a template expression resolved at run time.
pub fn is_template(value: &str) -> bool {
    TEMPLATE_RE.is_match(value)
}

/// Render any model value as configuration text.
///
/// Booleans and numbers use their plain text form, floats the shortest
/// decimal that round-trips. Strings pass through. Anything else falls back
/// to its JSON text.
pub fn convert_to_string(value: &Value) -> String {
    match value {
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                int.to_string()
            } else if let Some(uint) = number.as_u64() {
                uint.to_string()
            } else {
                number.as_f64().map(format_float).unwrap_or_else(|| number.to_string())
            }
        }
        Value::String(text) => text.clone(),
        Value::Null | Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Render a target value as configuration text.
pub fn target_to_string(target: &TargetValue) -> String {
    match target {
        TargetValue::Integer(int) => int.to_string(),
        TargetValue::Float(float) => format_float(*float),
        TargetValue::String(text) => text.clone(),
        TargetValue::Other(raw) => convert_to_string(raw),
    }
}

/// Shortest round-trip decimal, never in exponent form.
pub fn format_float(value: f64) -> String {
    format!("{}", value)
}

/// Parse integer configuration text. Failures mean "no value set".
pub(crate) fn parse_int(raw: &str, attribute: &str) -> Option<i64> {
    match raw.trim().parse::<i64>() {
        Ok(value) => Some(value),
        Err(err) => {
            debug!(attribute, raw, error = %err, "not an integer; leaving the value unset");
            None
        }
    }
}

/// Parse float configuration text. Failures mean "no value set".
pub(crate) fn parse_float(raw: &str, attribute: &str) -> Option<f64> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        Ok(_) => {
            debug!(attribute, raw, "not a finite number; leaving the value unset");
            None
        }
        Err(err) => {
            debug!(attribute, raw, error = %err, "not a number; leaving the value unset");
            None
        }
    }
}

/// How a target is typed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericTarget {
    /// Whole numbers are sent as JSON integers.
    Integer,
    /// Numbers are sent as JSON floats.
    Float,
}

/// Type configuration text for the wire.
///
/// Templates stay strings even for numeric targets. Numeric text that does
/// not parse yields no value.
pub(crate) fn typed_target(
    raw: &str,
    numeric: Option<NumericTarget>,
    attribute: &str,
) -> Option<TargetValue> {
    if raw.is_empty() {
        return None;
    }
    if is_template(raw) {
        return Some(TargetValue::String(raw.to_string()));
    }
    match numeric {
        Some(NumericTarget::Integer) => parse_int(raw, attribute).map(TargetValue::Integer),
        Some(NumericTarget::Float) => parse_float(raw, attribute).map(TargetValue::Float),
        None => Some(TargetValue::String(raw.to_string())),
    }
}

/// Empty text is unset.
pub(crate) fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Zero is unset.
pub(crate) fn non_zero(value: i64) -> Option<i64> {
    (value != 0).then_some(value)
}

/// `false` is unset.
pub(crate) fn if_true(value: bool) -> Option<bool> {
    value.then_some(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_convert_to_string_is_total() {
        assert_eq!(convert_to_string(&json!(true)), "true");
        assert_eq!(convert_to_string(&json!(false)), "false");
        assert_eq!(convert_to_string(&json!(42)), "42");
        assert_eq!(convert_to_string(&json!(-7)), "-7");
        assert_eq!(convert_to_string(&json!(u64::MAX)), u64::MAX.to_string());
        assert_eq!(convert_to_string(&json!(0.1)), "0.1");
        assert_eq!(convert_to_string(&json!(5.0)), "5");
        assert_eq!(convert_to_string(&json!("text")), "text");
        assert_eq!(convert_to_string(&json!(null)), "null");
        assert_eq!(convert_to_string(&json!([1, "a"])), r#"[1,"a"]"#);
        assert_eq!(convert_to_string(&json!({"a": 1})), r#"{"a":1}"#);
    }

    #[test]
    fn test_large_floats_have_no_exponent() {
        assert_eq!(format_float(1e21), "1000000000000000000000");
        assert_eq!(format_float(0.000001), "0.000001");
    }

    #[test]
    fn test_target_to_string() {
        assert_eq!(target_to_string(&TargetValue::Integer(200)), "200");
        assert_eq!(target_to_string(&TargetValue::Float(2.5)), "2.5");
        assert_eq!(target_to_string(&TargetValue::String("ok".into())), "ok");
        assert_eq!(target_to_string(&TargetValue::Other(json!({"k": "v"}))), r#"{"k":"v"}"#);
    }

    #[test]
    fn test_templates() {
        assert!(is_template("{{ PORT }}"));
        assert!(is_template("{{PORT}}"));
        assert!(is_template("prefix-{{ VALUE }}"));
        assert!(!is_template("{ PORT }"));
        assert!(!is_template("42"));
    }

    #[test]
    fn test_typed_target() {
        let integer = Some(NumericTarget::Integer);
        assert_eq!(typed_target("42", integer, "t"), Some(TargetValue::Integer(42)));
        assert_eq!(
            typed_target("{{ CODE }}", integer, "t"),
            Some(TargetValue::String("{{ CODE }}".to_string()))
        );
        assert_eq!(typed_target("fast", integer, "t"), None);
        assert_eq!(typed_target("", integer, "t"), None);

        let float = Some(NumericTarget::Float);
        assert_eq!(typed_target("12.5", float, "t"), Some(TargetValue::Float(12.5)));
        assert_eq!(typed_target("NaN", float, "t"), None);

        assert_eq!(
            typed_target("42", None, "t"),
            Some(TargetValue::String("42".to_string()))
        );
    }

    #[test]
    fn test_zero_values_are_unset() {
        assert_eq!(non_empty(""), None);
        assert_eq!(non_empty("GET").as_deref(), Some("GET"));
        assert_eq!(non_zero(0), None);
        assert_eq!(non_zero(30), Some(30));
        assert_eq!(if_true(false), None);
        assert_eq!(if_true(true), Some(true));
    }
}
