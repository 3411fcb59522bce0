//! Schema validation helpers.
//!
//! This module validates a `serde_json::Value` configuration tree against a
//! [`Schema`] before it is deserialized, so users get per-attribute error
//! messages instead of a single serde failure.
//!
//! # Example
//!
//! ```
//! use hemmer_provider_synthetics::schema::{Schema, Attribute};
//! use hemmer_provider_synthetics::validation::validate;
//! use serde_json::json;
//!
//! let schema = Schema::v0()
//!     .with_attribute("name", Attribute::required_string())
//!     .with_attribute("tick_every", Attribute::optional_int64().with_int_range(30, 604800));
//!
//! let diagnostics = validate(&schema, &json!({"name": "homepage", "tick_every": 60}));
//! assert!(diagnostics.is_empty());
//!
//! let diagnostics = validate(&schema, &json!({"name": "homepage", "tick_every": 5}));
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].attribute, Some("tick_every".to_string()));
//! ```

use crate::schema::{Attribute, AttributeType, Block, Diagnostic, NestedBlock, Schema};
use regex::Regex;
use serde_json::Value;

/// Validate a JSON value against a schema.
///
/// Returns a list of diagnostics for any validation errors found.
/// An empty list means the value is valid.
///
/// # Validation Rules
///
/// - Required attributes must be present and non-null
/// - Optional attributes may be absent or null
/// - Computed attributes are skipped (provider sets these)
/// - Attribute types must match the schema
/// - Allowed values, integer ranges and patterns are enforced
/// - Nested blocks are validated recursively with min/max item constraints
pub fn validate(schema: &Schema, value: &Value) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    validate_block(&schema.block, value, "", &mut diagnostics);
    diagnostics
}

/// Validate a JSON value against a schema, returning Ok if valid or Err with diagnostics.
pub fn validate_result(schema: &Schema, value: &Value) -> Result<(), Vec<Diagnostic>> {
    let diagnostics = validate(schema, value);
    if diagnostics.is_empty() {
        Ok(())
    } else {
        Err(diagnostics)
    }
}

/// Check if a JSON value is valid against a schema.
pub fn is_valid(schema: &Schema, value: &Value) -> bool {
    validate(schema, value).is_empty()
}

fn validate_block(block: &Block, value: &Value, path: &str, diagnostics: &mut Vec<Diagnostic>) {
    let obj = match value {
        Value::Object(map) => map,
        Value::Null => return,
        _ => {
            diagnostics.push(
                Diagnostic::error("Expected object")
                    .with_detail(format!("Got {}", value_type_name(value)))
                    .with_attribute_if_not_empty(path),
            );
            return;
        },
    };

    for (name, attr) in &block.attributes {
        let attr_path = join_path(path, name);
        validate_attribute(attr, obj.get(name), &attr_path, diagnostics);
    }

    for (name, nested_block) in &block.blocks {
        let block_path = join_path(path, name);
        validate_nested_block(nested_block, obj.get(name), &block_path, diagnostics);
    }
}

fn validate_attribute(
    attr: &Attribute,
    value: Option<&Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    // Skip computed-only attributes (provider sets these)
    if attr.flags.computed && !attr.flags.optional && !attr.flags.required {
        return;
    }

    match value {
        None | Some(Value::Null) => {
            if attr.flags.required {
                diagnostics.push(
                    Diagnostic::error(format!("Missing required attribute '{}'", path))
                        .with_detail("This attribute is required and must be provided")
                        .with_attribute(path),
                );
            }
        },
        Some(v) => {
            let before = diagnostics.len();
            validate_attribute_type(&attr.attr_type, v, path, diagnostics);
            if diagnostics.len() == before {
                validate_constraints(attr, v, path, diagnostics);
            }
        },
    }
}

fn validate_attribute_type(
    attr_type: &AttributeType,
    value: &Value,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match attr_type {
        AttributeType::String => {
            if !value.is_string() {
                diagnostics.push(type_error(path, "string", value));
            }
        },
        AttributeType::Int64 => {
            if !is_int64(value) {
                diagnostics.push(type_error(path, "int64", value));
            }
        },
        AttributeType::Bool => {
            if !value.is_boolean() {
                diagnostics.push(type_error(path, "bool", value));
            }
        },
        AttributeType::List(element_type) | AttributeType::Set(element_type) => {
            if let Some(arr) = value.as_array() {
                for (i, elem) in arr.iter().enumerate() {
                    let elem_path = format!("{}.{}", path, i);
                    validate_attribute_type(element_type, elem, &elem_path, diagnostics);
                }
            } else {
                let expected = if matches!(attr_type, AttributeType::Set(_)) {
                    "set"
                } else {
                    "list"
                };
                diagnostics.push(type_error(path, expected, value));
            }
        },
        AttributeType::Map(value_type) => {
            if let Some(obj) = value.as_object() {
                for (key, val) in obj {
                    let key_path = format!("{}.{}", path, key);
                    validate_attribute_type(value_type, val, &key_path, diagnostics);
                }
            } else {
                diagnostics.push(type_error(path, "map", value));
            }
        },
    }
}

/// Value-level constraints. Lists and sets apply them to each element.
fn validate_constraints(
    attr: &Attribute,
    value: &Value,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if let Value::Array(items) = value {
        for (i, item) in items.iter().enumerate() {
            validate_scalar_constraints(attr, item, &format!("{}.{}", path, i), diagnostics);
        }
    } else {
        validate_scalar_constraints(attr, value, path, diagnostics);
    }
}

fn validate_scalar_constraints(
    attr: &Attribute,
    value: &Value,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if let Some(s) = value.as_str() {
        if !attr.allowed_values.is_empty() && !attr.allowed_values.iter().any(|v| v == s) {
            diagnostics.push(
                Diagnostic::error(format!("Invalid value for attribute '{}'", path))
                    .with_detail(format!(
                        "Expected one of [{}], got \"{}\"",
                        attr.allowed_values.join(", "),
                        s
                    ))
                    .with_attribute(path),
            );
        }

        if let Some(pattern) = &attr.pattern {
            match Regex::new(pattern) {
                Ok(re) if !re.is_match(s) => diagnostics.push(
                    Diagnostic::error(format!("Invalid value for attribute '{}'", path))
                        .with_detail(format!("\"{}\" must match {}", s, pattern))
                        .with_attribute(path),
                ),
                Ok(_) => {},
                Err(e) => diagnostics.push(
                    Diagnostic::error(format!("Invalid pattern for attribute '{}'", path))
                        .with_detail(e.to_string())
                        .with_attribute(path),
                ),
            }
        }
    }

    if let (Some((min, max)), Some(n)) = (attr.int_range, as_int64(value)) {
        if n < min || n > max {
            diagnostics.push(
                Diagnostic::error(format!("Value out of range for attribute '{}'", path))
                    .with_detail(format!("Expected {} to {}, got {}", min, max, n))
                    .with_attribute(path),
            );
        }
    }
}

fn validate_nested_block(
    nested: &NestedBlock,
    value: Option<&Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    // Lists and sets share the same JSON shape.
    match value {
        None | Some(Value::Null) => {
            if nested.min_items > 0 {
                diagnostics.push(
                    Diagnostic::error(format!(
                        "Block '{}' requires at least {} item(s)",
                        path, nested.min_items
                    ))
                    .with_attribute(path),
                );
            }
        },
        Some(Value::Array(arr)) => {
            let len = arr.len() as u32;

            if len < nested.min_items {
                diagnostics.push(
                    Diagnostic::error(format!(
                        "Block '{}' requires at least {} item(s), got {}",
                        path, nested.min_items, len
                    ))
                    .with_attribute(path),
                );
            }

            // 0 means unlimited
            if nested.max_items > 0 && len > nested.max_items {
                diagnostics.push(
                    Diagnostic::error(format!(
                        "Block '{}' allows at most {} item(s), got {}",
                        path, nested.max_items, len
                    ))
                    .with_attribute(path),
                );
            }

            for (i, item) in arr.iter().enumerate() {
                let item_path = format!("{}.{}", path, i);
                validate_block(&nested.block, item, &item_path, diagnostics);
            }
        },
        Some(v) => {
            diagnostics.push(
                Diagnostic::error(format!("Expected list for block '{}'", path))
                    .with_detail(format!("Got {}", value_type_name(v)))
                    .with_attribute(path),
            );
        },
    }
}

// Helper functions

fn join_path(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", base, name)
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn as_int64(value: &Value) -> Option<i64> {
    let Value::Number(n) = value else {
        return None;
    };
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    let f = n.as_f64()?;
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64).then_some(f as i64)
}

fn is_int64(value: &Value) -> bool {
    as_int64(value).is_some()
}

fn type_error(path: &str, expected: &str, got: &Value) -> Diagnostic {
    Diagnostic::error(format!("Invalid type for attribute '{}'", path))
        .with_detail(format!("Expected {}, got {}", expected, value_type_name(got)))
        .with_attribute(path)
}

trait DiagnosticExt {
    fn with_attribute_if_not_empty(self, path: &str) -> Self;
}

impl DiagnosticExt for Diagnostic {
    fn with_attribute_if_not_empty(self, path: &str) -> Self {
        if path.is_empty() {
            self
        } else {
            self.with_attribute(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Attribute, AttributeFlags, Block, NestedBlock, Schema};
    use serde_json::json;

    #[test]
    fn test_validate_required_string() {
        let schema = Schema::v0().with_attribute("name", Attribute::required_string());

        assert!(validate(&schema, &json!({"name": "test"})).is_empty());

        let diagnostics = validate(&schema, &json!({}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute, Some("name".to_string()));

        assert_eq!(validate(&schema, &json!({"name": null})).len(), 1);

        let diagnostics = validate(&schema, &json!({"name": 123}));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("Invalid type"));
    }

    #[test]
    fn test_validate_optional_attribute() {
        let schema = Schema::v0().with_attribute("timeout", Attribute::optional_int64());

        assert!(validate(&schema, &json!({"timeout": 42})).is_empty());
        assert!(validate(&schema, &json!({})).is_empty());
        assert!(validate(&schema, &json!({"timeout": null})).is_empty());
        assert_eq!(validate(&schema, &json!({"timeout": "soon"})).len(), 1);
    }

    #[test]
    fn test_validate_computed_attribute_skipped() {
        let schema = Schema::v0().with_attribute("monitor_id", Attribute::computed_int64());

        assert!(validate(&schema, &json!({})).is_empty());
        assert!(validate(&schema, &json!({"monitor_id": "abc"})).is_empty());
    }

    #[test]
    fn test_validate_int64() {
        let schema = Schema::v0().with_attribute("tick_every", Attribute::required_int64());

        assert!(validate(&schema, &json!({"tick_every": 60})).is_empty());
        assert!(validate(&schema, &json!({"tick_every": 60.0})).is_empty());
        assert_eq!(validate(&schema, &json!({"tick_every": 60.5})).len(), 1);
        assert_eq!(validate(&schema, &json!({"tick_every": "60"})).len(), 1);
    }

    #[test]
    fn test_validate_bool() {
        let schema = Schema::v0().with_attribute("secure", Attribute::required_bool());

        assert!(validate(&schema, &json!({"secure": true})).is_empty());
        assert!(validate(&schema, &json!({"secure": false})).is_empty());
        assert_eq!(validate(&schema, &json!({"secure": "true"})).len(), 1);
    }

    #[test]
    fn test_validate_list() {
        let schema = Schema::v0().with_attribute(
            "locations",
            Attribute::new(
                AttributeType::set(AttributeType::String),
                AttributeFlags::required(),
            ),
        );

        assert!(validate(&schema, &json!({"locations": ["aws:eu-central-1"]})).is_empty());
        assert!(validate(&schema, &json!({"locations": []})).is_empty());

        let diagnostics = validate(&schema, &json!({"locations": ["a", 123, "c"]}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute, Some("locations.1".to_string()));

        let diagnostics = validate(&schema, &json!({"locations": "aws:eu-central-1"}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].detail.as_deref(), Some("Expected set, got string"));
    }

    #[test]
    fn test_validate_map() {
        let schema = Schema::v0().with_attribute("request_headers", Attribute::optional_string_map());

        assert!(validate(
            &schema,
            &json!({"request_headers": {"Accept": "application/json"}})
        )
        .is_empty());

        let diagnostics = validate(&schema, &json!({"request_headers": {"X-Retries": 3}}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].attribute,
            Some("request_headers.X-Retries".to_string())
        );
    }

    #[test]
    fn test_validate_allowed_values() {
        let schema = Schema::v0().with_attribute(
            "type",
            Attribute::optional_string().with_allowed_values(&["web", "sigv4", "digest"]),
        );

        assert!(validate(&schema, &json!({"type": "sigv4"})).is_empty());

        let diagnostics = validate(&schema, &json!({"type": "kerberos"}));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("Invalid value"));
        assert!(diagnostics[0]
            .detail
            .as_deref()
            .is_some_and(|d| d.contains("web, sigv4, digest")));
    }

    #[test]
    fn test_validate_allowed_values_per_list_element() {
        let schema = Schema::v0().with_attribute(
            "modifiers",
            Attribute::optional_string_list().with_allowed_values(&["Alt", "Control", "meta", "Shift"]),
        );

        assert!(validate(&schema, &json!({"modifiers": ["Alt", "Shift"]})).is_empty());

        let diagnostics = validate(&schema, &json!({"modifiers": ["Alt", "Super"]}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute, Some("modifiers.1".to_string()));
    }

    #[test]
    fn test_validate_int_range() {
        let schema = Schema::v0().with_attribute(
            "monitor_priority",
            Attribute::optional_int64().with_int_range(1, 5),
        );

        assert!(validate(&schema, &json!({"monitor_priority": 1})).is_empty());
        assert!(validate(&schema, &json!({"monitor_priority": 5})).is_empty());
        assert_eq!(validate(&schema, &json!({"monitor_priority": 0})).len(), 1);
        assert_eq!(validate(&schema, &json!({"monitor_priority": 6})).len(), 1);
    }

    #[test]
    fn test_validate_pattern() {
        let schema = Schema::v0().with_attribute(
            "name",
            Attribute::required_string().with_pattern("^[A-Z][A-Z0-9_]+[A-Z0-9]$"),
        );

        assert!(validate(&schema, &json!({"name": "MY_VAR_1"})).is_empty());

        let diagnostics = validate(&schema, &json!({"name": "my_var"}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute, Some("name".to_string()));
    }

    #[test]
    fn test_validate_invalid_pattern_is_reported() {
        let schema =
            Schema::v0().with_attribute("name", Attribute::required_string().with_pattern("(["));

        let diagnostics = validate(&schema, &json!({"name": "anything"}));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("Invalid pattern"));
    }

    #[test]
    fn test_constraints_skipped_after_type_error() {
        let schema = Schema::v0().with_attribute(
            "type",
            Attribute::optional_string().with_allowed_values(&["css", "xpath"]),
        );

        let diagnostics = validate(&schema, &json!({"type": 1}));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("Invalid type"));
    }

    #[test]
    fn test_validate_nested_block_single() {
        let schema = Schema::v0().with_block(
            "request_proxy",
            NestedBlock::single(Block::new().with_attribute("url", Attribute::required_string())),
        );

        assert!(validate(&schema, &json!({"request_proxy": [{"url": "http://proxy"}]})).is_empty());
        assert!(validate(&schema, &json!({})).is_empty());

        let diagnostics = validate(&schema, &json!({"request_proxy": [{}]}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].attribute,
            Some("request_proxy.0.url".to_string())
        );

        let diagnostics = validate(
            &schema,
            &json!({"request_proxy": [{"url": "a"}, {"url": "b"}]}),
        );
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("at most 1"));
    }

    #[test]
    fn test_validate_nested_block_list() {
        let schema = Schema::v0().with_block(
            "timeframes",
            NestedBlock::set(
                Block::new().with_attribute("day", Attribute::required_int64().with_int_range(1, 7)),
            )
            .with_min_items(1),
        );

        assert!(validate(&schema, &json!({"timeframes": [{"day": 1}, {"day": 7}]})).is_empty());

        let diagnostics = validate(&schema, &json!({"timeframes": []}));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("at least 1"));

        let diagnostics = validate(&schema, &json!({"timeframes": [{"day": 8}]}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute, Some("timeframes.0.day".to_string()));

        let diagnostics = validate(&schema, &json!({"timeframes": {"day": 1}}));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("Expected list"));
    }

    #[test]
    fn test_validate_multiple_errors() {
        let schema = Schema::v0()
            .with_attribute("name", Attribute::required_string())
            .with_attribute("timeout", Attribute::required_int64())
            .with_attribute("secure", Attribute::required_bool());

        let diagnostics = validate(
            &schema,
            &json!({"name": 123, "timeout": "not a number", "secure": "yes"}),
        );
        assert_eq!(diagnostics.len(), 3);
    }

    #[test]
    fn test_validate_deeply_nested() {
        let schema = Schema::v0().with_block(
            "options_list",
            NestedBlock::single(
                Block::new().with_block(
                    "scheduling",
                    NestedBlock::single(
                        Block::new().with_attribute("timezone", Attribute::required_string()),
                    ),
                ),
            ),
        );

        assert!(validate(
            &schema,
            &json!({"options_list": [{"scheduling": [{"timezone": "UTC"}]}]})
        )
        .is_empty());

        let diagnostics = validate(
            &schema,
            &json!({"options_list": [{"scheduling": [{"timezone": 0}]}]}),
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].attribute,
            Some("options_list.0.scheduling.0.timezone".to_string())
        );
    }

    #[test]
    fn test_is_valid_helper() {
        let schema = Schema::v0().with_attribute("name", Attribute::required_string());

        assert!(is_valid(&schema, &json!({"name": "test"})));
        assert!(!is_valid(&schema, &json!({})));
    }

    #[test]
    fn test_validate_result_helper() {
        let schema = Schema::v0().with_attribute("name", Attribute::required_string());

        assert!(validate_result(&schema, &json!({"name": "test"})).is_ok());

        let result = validate_result(&schema, &json!({}));
        assert_eq!(result.unwrap_err().len(), 1);
    }

    #[test]
    fn test_validate_root_not_object() {
        let schema = Schema::v0().with_attribute("name", Attribute::required_string());

        let diagnostics = validate(&schema, &json!("not an object"));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("Expected object"));
        assert_eq!(diagnostics[0].attribute, None);
    }
}
