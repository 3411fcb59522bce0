//! Assertion blocks to and from the model's assertion variants.

use serde_json::Value;

use super::value::{non_empty, target_to_string, typed_target, NumericTarget};
use super::warning;
use crate::model::{
    Assertion, AssertionKey, AssertionKind, BodyHashAssertion, JavascriptAssertion,
    JsonPathAssertion, JsonPathTarget, JsonSchemaAssertion, JsonSchemaTarget, TargetAssertion,
    XPathAssertion, XPathTarget, ASSERTION_RULES,
};
use crate::schema::Diagnostic;
use crate::state::{AssertionConfig, JsonPathTargetConfig, JsonSchemaTargetConfig, XPathTargetConfig};
use crate::variant::{Rule, RuleTable};

const INTEGER_TARGET_TYPES: &[&str] = &[
    "responseTime",
    "certificate",
    "latency",
    "packetsReceived",
    "networkHop",
    "grpcHealthcheckStatus",
];

/// (type, operator) pairs whose plain `target` is numeric on the wire.
pub static TARGET_TYPING: RuleTable<AssertionKey, NumericTarget> = RuleTable::new(
    "numeric target",
    &[
        Rule {
            name: "integer type",
            matches: |k| INTEGER_TARGET_TYPES.contains(&k.assertion_type.as_str()),
            kind: NumericTarget::Integer,
        },
        Rule {
            name: "status code equality",
            matches: |k| k.assertion_type == "statusCode" && matches!(k.operator.as_str(), "is" | "isNot"),
            kind: NumericTarget::Integer,
        },
        Rule {
            name: "packet loss",
            matches: |k| k.assertion_type == "packetLossPercentage",
            kind: NumericTarget::Float,
        },
    ],
);

/// Typing of a JSONPath / XPath `targetvalue`, keyed by the inner operator.
fn sub_target_typing(operator: &str) -> Option<NumericTarget> {
    matches!(operator, "lessThan" | "moreThan").then_some(NumericTarget::Float)
}

pub(crate) fn build_assertions(
    configs: &[AssertionConfig],
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<Assertion> {
    configs
        .iter()
        .enumerate()
        .filter_map(|(index, config)| {
            build_assertion(config, &format!("{}.{}", path, index), diagnostics)
        })
        .collect()
}

fn build_assertion(
    config: &AssertionConfig,
    attribute: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Assertion> {
    let key = AssertionKey::new(&config.assertion_type, &config.operator);
    let kind = ASSERTION_RULES.resolve(&key, &key.to_string(), attribute, diagnostics)?;

    let assertion = match kind {
        AssertionKind::Javascript => {
            ignore_target(config, "javascript", attribute, diagnostics);
            Assertion::Javascript(JavascriptAssertion {
                code: config.code.clone(),
                assertion_type: config.assertion_type.clone(),
            })
        }
        AssertionKind::JsonSchema => {
            ignore_target(config, &config.operator, attribute, diagnostics);
            Assertion::JsonSchema(JsonSchemaAssertion {
                operator: config.operator.clone(),
                target: config.targetjsonschema.as_ref().map(|target| JsonSchemaTarget {
                    json_schema: non_empty(&target.jsonschema),
                    meta_schema: non_empty(&target.metaschema),
                }),
                assertion_type: config.assertion_type.clone(),
            })
        }
        AssertionKind::JsonPath => {
            ignore_target(config, &config.operator, attribute, diagnostics);
            Assertion::JsonPath(JsonPathAssertion {
                operator: config.operator.clone(),
                property: non_empty(&config.property),
                target: config.targetjsonpath.as_ref().map(|target| JsonPathTarget {
                    elements_operator: non_empty(&target.elementsoperator),
                    json_path: non_empty(&target.jsonpath),
                    operator: non_empty(&target.operator),
                    target_value: match target.operator.as_str() {
                        "isUndefined" => None,
                        operator => typed_target(
                            &target.targetvalue,
                            sub_target_typing(operator),
                            &format!("{}.targetjsonpath.0.targetvalue", attribute),
                        ),
                    },
                }),
                assertion_type: config.assertion_type.clone(),
            })
        }
        AssertionKind::XPath => {
            ignore_target(config, &config.operator, attribute, diagnostics);
            Assertion::XPath(XPathAssertion {
                operator: config.operator.clone(),
                property: non_empty(&config.property),
                target: config.targetxpath.as_ref().map(|target| XPathTarget {
                    operator: non_empty(&target.operator),
                    target_value: typed_target(
                        &target.targetvalue,
                        sub_target_typing(&target.operator),
                        &format!("{}.targetxpath.0.targetvalue", attribute),
                    ),
                    x_path: non_empty(&target.xpath),
                }),
                assertion_type: config.assertion_type.clone(),
            })
        }
        AssertionKind::BodyHash => {
            ignore_sub_targets(config, attribute, diagnostics);
            Assertion::BodyHash(BodyHashAssertion {
                operator: config.operator.clone(),
                target: typed_target(&config.target, None, &format!("{}.target", attribute)),
                assertion_type: config.assertion_type.clone(),
            })
        }
        AssertionKind::Target => {
            ignore_sub_targets(config, attribute, diagnostics);
            Assertion::Target(TargetAssertion {
                operator: config.operator.clone(),
                property: non_empty(&config.property),
                target: typed_target(
                    &config.target,
                    TARGET_TYPING.classify(&key),
                    &format!("{}.target", attribute),
                ),
                assertion_type: config.assertion_type.clone(),
                timings_scope: non_empty(&config.timings_scope),
            })
        }
    };
    Some(assertion)
}

/// Warn about a plain `target` next to a variant that carries its own.
fn ignore_target(
    config: &AssertionConfig,
    variant: &str,
    attribute: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if !config.target.is_empty() {
        ignored_field(diagnostics, attribute, "target", variant);
    }
}

/// Warn about nested target blocks next to a plain target assertion.
fn ignore_sub_targets(config: &AssertionConfig, attribute: &str, diagnostics: &mut Vec<Diagnostic>) {
    let operator = config.operator.as_str();
    if config.targetjsonschema.is_some() {
        ignored_field(diagnostics, attribute, "targetjsonschema", operator);
    }
    if config.targetjsonpath.is_some() {
        ignored_field(diagnostics, attribute, "targetjsonpath", operator);
    }
    if config.targetxpath.is_some() {
        ignored_field(diagnostics, attribute, "targetxpath", operator);
    }
}

fn ignored_field(diagnostics: &mut Vec<Diagnostic>, attribute: &str, field: &str, variant: &str) {
    warning(
        diagnostics,
        &format!("{}.{}", attribute, field),
        "Ignored assertion attribute",
        format!("`{}` does not apply to a `{}` assertion and is not sent", field, variant),
    );
}

pub(crate) fn flatten_assertions(
    assertions: &[Assertion],
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<AssertionConfig> {
    assertions
        .iter()
        .enumerate()
        .map(|(index, assertion)| {
            flatten_assertion(assertion, &format!("{}.{}", path, index), diagnostics)
        })
        .collect()
}

fn flatten_assertion(
    assertion: &Assertion,
    attribute: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> AssertionConfig {
    match assertion {
        Assertion::Target(target) => AssertionConfig {
            assertion_type: target.assertion_type.clone(),
            operator: target.operator.clone(),
            property: target.property.clone().unwrap_or_default(),
            target: target.target.as_ref().map(target_to_string).unwrap_or_default(),
            timings_scope: target.timings_scope.clone().unwrap_or_default(),
            ..Default::default()
        },
        Assertion::JsonSchema(schema) => AssertionConfig {
            assertion_type: schema.assertion_type.clone(),
            operator: schema.operator.clone(),
            targetjsonschema: schema.target.as_ref().map(|target| JsonSchemaTargetConfig {
                jsonschema: target.json_schema.clone().unwrap_or_default(),
                metaschema: target.meta_schema.clone().unwrap_or_default(),
            }),
            ..Default::default()
        },
        Assertion::JsonPath(path) => AssertionConfig {
            assertion_type: path.assertion_type.clone(),
            operator: path.operator.clone(),
            property: path.property.clone().unwrap_or_default(),
            targetjsonpath: path.target.as_ref().map(|target| JsonPathTargetConfig {
                jsonpath: target.json_path.clone().unwrap_or_default(),
                operator: target.operator.clone().unwrap_or_default(),
                targetvalue: target.target_value.as_ref().map(target_to_string).unwrap_or_default(),
                elementsoperator: target.elements_operator.clone().unwrap_or_default(),
            }),
            ..Default::default()
        },
        Assertion::XPath(xpath) => AssertionConfig {
            assertion_type: xpath.assertion_type.clone(),
            operator: xpath.operator.clone(),
            property: xpath.property.clone().unwrap_or_default(),
            targetxpath: xpath.target.as_ref().map(|target| XPathTargetConfig {
                xpath: target.x_path.clone().unwrap_or_default(),
                operator: target.operator.clone().unwrap_or_default(),
                targetvalue: target.target_value.as_ref().map(target_to_string).unwrap_or_default(),
            }),
            ..Default::default()
        },
        Assertion::BodyHash(hash) => AssertionConfig {
            assertion_type: hash.assertion_type.clone(),
            operator: hash.operator.clone(),
            target: hash.target.as_ref().map(target_to_string).unwrap_or_default(),
            ..Default::default()
        },
        Assertion::Javascript(script) => AssertionConfig {
            assertion_type: script.assertion_type.clone(),
            code: script.code.clone(),
            ..Default::default()
        },
        Assertion::Unknown(raw) => {
            let field = |name: &str| raw.get(name).and_then(Value::as_str).unwrap_or_default().to_string();
            let (assertion_type, operator) = (field("type"), field("operator"));
            warning(
                diagnostics,
                attribute,
                "Unrecognized assertion variant",
                format!("\"{}/{}\" is not supported; only its type and operator are kept", assertion_type, operator),
            );
            AssertionConfig {
                assertion_type,
                operator,
                ..Default::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TargetValue;
    use serde_json::json;

    fn assertion(assertion_type: &str, operator: &str, target: &str) -> AssertionConfig {
        AssertionConfig {
            assertion_type: assertion_type.to_string(),
            operator: operator.to_string(),
            target: target.to_string(),
            ..Default::default()
        }
    }

    fn build_one(config: AssertionConfig) -> (Option<Assertion>, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let mut built = build_assertions(&[config], "assertion", &mut diagnostics);
        (built.pop(), diagnostics)
    }

    #[test]
    fn test_target_typing_table() {
        let typing = |t: &str, o: &str| TARGET_TYPING.classify(&AssertionKey::new(t, o));
        assert_eq!(typing("responseTime", "lessThan"), Some(NumericTarget::Integer));
        assert_eq!(typing("statusCode", "is"), Some(NumericTarget::Integer));
        assert_eq!(typing("statusCode", "isNot"), Some(NumericTarget::Integer));
        assert_eq!(typing("statusCode", "matches"), None);
        assert_eq!(typing("packetLossPercentage", "lessThan"), Some(NumericTarget::Float));
        assert_eq!(typing("body", "contains"), None);
    }

    #[test]
    fn test_status_code_target_is_integer() {
        let (built, diagnostics) = build_one(assertion("statusCode", "is", "200"));

        assert!(diagnostics.is_empty());
        let value = serde_json::to_value(built.unwrap()).unwrap();
        assert_eq!(value, json!({"type": "statusCode", "operator": "is", "target": 200}));
    }

    #[test]
    fn test_template_target_stays_string() {
        let (built, _) = build_one(assertion("responseTime", "lessThan", "{{ MAX_LATENCY }}"));

        let Some(Assertion::Target(target)) = built else {
            panic!("expected a target assertion");
        };
        assert_eq!(target.target, Some(TargetValue::String("{{ MAX_LATENCY }}".to_string())));
    }

    #[test]
    fn test_non_numeric_target_is_unset() {
        let (built, diagnostics) = build_one(assertion("responseTime", "lessThan", "fast"));

        let Some(Assertion::Target(target)) = built else {
            panic!("expected a target assertion");
        };
        assert_eq!(target.target, None);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_json_schema_ignores_plain_target() {
        let mut config = assertion("body", "validatesJSONSchema", "oops");
        config.targetjsonschema = Some(JsonSchemaTargetConfig {
            jsonschema: r#"{"type":"object"}"#.to_string(),
            metaschema: "draft-07".to_string(),
        });

        let (built, diagnostics) = build_one(config);

        let value = serde_json::to_value(built.unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "operator": "validatesJSONSchema",
                "target": {"jsonSchema": r#"{"type":"object"}"#, "metaSchema": "draft-07"},
                "type": "body",
            })
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute.as_deref(), Some("assertion.0.target"));
    }

    #[test]
    fn test_json_path_target_value_typing() {
        let mut config = assertion("body", "validatesJSONPath", "");
        config.targetjsonpath = Some(JsonPathTargetConfig {
            jsonpath: "$.count".to_string(),
            operator: "moreThan".to_string(),
            targetvalue: "3".to_string(),
            elementsoperator: "firstElementMatches".to_string(),
        });
        let (built, _) = build_one(config.clone());
        let Some(Assertion::JsonPath(path)) = built else {
            panic!("expected a JSONPath assertion");
        };
        assert_eq!(path.target.unwrap().target_value, Some(TargetValue::Float(3.0)));

        config.targetjsonpath.as_mut().unwrap().operator = "isUndefined".to_string();
        let (built, _) = build_one(config);
        let Some(Assertion::JsonPath(path)) = built else {
            panic!("expected a JSONPath assertion");
        };
        assert_eq!(path.target.unwrap().target_value, None);
    }

    #[test]
    fn test_target_ignores_sub_targets() {
        let mut config = assertion("header", "contains", "json");
        config.property = "content-type".to_string();
        config.targetxpath = Some(XPathTargetConfig::default());

        let (built, diagnostics) = build_one(config);

        let value = serde_json::to_value(built.unwrap()).unwrap();
        assert!(value.get("targetxpath").is_none());
        assert_eq!(value["target"], "json");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute.as_deref(), Some("assertion.0.targetxpath"));
    }

    #[test]
    fn test_unknown_operator_warns_once() {
        let (built, diagnostics) = build_one(assertion("statusCode", "isRoughly", "200"));

        assert!(built.is_none());
        assert_eq!(diagnostics.len(), 1);
        assert!(!diagnostics[0].is_error());
    }

    #[test]
    fn test_flatten_round_trips_each_variant() {
        let mut json_path = assertion("body", "validatesJSONPath", "");
        json_path.targetjsonpath = Some(JsonPathTargetConfig {
            jsonpath: "$.status".to_string(),
            operator: "is".to_string(),
            targetvalue: "ok".to_string(),
            elementsoperator: "firstElementMatches".to_string(),
        });
        let mut xpath = assertion("body", "validatesXPath", "");
        xpath.targetxpath = Some(XPathTargetConfig {
            xpath: "//count".to_string(),
            operator: "lessThan".to_string(),
            targetvalue: "2.5".to_string(),
        });
        let mut javascript = assertion("javascript", "", "");
        javascript.code = "dd.expect(true).to.be.true;".to_string();
        let configs = vec![
            assertion("statusCode", "is", "200"),
            assertion("packetLossPercentage", "lessThan", "0.5"),
            assertion("bodyHash", "sha256", "abc"),
            json_path,
            xpath,
            javascript,
        ];

        let mut diagnostics = Vec::new();
        let built = build_assertions(&configs, "assertion", &mut diagnostics);
        let flattened = flatten_assertions(&built, "assertion", &mut diagnostics);

        assert!(diagnostics.is_empty());
        assert_eq!(flattened, configs);
    }

    #[test]
    fn test_flatten_unknown_variant() {
        let raw = json!({"type": "quantumState", "operator": "collapses", "target": "cat"});
        let mut diagnostics = Vec::new();

        let flattened = flatten_assertions(&[Assertion::Unknown(raw)], "assertion", &mut diagnostics);

        assert_eq!(flattened[0].assertion_type, "quantumState");
        assert_eq!(flattened[0].target, "");
        assert_eq!(diagnostics.len(), 1);
    }
}
