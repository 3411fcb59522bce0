//! Assertions: six mutually exclusive target encodings.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::variant::{Rule, RuleTable};

/// Assertion types that take a plain `target`.
pub const TARGET_TYPES: &[&str] = &[
    "body",
    "header",
    "statusCode",
    "certificate",
    "responseTime",
    "property",
    "recordEvery",
    "recordSome",
    "tlsVersion",
    "minTlsVersion",
    "latency",
    "packetLossPercentage",
    "packetsReceived",
    "networkHop",
    "receivedMessage",
    "grpcHealthcheckStatus",
    "grpcMetadata",
    "grpcProto",
    "connection",
];

/// Operators of a plain `target` assertion.
pub const TARGET_OPERATORS: &[&str] = &[
    "contains",
    "doesNotContain",
    "is",
    "isNot",
    "lessThan",
    "lessThanOrEqual",
    "moreThan",
    "moreThanOrEqual",
    "matches",
    "doesNotMatch",
    "validates",
    "isInMoreThan",
    "isInLessThan",
    "doesNotExist",
    "isUndefined",
];

/// Operators of a `bodyHash` assertion, naming the digest.
pub const BODY_HASH_OPERATORS: &[&str] = &["md5", "sha1", "sha256"];

/// The discriminating pair of an assertion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssertionKey {
    pub assertion_type: String,
    pub operator: String,
}

impl AssertionKey {
    /// A key from its two parts.
    pub fn new(assertion_type: impl Into<String>, operator: impl Into<String>) -> Self {
        Self {
            assertion_type: assertion_type.into(),
            operator: operator.into(),
        }
    }

    fn from_raw(raw: &Value) -> Self {
        let field = |name: &str| raw.get(name).and_then(Value::as_str).unwrap_or_default();
        Self::new(field("type"), field("operator"))
    }
}

impl std::fmt::Display for AssertionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.assertion_type, self.operator)
    }
}

/// Which target encoding an assertion uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssertionKind {
    Javascript,
    JsonSchema,
    JsonPath,
    XPath,
    BodyHash,
    Target,
}

/// Assertion variant priority, shared by configuration and vendor payloads.
pub static ASSERTION_RULES: RuleTable<AssertionKey, AssertionKind> = RuleTable::new(
    "assertion",
    &[
        Rule {
            name: "javascript",
            matches: |k| k.assertion_type == "javascript",
            kind: AssertionKind::Javascript,
        },
        Rule {
            name: "validatesJSONSchema",
            matches: |k| k.operator == "validatesJSONSchema",
            kind: AssertionKind::JsonSchema,
        },
        Rule {
            name: "validatesJSONPath",
            matches: |k| k.operator == "validatesJSONPath",
            kind: AssertionKind::JsonPath,
        },
        Rule {
            name: "validatesXPath",
            matches: |k| k.operator == "validatesXPath",
            kind: AssertionKind::XPath,
        },
        Rule {
            name: "bodyHash",
            matches: |k| {
                k.assertion_type == "bodyHash" && BODY_HASH_OPERATORS.contains(&k.operator.as_str())
            },
            kind: AssertionKind::BodyHash,
        },
        Rule {
            name: "target",
            matches: |k| {
                TARGET_TYPES.contains(&k.assertion_type.as_str())
                    && TARGET_OPERATORS.contains(&k.operator.as_str())
            },
            kind: AssertionKind::Target,
        },
    ],
);

/// A target that may be a string, an integer or a float on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetValue {
    Integer(i64),
    Float(f64),
    String(String),
    Other(Value),
}

/// One assertion. Only the active variant's fields exist.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Assertion {
    Target(TargetAssertion),
    JsonSchema(JsonSchemaAssertion),
    JsonPath(JsonPathAssertion),
    XPath(XPathAssertion),
    BodyHash(BodyHashAssertion),
    Javascript(JavascriptAssertion),
    Unknown(Value),
}

impl<'de> Deserialize<'de> for Assertion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        let Some(kind) = ASSERTION_RULES.classify(&AssertionKey::from_raw(&raw)) else {
            return Ok(Self::Unknown(raw));
        };

        let parsed = match kind {
            AssertionKind::Target => serde_json::from_value(raw).map(Self::Target),
            AssertionKind::JsonSchema => serde_json::from_value(raw).map(Self::JsonSchema),
            AssertionKind::JsonPath => serde_json::from_value(raw).map(Self::JsonPath),
            AssertionKind::XPath => serde_json::from_value(raw).map(Self::XPath),
            AssertionKind::BodyHash => serde_json::from_value(raw).map(Self::BodyHash),
            AssertionKind::Javascript => serde_json::from_value(raw).map(Self::Javascript),
        };
        parsed.map_err(D::Error::custom)
    }
}

/// A plain `target` compared with `operator`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetAssertion {
    pub operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetValue>,
    #[serde(rename = "type")]
    pub assertion_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timings_scope: Option<String>,
}

/// Validates the body against a JSON schema.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JsonSchemaAssertion {
    pub operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<JsonSchemaTarget>,
    #[serde(rename = "type")]
    pub assertion_type: String,
}

/// Schema text and metaschema version.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JsonSchemaTarget {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_schema: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_schema: Option<String>,
}

/// Compares the value at a JSON path.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JsonPathAssertion {
    pub operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<JsonPathTarget>,
    #[serde(rename = "type")]
    pub assertion_type: String,
}

/// Path, operator and expected value of a JSON path assertion.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JsonPathTarget {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements_operator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_value: Option<TargetValue>,
}

/// Compares the value at an XPath.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct XPathAssertion {
    pub operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<XPathTarget>,
    #[serde(rename = "type")]
    pub assertion_type: String,
}

/// Path, operator and expected value of an XPath assertion.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct XPathTarget {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_value: Option<TargetValue>,
    #[serde(rename = "xPath", skip_serializing_if = "Option::is_none")]
    pub x_path: Option<String>,
}

/// Compares a digest of the body.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BodyHashAssertion {
    pub operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetValue>,
    #[serde(rename = "type")]
    pub assertion_type: String,
}

/// A JavaScript assertion has no operator, only code.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JavascriptAssertion {
    #[serde(default)]
    pub code: String,
    #[serde(rename = "type")]
    pub assertion_type: String,
}
