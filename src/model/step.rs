//! Multistep API steps and browser steps.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::{Assertion, RetryOptions, TestRequest};
use crate::variant::{Rule, RuleTable};

/// Request subtypes a multistep API test may run.
pub const REQUEST_STEP_SUBTYPES: &[&str] = &[
    "", "http", "grpc", "ssl", "dns", "tcp", "udp", "icmp", "websocket",
];

/// Which API step variant a subtype selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStepKind {
    Request,
    Wait,
}

/// API step variant, keyed by `subtype`.
pub static API_STEP_RULES: RuleTable<str, ApiStepKind> = RuleTable::new(
    "API step",
    &[
        Rule {
            name: "request",
            matches: |subtype| REQUEST_STEP_SUBTYPES.contains(&subtype),
            kind: ApiStepKind::Request,
        },
        Rule {
            name: "wait",
            matches: |subtype| subtype == "wait",
            kind: ApiStepKind::Wait,
        },
    ],
);

/// One step of a multistep API test.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ApiStep {
    Request(ApiTestStep),
    Wait(ApiWaitStep),
    Unknown(Value),
}

impl ApiStep {
    /// The step name, also for unrecognized steps.
    pub fn name(&self) -> &str {
        match self {
            Self::Request(step) => &step.name,
            Self::Wait(step) => &step.name,
            Self::Unknown(raw) => raw.get("name").and_then(Value::as_str).unwrap_or_default(),
        }
    }
}

impl<'de> Deserialize<'de> for ApiStep {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        let subtype = raw.get("subtype").and_then(Value::as_str).unwrap_or_default();

        let parsed = match API_STEP_RULES.classify(subtype) {
            Some(ApiStepKind::Request) => serde_json::from_value(raw).map(Self::Request),
            Some(ApiStepKind::Wait) => serde_json::from_value(raw).map(Self::Wait),
            None => return Ok(Self::Unknown(raw)),
        };
        parsed.map_err(D::Error::custom)
    }
}

/// A step performing one request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiTestStep {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_failure: Option<bool>,
    pub assertions: Vec<Assertion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_values: Option<Vec<ParsingOptions>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_critical: Option<bool>,
    pub name: String,
    pub request: TestRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryOptions>,
    pub subtype: String,
}

/// A step pausing the test for `value` seconds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiWaitStep {
    pub name: String,
    pub subtype: String,
    pub value: i64,
}

/// A value extracted from a step's response into a variable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parser: Option<VariableParser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub parsing_type: Option<String>,
}

/// How an extracted value is parsed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VariableParser {
    #[serde(rename = "type")]
    pub parser_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// A browser step. `params` is an open object whose keys depend on `type`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrowserStep {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_failure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_critical: Option<bool>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_screenshot: Option<bool>,
    pub params: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
    #[serde(rename = "type")]
    pub step_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_step_rules() {
        assert_eq!(API_STEP_RULES.classify(""), Some(ApiStepKind::Request));
        assert_eq!(API_STEP_RULES.classify("grpc"), Some(ApiStepKind::Request));
        assert_eq!(API_STEP_RULES.classify("wait"), Some(ApiStepKind::Wait));
        assert_eq!(API_STEP_RULES.classify("playSubTest"), None);
    }

    #[test]
    fn test_deserialize_steps_by_subtype() {
        let steps: Vec<ApiStep> = serde_json::from_value(json!([
            {
                "name": "login",
                "subtype": "http",
                "assertions": [{"type": "statusCode", "operator": "is", "target": 200}],
                "request": {"method": "POST", "url": "https://example.org/login"},
                "extractedValues": [{"name": "TOKEN", "type": "http_body", "parser": {"type": "json_path", "value": "$.token"}}],
            },
            {"name": "pause", "subtype": "wait", "value": 5},
            {"name": "future", "subtype": "teleport"},
        ]))
        .unwrap();

        let ApiStep::Request(login) = &steps[0] else {
            panic!("expected a request step");
        };
        assert_eq!(login.request.method.as_deref(), Some("POST"));
        let parser = login.extracted_values.as_ref().unwrap()[0].parser.as_ref().unwrap();
        assert_eq!(parser.parser_type, "json_path");

        assert_eq!(
            steps[1],
            ApiStep::Wait(ApiWaitStep {
                name: "pause".to_string(),
                subtype: "wait".to_string(),
                value: 5,
            })
        );
        assert!(matches!(steps[2], ApiStep::Unknown(_)));
        assert_eq!(steps[2].name(), "future");
    }

    #[test]
    fn test_browser_step_params_are_open() {
        let step: BrowserStep = serde_json::from_value(json!({
            "name": "click login",
            "type": "click",
            "params": {"clickType": "primary", "element": {"url": "https://example.org"}},
            "allowFailure": false,
        }))
        .unwrap();

        assert_eq!(step.step_type, "click");
        assert_eq!(step.params["clickType"], "primary");
        assert_eq!(step.allow_failure, Some(false));
    }
}
