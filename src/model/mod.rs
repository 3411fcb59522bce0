//! The vendor's synthetic test model.
//!
//! These types serialize to the vendor's JSON. Every discriminated union is a
//! Rust enum, so a value can only ever carry one variant's fields. Unions that
//! the vendor may extend carry an `Unknown` arm holding the raw JSON so new
//! enum values never fail deserialization.

mod assertion;
mod auth;
mod options;
mod request;
mod step;
mod variable;

pub use assertion::{
    Assertion, AssertionKey, AssertionKind, BodyHashAssertion, JavascriptAssertion,
    JsonPathAssertion, JsonPathTarget, JsonSchemaAssertion, JsonSchemaTarget, TargetAssertion,
    TargetValue, XPathAssertion, XPathTarget, ASSERTION_RULES, BODY_HASH_OPERATORS,
    TARGET_OPERATORS, TARGET_TYPES,
};
pub use auth::{
    BasicAuth, DigestAuth, NtlmAuth, OauthClientAuth, OauthRopAuth, Sigv4Auth, WebAuth,
};
pub use options::{
    CiOptions, MonitorOptions, RetryOptions, RumSettings, Scheduling, TestOptions, Timeframe,
};
pub use request::{BodyFile, CertificateItem, RequestCertificate, RequestPort, RequestProxy, TestRequest};
pub use step::{
    ApiStep, ApiStepKind, ApiTestStep, ApiWaitStep, BrowserStep, ParsingOptions, VariableParser,
    API_STEP_RULES, REQUEST_STEP_SUBTYPES,
};
pub use variable::{BrowserVariable, ConfigVariable};

use serde::{Deserialize, Serialize};

/// A synthetic test, keyed by its `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SyntheticsTest {
    Api(ApiTest),
    Browser(BrowserTest),
}

impl SyntheticsTest {
    /// The vendor-assigned public id, once the test exists.
    pub fn public_id(&self) -> Option<&str> {
        match self {
            Self::Api(test) => test.public_id.as_deref(),
            Self::Browser(test) => test.public_id.as_deref(),
        }
    }

    /// The test name.
    pub fn name(&self) -> &str {
        match self {
            Self::Api(test) => &test.name,
            Self::Browser(test) => &test.name,
        }
    }

    /// The `type` discriminator as written on the wire.
    pub fn test_type(&self) -> &'static str {
        match self {
            Self::Api(_) => "api",
            Self::Browser(_) => "browser",
        }
    }

    pub(crate) fn set_public_id(&mut self, id: impl Into<String>) {
        match self {
            Self::Api(test) => test.public_id = Some(id.into()),
            Self::Browser(test) => test.public_id = Some(id.into()),
        }
    }

    pub(crate) fn set_monitor_id(&mut self, id: i64) {
        match self {
            Self::Api(test) => test.monitor_id = Some(id),
            Self::Browser(test) => test.monitor_id = Some(id),
        }
    }
}

/// A single-request or multistep API test.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiTest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    pub config: ApiTestConfig,
    pub options: TestOptions,
    pub locations: Vec<String>,
    pub message: String,
    pub status: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitor_id: Option<i64>,
}

/// Request, assertions, steps and variables of an API test.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiTestConfig {
    pub assertions: Vec<Assertion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_variables: Option<Vec<ConfigVariable>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<TestRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<ApiStep>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables_from_script: Option<String>,
}

/// A scripted browser test.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserTest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
    pub name: String,
    pub config: BrowserTestConfig,
    pub options: TestOptions,
    pub locations: Vec<String>,
    pub message: String,
    pub status: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<BrowserStep>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitor_id: Option<i64>,
}

/// Start request and variables of a browser test.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrowserTestConfig {
    pub assertions: Vec<Assertion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_variables: Option<Vec<ConfigVariable>>,
    pub request: TestRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_cookie: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Vec<BrowserVariable>>,
}
