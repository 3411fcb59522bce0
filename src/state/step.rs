use serde::{Deserialize, Serialize};

use super::{
    single_block, AssertionConfig, BasicAuthConfig, ClientCertificateConfig, ProxyConfig,
    RequestConfig, RequestFileConfig, RetryConfig, StringMap,
};

/// One `api_step` block of a multistep API test.
///
/// Request steps use the `request_*` blocks; `wait` steps only `value`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiStepConfig {
    pub name: String,
    pub subtype: String,
    pub extracted_value: Vec<ExtractedValueConfig>,
    #[serde(with = "single_block")]
    pub request_definition: Option<RequestConfig>,
    pub request_headers: StringMap,
    pub request_query: StringMap,
    pub request_metadata: StringMap,
    #[serde(with = "single_block")]
    pub request_basicauth: Option<BasicAuthConfig>,
    #[serde(with = "single_block")]
    pub request_proxy: Option<ProxyConfig>,
    #[serde(with = "single_block")]
    pub request_client_certificate: Option<ClientCertificateConfig>,
    pub request_file: Vec<RequestFileConfig>,
    pub assertion: Vec<AssertionConfig>,
    pub allow_failure: bool,
    pub is_critical: bool,
    #[serde(with = "single_block")]
    pub retry: Option<RetryConfig>,
    /// Seconds to pause, for `wait` steps.
    pub value: i64,
}

/// One `extracted_value` entry of an API step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractedValueConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: String,
    pub field: String,
    #[serde(with = "single_block")]
    pub parser: Option<ParserConfig>,
    pub secure: bool,
}

/// The `parser` block of an extracted value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    #[serde(rename = "type")]
    pub parser_type: String,
    pub value: String,
}

/// One `browser_step` block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserStepConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub step_type: String,
    pub allow_failure: bool,
    pub is_critical: bool,
    pub timeout: i64,
    /// Send the configured `element` even if the server rewrote it.
    pub force_element_update: bool,
    pub no_screenshot: bool,
    #[serde(with = "single_block")]
    pub params: Option<StepParamsConfig>,
}

/// Browser step parameters. Which keys apply depends on the step type.
///
/// `element`, `email`, `file`, `files` and `request` hold JSON text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StepParamsConfig {
    pub attribute: String,
    pub check: String,
    pub click_type: String,
    pub code: String,
    pub delay: i64,
    pub element: String,
    #[serde(with = "single_block")]
    pub element_user_locator: Option<UserLocatorConfig>,
    pub email: String,
    pub file: String,
    pub files: String,
    pub modifiers: Vec<String>,
    pub playing_tab_id: String,
    pub request: String,
    pub subtest_public_id: String,
    pub value: String,
    #[serde(with = "single_block")]
    pub variable: Option<StepVariableConfig>,
    pub with_click: bool,
    pub x: i64,
    pub y: i64,
}

/// Custom locator attached to a step's `element`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserLocatorConfig {
    pub fail_test_on_cannot_locate: bool,
    #[serde(with = "single_block")]
    pub value: Option<LocatorValueConfig>,
}

/// The `value` block of a user locator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorValueConfig {
    #[serde(rename = "type")]
    pub locator_type: String,
    pub value: String,
}

/// The `variable` block of step params.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StepVariableConfig {
    pub name: String,
    pub example: String,
}
