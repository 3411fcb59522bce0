//! Configuration-shaped state for the `synthetics_test` resource.
//!
//! These types mirror the resource schema: snake_case attribute names, maps of
//! strings, and "exactly one block" constructs serialized as single-element
//! lists. Zero values mean "unset", the same way the resource framework hands
//! configuration to a provider.

mod assertion;
mod options;
mod request;
mod step;
mod variable;

pub use assertion::{AssertionConfig, JsonPathTargetConfig, JsonSchemaTargetConfig, XPathTargetConfig};
pub use options::{
    CiConfig, MonitorOptionsConfig, OptionsConfig, RetryConfig, RumSettingsConfig,
    SchedulingConfig, TimeframeConfig,
};
pub use request::{
    BasicAuthConfig, CertificateFileConfig, ClientCertificateConfig, ProxyConfig, RequestConfig,
    RequestFileConfig,
};
pub use step::{
    ApiStepConfig, BrowserStepConfig, ExtractedValueConfig, LocatorValueConfig, ParserConfig,
    StepParamsConfig, StepVariableConfig, UserLocatorConfig,
};
pub use variable::{BrowserVariableConfig, ConfigVariableConfig};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// String-to-string attribute map (headers, query, metadata).
pub type StringMap = BTreeMap<String, String>;

/// The full configuration tree of one synthetic test.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    /// Vendor public id, set by the provider once the test exists.
    pub id: String,
    #[serde(rename = "type")]
    pub test_type: String,
    pub subtype: String,
    pub name: String,
    pub message: String,
    pub status: String,
    pub locations: Vec<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitor_id: Option<i64>,
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
    pub browser_variable: Vec<BrowserVariableConfig>,
    pub config_variable: Vec<ConfigVariableConfig>,
    pub variables_from_script: String,
    pub device_ids: Vec<String>,
    #[serde(with = "single_block")]
    pub options_list: Option<OptionsConfig>,
    pub browser_step: Vec<BrowserStepConfig>,
    pub api_step: Vec<ApiStepConfig>,
    pub set_cookie: String,
    pub force_delete_dependencies: bool,
}

impl TestConfig {
    /// Create a configuration with the required top-level attributes.
    pub fn new(test_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            test_type: test_type.into(),
            name: name.into(),
            status: "live".to_string(),
            ..Default::default()
        }
    }

    /// Whether the test is a browser test.
    pub fn is_browser(&self) -> bool {
        self.test_type == "browser"
    }
}

/// Serde adapter for "exactly one block" attributes.
///
/// The value is written as `[]` or `[block]`; on read, extra items beyond the
/// first are ignored (the schema limits these blocks to one item).
pub(crate) mod single_block {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        value.iter().collect::<Vec<&T>>().serialize(serializer)
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        let items = Option::<Vec<T>>::deserialize(deserializer)?;
        Ok(items.and_then(|items| items.into_iter().next()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_block_serializes_as_list() {
        let mut config = TestConfig::new("api", "homepage");
        config.request_proxy = Some(ProxyConfig {
            url: "http://proxy:3128".to_string(),
            headers: StringMap::new(),
        });

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["request_proxy"], json!([{"url": "http://proxy:3128", "headers": {}}]));
        assert_eq!(value["request_basicauth"], json!([]));
        assert_eq!(value["type"], "api");
        assert!(value.get("monitor_id").is_none());
    }

    #[test]
    fn test_single_block_deserializes_first_item() {
        let config: TestConfig = serde_json::from_value(json!({
            "type": "api",
            "name": "homepage",
            "request_proxy": [{"url": "http://proxy:3128"}],
            "request_basicauth": null,
        }))
        .unwrap();

        assert_eq!(config.request_proxy.unwrap().url, "http://proxy:3128");
        assert!(config.request_basicauth.is_none());
        assert!(config.options_list.is_none());
    }

    #[test]
    fn test_missing_attributes_take_zero_values() {
        let config: TestConfig = serde_json::from_value(json!({"type": "browser"})).unwrap();

        assert!(config.is_browser());
        assert_eq!(config.name, "");
        assert!(config.locations.is_empty());
        assert!(!config.force_delete_dependencies);
        assert_eq!(config.monitor_id, None);
    }

    #[test]
    fn test_round_trip_through_json() {
        let config: TestConfig = serde_json::from_value(json!({
            "type": "api",
            "subtype": "http",
            "name": "homepage",
            "status": "live",
            "locations": ["aws:eu-central-1"],
            "request_definition": [{"method": "GET", "url": "https://example.org"}],
            "request_headers": {"Accept": "application/json"},
            "options_list": [{"tick_every": 60}],
        }))
        .unwrap();

        let again: TestConfig =
            serde_json::from_value(serde_json::to_value(&config).unwrap()).unwrap();
        assert_eq!(again, config);
    }
}
