use serde::{Deserialize, Serialize};

/// Scheduling and alerting options shared by all test types.
///
/// The vendor mixes snake_case and camelCase keys here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TestOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_every: Option<i64>,
    #[serde(rename = "httpVersion", skip_serializing_if = "Option::is_none")]
    pub http_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept_self_signed: Option<bool>,
    #[serde(rename = "checkCertificateRevocation", skip_serializing_if = "Option::is_none")]
    pub check_certificate_revocation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_location_failed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_failure_duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_redirects: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_insecure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduling: Option<Scheduling>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitor_options: Option<MonitorOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitor_priority: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restricted_roles: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ci: Option<CiOptions>,
    #[serde(rename = "ignoreServerCertificateError", skip_serializing_if = "Option::is_none")]
    pub ignore_server_certificate_error: Option<bool>,
    #[serde(rename = "noScreenshot", skip_serializing_if = "Option::is_none")]
    pub no_screenshot: Option<bool>,
    #[serde(rename = "rumSettings", skip_serializing_if = "Option::is_none")]
    pub rum_settings: Option<RumSettings>,
    #[serde(rename = "disableCsp", skip_serializing_if = "Option::is_none")]
    pub disable_csp: Option<bool>,
    #[serde(rename = "disableCors", skip_serializing_if = "Option::is_none")]
    pub disable_cors: Option<bool>,
    #[serde(rename = "initialNavigationTimeout", skip_serializing_if = "Option::is_none")]
    pub initial_navigation_timeout: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_ids: Option<Vec<String>>,
}

/// Time windows the test runs in.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scheduling {
    pub timeframes: Vec<Timeframe>,
    pub timezone: String,
}

/// One weekday window.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeframe {
    pub day: i64,
    pub from: String,
    pub to: String,
}

/// Retry policy. `interval` is in milliseconds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<f64>,
}

/// Options of the monitor backing the test.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renotify_interval: Option<i64>,
}

/// Continuous integration behaviour.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CiOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_rule: Option<String>,
}

/// Real-user-monitoring settings for browser tests.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RumSettings {
    pub is_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_token_id: Option<i64>,
}
