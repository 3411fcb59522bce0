use serde::{Deserialize, Serialize};

use super::single_block;

/// The `options_list` block shared by API and browser tests.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsConfig {
    pub tick_every: i64,
    pub http_version: String,
    pub accept_self_signed: bool,
    pub check_certificate_revocation: bool,
    pub min_location_failed: i64,
    pub min_failure_duration: i64,
    pub follow_redirects: bool,
    pub allow_insecure: bool,
    #[serde(with = "single_block")]
    pub scheduling: Option<SchedulingConfig>,
    #[serde(with = "single_block")]
    pub retry: Option<RetryConfig>,
    #[serde(with = "single_block")]
    pub monitor_options: Option<MonitorOptionsConfig>,
    pub monitor_name: String,
    pub monitor_priority: i64,
    pub restricted_roles: Vec<String>,
    #[serde(with = "single_block")]
    pub ci: Option<CiConfig>,
    pub ignore_server_certificate_error: bool,
    pub no_screenshot: bool,
    #[serde(with = "single_block")]
    pub rum_settings: Option<RumSettingsConfig>,
    pub disable_csp: bool,
    pub disable_cors: bool,
    pub initial_navigation_timeout: i64,
}

/// The `scheduling` block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    pub timeframes: Vec<TimeframeConfig>,
    pub timezone: String,
}

/// One `timeframes` entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeframeConfig {
    pub day: i64,
    pub from: String,
    pub to: String,
}

/// Retry policy; `interval` is in milliseconds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub count: i64,
    pub interval: i64,
}

/// The `monitor_options` block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorOptionsConfig {
    pub renotify_interval: i64,
}

/// The `ci` block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CiConfig {
    pub execution_rule: String,
}

/// RUM data collection for browser tests. `client_token_id` is sensitive.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RumSettingsConfig {
    pub is_enabled: bool,
    pub application_id: String,
    pub client_token_id: i64,
}
