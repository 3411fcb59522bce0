//! Provider configuration.
//!
//! Durations are written in human-readable form (`"20m"`, `"1s"`,
//! `"250ms"`).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::error::ProviderError;
use crate::schema::{Attribute, Schema};

/// How long `create` waits for a new test to become readable.
pub const DEFAULT_CREATE_TIMEOUT: Duration = Duration::from_secs(20 * 60);

/// Delay between reads while waiting.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Settings shared by every resource operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// How long `create` waits for the new test to become readable.
    #[serde(with = "human_duration")]
    pub create_timeout: Duration,
    /// Pause between reads while waiting.
    #[serde(with = "human_duration")]
    pub poll_interval: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            create_timeout: DEFAULT_CREATE_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl ProviderConfig {
    /// Configuration with the default timeouts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the create timeout.
    pub fn with_create_timeout(mut self, timeout: Duration) -> Self {
        self.create_timeout = timeout;
        self
    }

    /// Set the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Parse a configuration object such as
    /// `{"create_timeout": "5m", "poll_interval": "500ms"}`.
    pub fn from_value(value: Value) -> Result<Self, ProviderError> {
        let config: Self = serde_json::from_value(value)
            .map_err(|err| ProviderError::Configuration(err.to_string()))?;
        if config.poll_interval.is_zero() {
            return Err(ProviderError::Configuration(
                "poll_interval must be greater than zero".to_string(),
            ));
        }
        Ok(config)
    }

    /// The provider configuration schema.
    pub fn schema() -> Schema {
        Schema::v0()
            .with_attribute(
                "create_timeout",
                Attribute::optional_string()
                    .with_description("How long to wait for a created test to become readable")
                    .with_default(Value::from("20m")),
            )
            .with_attribute(
                "poll_interval",
                Attribute::optional_string()
                    .with_description("Delay between reads while waiting")
                    .with_default(Value::from("1s")),
            )
    }
}

mod human_duration {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = ProviderConfig::from_value(json!({})).unwrap();

        assert_eq!(config.create_timeout, Duration::from_secs(1200));
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert_eq!(config, ProviderConfig::default());
    }

    #[test]
    fn test_human_readable_durations() {
        let config = ProviderConfig::from_value(json!({
            "create_timeout": "5m",
            "poll_interval": "250ms",
        }))
        .unwrap();

        assert_eq!(config.create_timeout, Duration::from_secs(300));
        assert_eq!(config.poll_interval, Duration::from_millis(250));

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["create_timeout"], "5m");
        assert_eq!(value["poll_interval"], "250ms");
    }

    #[test]
    fn test_invalid_duration_is_a_configuration_error() {
        let err = ProviderConfig::from_value(json!({"create_timeout": "soon"})).unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));

        let err = ProviderConfig::from_value(json!({"poll_interval": "0s"})).unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
    }

    #[test]
    fn test_builders() {
        let config = ProviderConfig::new()
            .with_create_timeout(Duration::from_secs(5))
            .with_poll_interval(Duration::from_millis(10));

        assert_eq!(config.create_timeout, Duration::from_secs(5));
        assert_eq!(config.poll_interval, Duration::from_millis(10));
    }

    #[test]
    fn test_schema_defaults_parse() {
        let mut value = json!({});
        ProviderConfig::schema().apply_defaults(&mut value);

        assert_eq!(ProviderConfig::from_value(value).unwrap(), ProviderConfig::default());
    }
}
