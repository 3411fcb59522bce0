//! `options_list` to and from [`TestOptions`].

use super::value::{if_true, non_empty, non_zero};
use crate::model::{
    CiOptions, MonitorOptions, RetryOptions, RumSettings, Scheduling, TestOptions, Timeframe,
};
use crate::state::{
    CiConfig, MonitorOptionsConfig, OptionsConfig, RetryConfig, RumSettingsConfig,
    SchedulingConfig, TimeframeConfig,
};

/// Only set attributes are sent. `device_ids` live at the top level of the
/// configuration but travel inside the options.
pub(crate) fn build_options(config: Option<&OptionsConfig>, device_ids: &[String]) -> TestOptions {
    let mut options = TestOptions::default();
    if !device_ids.is_empty() {
        options.device_ids = Some(device_ids.to_vec());
    }
    let Some(config) = config else {
        return options;
    };

    options.tick_every = non_zero(config.tick_every);
    options.http_version = non_empty(&config.http_version);
    options.accept_self_signed = if_true(config.accept_self_signed);
    options.check_certificate_revocation = if_true(config.check_certificate_revocation);
    options.min_location_failed = non_zero(config.min_location_failed);
    options.min_failure_duration = non_zero(config.min_failure_duration);
    options.follow_redirects = if_true(config.follow_redirects);
    options.allow_insecure = if_true(config.allow_insecure);
    options.scheduling = config.scheduling.as_ref().map(|scheduling| Scheduling {
        timeframes: scheduling
            .timeframes
            .iter()
            .map(|frame| Timeframe {
                day: frame.day,
                from: frame.from.clone(),
                to: frame.to.clone(),
            })
            .collect(),
        timezone: scheduling.timezone.clone(),
    });
    options.retry = config.retry.as_ref().map(build_retry);
    options.monitor_options = config
        .monitor_options
        .as_ref()
        .and_then(|monitor| non_zero(monitor.renotify_interval))
        .map(|renotify_interval| MonitorOptions {
            renotify_interval: Some(renotify_interval),
        });
    options.monitor_name = non_empty(&config.monitor_name);
    options.monitor_priority = non_zero(config.monitor_priority);
    if !config.restricted_roles.is_empty() {
        options.restricted_roles = Some(config.restricted_roles.clone());
    }
    options.ci = config
        .ci
        .as_ref()
        .and_then(|ci| non_empty(&ci.execution_rule))
        .map(|execution_rule| CiOptions {
            execution_rule: Some(execution_rule),
        });
    options.ignore_server_certificate_error = if_true(config.ignore_server_certificate_error);
    options.no_screenshot = if_true(config.no_screenshot);
    options.rum_settings = config.rum_settings.as_ref().map(build_rum_settings);
    options.disable_csp = if_true(config.disable_csp);
    options.disable_cors = if_true(config.disable_cors);
    options.initial_navigation_timeout = non_zero(config.initial_navigation_timeout);
    options
}

/// Retry block shared by options and API steps.
pub(crate) fn build_retry(retry: &RetryConfig) -> RetryOptions {
    RetryOptions {
        count: Some(retry.count),
        interval: Some(retry.interval as f64),
    }
}

pub(crate) fn flatten_retry(retry: &RetryOptions) -> RetryConfig {
    RetryConfig {
        count: retry.count.unwrap_or_default(),
        interval: retry.interval.map(|interval| interval as i64).unwrap_or_default(),
    }
}

/// Application and client token ids are only sent while RUM is enabled.
fn build_rum_settings(rum: &RumSettingsConfig) -> RumSettings {
    if !rum.is_enabled {
        return RumSettings::default();
    }
    RumSettings {
        is_enabled: true,
        application_id: non_empty(&rum.application_id),
        client_token_id: non_zero(rum.client_token_id),
    }
}

/// Returns the options block and the device ids carried inside it.
///
/// An options block with nothing set reads back as absent.
pub(crate) fn flatten_options(
    options: &TestOptions,
    prior: Option<&OptionsConfig>,
) -> (Option<OptionsConfig>, Vec<String>) {
    let prior_rum = prior.and_then(|p| p.rum_settings.as_ref());
    let config = OptionsConfig {
        tick_every: options.tick_every.unwrap_or_default(),
        http_version: options.http_version.clone().unwrap_or_default(),
        accept_self_signed: options.accept_self_signed.unwrap_or_default(),
        check_certificate_revocation: options.check_certificate_revocation.unwrap_or_default(),
        min_location_failed: options.min_location_failed.unwrap_or_default(),
        min_failure_duration: options.min_failure_duration.unwrap_or_default(),
        follow_redirects: options.follow_redirects.unwrap_or_default(),
        allow_insecure: options.allow_insecure.unwrap_or_default(),
        scheduling: options.scheduling.as_ref().map(|scheduling| SchedulingConfig {
            timeframes: scheduling
                .timeframes
                .iter()
                .map(|frame| TimeframeConfig {
                    day: frame.day,
                    from: frame.from.clone(),
                    to: frame.to.clone(),
                })
                .collect(),
            timezone: scheduling.timezone.clone(),
        }),
        retry: options.retry.as_ref().map(flatten_retry),
        monitor_options: options.monitor_options.as_ref().map(|monitor| MonitorOptionsConfig {
            renotify_interval: monitor.renotify_interval.unwrap_or_default(),
        }),
        monitor_name: options.monitor_name.clone().unwrap_or_default(),
        monitor_priority: options.monitor_priority.unwrap_or_default(),
        restricted_roles: options.restricted_roles.clone().unwrap_or_default(),
        ci: options.ci.as_ref().map(|ci| CiConfig {
            execution_rule: ci.execution_rule.clone().unwrap_or_default(),
        }),
        ignore_server_certificate_error: options.ignore_server_certificate_error.unwrap_or_default(),
        no_screenshot: options.no_screenshot.unwrap_or_default(),
        rum_settings: options
            .rum_settings
            .as_ref()
            .map(|rum| flatten_rum_settings(rum, prior_rum)),
        disable_csp: options.disable_csp.unwrap_or_default(),
        disable_cors: options.disable_cors.unwrap_or_default(),
        initial_navigation_timeout: options.initial_navigation_timeout.unwrap_or_default(),
    };

    let device_ids = options.device_ids.clone().unwrap_or_default();
    let config = (config != OptionsConfig::default()).then_some(config);
    (config, device_ids)
}

/// A disabled RUM block keeps the ids the configuration already had.
fn flatten_rum_settings(rum: &RumSettings, prior: Option<&RumSettingsConfig>) -> RumSettingsConfig {
    if rum.is_enabled {
        return RumSettingsConfig {
            is_enabled: true,
            application_id: rum.application_id.clone().unwrap_or_default(),
            client_token_id: rum.client_token_id.unwrap_or_default(),
        };
    }
    let prior = prior.cloned().unwrap_or_default();
    RumSettingsConfig {
        is_enabled: false,
        application_id: prior.application_id,
        client_token_id: prior.client_token_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> OptionsConfig {
        OptionsConfig {
            tick_every: 900,
            http_version: "http2".to_string(),
            min_location_failed: 1,
            follow_redirects: true,
            retry: Some(RetryConfig {
                count: 2,
                interval: 300,
            }),
            monitor_options: Some(MonitorOptionsConfig {
                renotify_interval: 120,
            }),
            monitor_priority: 5,
            ci: Some(CiConfig {
                execution_rule: "blocking".to_string(),
            }),
            scheduling: Some(SchedulingConfig {
                timeframes: vec![TimeframeConfig {
                    day: 1,
                    from: "07:00".to_string(),
                    to: "16:00".to_string(),
                }],
                timezone: "Europe/Paris".to_string(),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_sends_only_set_attributes() {
        let built = build_options(Some(&options()), &[]);

        assert_eq!(built.tick_every, Some(900));
        assert_eq!(built.http_version.as_deref(), Some("http2"));
        assert_eq!(built.accept_self_signed, None);
        assert_eq!(built.monitor_name, None);
        assert_eq!(built.device_ids, None);
        assert_eq!(built.retry.unwrap().interval, Some(300.0));

        let json = serde_json::to_value(build_options(Some(&options()), &[])).unwrap();
        assert_eq!(json["httpVersion"], "http2");
        assert_eq!(json["ci"]["executionRule"], "blocking");
    }

    #[test]
    fn test_round_trip() {
        let config = options();
        let devices = vec!["chrome.laptop_large".to_string()];

        let built = build_options(Some(&config), &devices);
        let (flattened, device_ids) = flatten_options(&built, Some(&config));

        assert_eq!(flattened, Some(config));
        assert_eq!(device_ids, devices);
    }

    #[test]
    fn test_empty_options_read_back_as_absent() {
        let (flattened, device_ids) = flatten_options(&TestOptions::default(), None);

        assert_eq!(flattened, None);
        assert!(device_ids.is_empty());
    }

    #[test]
    fn test_disabled_rum_keeps_prior_ids() {
        let prior = OptionsConfig {
            tick_every: 900,
            rum_settings: Some(RumSettingsConfig {
                is_enabled: false,
                application_id: "app".to_string(),
                client_token_id: 12345,
            }),
            ..Default::default()
        };

        let built = build_options(Some(&prior), &[]);
        let rum = built.rum_settings.clone().unwrap();
        assert!(!rum.is_enabled);
        assert_eq!(rum.application_id, None);
        assert_eq!(rum.client_token_id, None);

        let (flattened, _) = flatten_options(&built, Some(&prior));
        assert_eq!(flattened, Some(prior));
    }

    #[test]
    fn test_enabled_rum_reads_server_ids() {
        let options = TestOptions {
            rum_settings: Some(RumSettings {
                is_enabled: true,
                application_id: Some("app".to_string()),
                client_token_id: Some(7),
            }),
            ..Default::default()
        };

        let (flattened, _) = flatten_options(&options, None);
        let rum = flattened.unwrap().rum_settings.unwrap();
        assert_eq!(rum.application_id, "app");
        assert_eq!(rum.client_token_id, 7);
    }
}
