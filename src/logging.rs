//! Logging setup for binaries and tests that drive the translator.
//!
//! Translation reports problems twice: as [`Diagnostic`](crate::schema::Diagnostic)
//! values returned to the caller, and as `tracing` events. These helpers
//! install a subscriber for the latter. Output goes to **stderr** so stdout
//! stays free for whatever protocol the host speaks.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: log filter (e.g. `info`, `hemmer_provider_synthetics=debug`)
//!
//! ```bash
//! # Also show swallowed numeric parses and lifecycle polling
//! RUST_LOG=hemmer_provider_synthetics=debug ./provider
//! ```

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn subscriber(filter: EnvFilter) -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false),
    )
}

/// Install the stderr subscriber, filtered by `RUST_LOG` (default `info`).
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging() {
    init_logging_with_default("info");
}

/// Like [`init_logging`], with `default_level` used when `RUST_LOG` is unset.
///
/// ```ignore
/// hemmer_provider_synthetics::init_logging_with_default("debug");
/// ```
pub fn init_logging_with_default(default_level: &str) {
    subscriber(env_filter(default_level)).init();
}

/// Try to install the subscriber; returns `false` if one is already set.
///
/// Safe to call from every test.
pub fn try_init_logging() -> bool {
    subscriber(env_filter("info")).try_init().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_parsing() {
        assert!(EnvFilter::try_new("info").is_ok());
        assert!(EnvFilter::try_new("hemmer_provider_synthetics=debug").is_ok());
        assert!(EnvFilter::try_new("warn,hemmer_provider_synthetics::translate=debug").is_ok());
    }

    #[test]
    fn test_try_init_is_idempotent() {
        try_init_logging();
        assert!(!try_init_logging());
    }
}
