//! Hemmer Synthetics Provider
//!
//! This crate implements the `synthetics_test` resource: it translates a
//! declarative test configuration into the vendor's synthetic test model and
//! back, and drives the resource lifecycle against the vendor API.
//!
//! # Overview
//!
//! - **State types** ([`state`]): the configuration tree as the resource schema shapes it
//! - **Model types** ([`model`]): the vendor's JSON, one Rust enum per discriminated union
//! - **Translation** ([`translate`]): [`build`] and [`flatten`], with prior-value
//!   reconciliation so write-only secrets and server normalizations never show as drift
//! - **Secrets** ([`secret`]): certificate content is kept in state as a SHA-256 digest
//! - **Codec** ([`codec`]): zlib + base64 payloads for gRPC descriptors
//! - **Resource** ([`SyntheticsTestResource`]): create, read, update, delete and import
//!   over any [`SyntheticsApi`]
//! - **Schema & validation**: per-attribute diagnostics before deserialization
//! - **Logging**: integration with `tracing`
//!
//! # Quick Start
//!
//! ```ignore
//! use hemmer_provider_synthetics::{ProviderConfig, SyntheticsTestResource};
//! use hemmer_provider_synthetics::testing::InMemorySyntheticsApi;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     hemmer_provider_synthetics::init_logging();
//!
//!     let resource = SyntheticsTestResource::new(InMemorySyntheticsApi::new(), ProviderConfig::new());
//!     let state = resource
//!         .create(json!({
//!             "type": "api",
//!             "subtype": "http",
//!             "name": "homepage",
//!             "status": "live",
//!             "locations": ["aws:eu-central-1"],
//!             "request_definition": [{"method": "GET", "url": "https://example.org"}],
//!             "assertion": [{"type": "statusCode", "operator": "is", "target": "200"}],
//!             "options_list": [{"tick_every": 300}],
//!         }))
//!         .await?;
//!
//!     for warning in &state.diagnostics {
//!         eprintln!("{}", warning.summary);
//!     }
//!     println!("created {}", state.value.id);
//!     Ok(())
//! }
//! ```
//!
//! # Diagnostics
//!
//! Unrecognized variants (an assertion type, an auth type, a step subtype the
//! crate does not know) never fail a translation. They are skipped, logged at
//! `warn` and returned as warning [`Diagnostic`](schema::Diagnostic)s next to
//! the translated value.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod codec;
pub mod config;
pub mod error;
pub mod logging;
// Field names mirror the vendor JSON and the resource schema.
#[allow(missing_docs)]
pub mod model;
pub mod resource;
pub mod resource_schema;
pub mod retry;
pub mod schema;
pub mod secret;
#[allow(missing_docs)]
pub mod state;
pub mod testing;
pub mod translate;
pub mod validation;
pub mod variant;

// Re-export main types at crate root
pub use api::SyntheticsApi;
pub use config::ProviderConfig;
pub use error::{CodecError, ProviderError};
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use model::SyntheticsTest;
pub use resource::SyntheticsTestResource;
pub use resource_schema::{synthetics_test_schema, SYNTHETICS_TEST};
pub use schema::ProviderSchema;
pub use state::TestConfig;
pub use translate::{build, flatten, Translated};
pub use validation::{is_valid, validate, validate_result};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tracing;

/// The provider schema: provider configuration plus the one resource.
pub fn provider_schema() -> ProviderSchema {
    ProviderSchema::new()
        .with_provider_config(ProviderConfig::schema())
        .with_resource(SYNTHETICS_TEST, synthetics_test_schema())
}

/// Schema of a resource type served by this crate.
pub fn schema_for(resource_type: &str) -> Result<schema::Schema, ProviderError> {
    match resource_type {
        SYNTHETICS_TEST => Ok(synthetics_test_schema()),
        other => Err(ProviderError::UnknownResource(other.to_string())),
    }
}
