//! The `synthetics_test` resource lifecycle.
//!
//! Configuration arrives as JSON, is validated against
//! [`synthetics_test_schema`], filled with defaults and translated for the
//! vendor. Whatever the vendor returns is flattened back with the
//! configuration as prior, so state never loses write-only secrets.

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::api::SyntheticsApi;
use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::model::SyntheticsTest;
use crate::resource_schema::synthetics_test_schema;
use crate::retry::retry_until;
use crate::schema::{Diagnostic, Schema};
use crate::state::TestConfig;
use crate::translate::{self, Translated};
use crate::validation::validate;

/// CRUD and import for synthetic tests, on top of a [`SyntheticsApi`].
pub struct SyntheticsTestResource<A> {
    api: A,
    config: ProviderConfig,
    schema: Schema,
}

impl<A: SyntheticsApi> SyntheticsTestResource<A> {
    /// A resource backed by `api`.
    pub fn new(api: A, config: ProviderConfig) -> Self {
        Self {
            api,
            config,
            schema: synthetics_test_schema(),
        }
    }

    /// The vendor API client.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// The provider configuration.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// The `synthetics_test` schema used for validation.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Schema diagnostics for a raw configuration.
    pub fn validate(&self, config: &Value) -> Vec<Diagnostic> {
        validate(&self.schema, config)
    }

    /// Validate, apply defaults and deserialize a raw configuration.
    pub fn parse_config(&self, mut config: Value) -> Result<TestConfig, ProviderError> {
        let errors: Vec<_> = self
            .validate(&config)
            .into_iter()
            .filter(Diagnostic::is_error)
            .collect();
        if !errors.is_empty() {
            return Err(ProviderError::Validation(describe(&errors)));
        }
        self.schema.apply_defaults(&mut config);
        Ok(serde_json::from_value(config)?)
    }

    /// Create the test and wait until the vendor can read it back.
    #[instrument(skip_all, name = "synthetics_test.create")]
    pub async fn create(&self, config: Value) -> Result<Translated<TestConfig>, ProviderError> {
        let config = self.parse_config(config)?;
        let built = translate::build(&config)?;
        debug!(name = %config.name, test_type = %config.test_type, "creating test");

        let created = self.api.create_test(&built.value).await?;
        let public_id = created
            .public_id()
            .ok_or_else(|| ProviderError::Internal("created test has no public id".to_string()))?
            .to_string();

        let api = &self.api;
        let id = public_id.as_str();
        let fetched = retry_until(self.config.create_timeout, self.config.poll_interval, || {
            api.get_test(id)
        })
        .await?;
        info!(public_id = %public_id, "created test");

        self.flatten(&fetched, Some(&config), built.diagnostics)
    }

    /// Refresh state. `Ok(None)` means the test no longer exists.
    #[instrument(skip_all, name = "synthetics_test.read", fields(public_id = %state.id))]
    pub async fn read(
        &self,
        state: &TestConfig,
    ) -> Result<Option<Translated<TestConfig>>, ProviderError> {
        let public_id = require_id(state)?;
        match self.api.get_test(public_id).await {
            Ok(test) => self.flatten(&test, Some(state), Vec::new()).map(Some),
            Err(err) if err.is_not_found() => {
                warn!("test no longer exists, removing it from state");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Replace the test with a new configuration.
    #[instrument(skip_all, name = "synthetics_test.update", fields(public_id = %state.id))]
    pub async fn update(
        &self,
        state: &TestConfig,
        config: Value,
    ) -> Result<Translated<TestConfig>, ProviderError> {
        let public_id = require_id(state)?;
        let config = self.parse_config(config)?;
        if config.test_type != state.test_type {
            return Err(ProviderError::Validation(format!(
                "test type cannot change from \"{}\" to \"{}\"",
                state.test_type, config.test_type
            )));
        }

        let built = translate::build(&config)?;
        let updated = self.api.update_test(public_id, &built.value).await?;
        info!("updated test");

        self.flatten(&updated, Some(&config), built.diagnostics)
    }

    #[instrument(skip_all, name = "synthetics_test.delete", fields(public_id = %state.id))]
    pub async fn delete(&self, state: &TestConfig) -> Result<(), ProviderError> {
        let public_id = require_id(state)?;
        self.api
            .delete_tests(&[public_id.to_string()], state.force_delete_dependencies)
            .await?;
        info!(force = state.force_delete_dependencies, "deleted test");
        Ok(())
    }

    /// Adopt an existing test. Secrets the vendor hides come back empty.
    #[instrument(skip(self), name = "synthetics_test.import")]
    pub async fn import(&self, public_id: &str) -> Result<Translated<TestConfig>, ProviderError> {
        let test = self.api.get_test(public_id).await?;
        info!(test_type = test.test_type(), "imported test");
        self.flatten(&test, None, Vec::new())
    }

    fn flatten(
        &self,
        test: &SyntheticsTest,
        prior: Option<&TestConfig>,
        mut diagnostics: Vec<Diagnostic>,
    ) -> Result<Translated<TestConfig>, ProviderError> {
        let flattened = translate::flatten(test, prior)?;
        diagnostics.extend(flattened.diagnostics);
        Ok(Translated {
            value: flattened.value,
            diagnostics,
        })
    }
}

fn require_id(state: &TestConfig) -> Result<&str, ProviderError> {
    if state.id.is_empty() {
        return Err(ProviderError::Validation("state has no test id".to_string()));
    }
    Ok(&state.id)
}

fn describe(errors: &[Diagnostic]) -> String {
    errors
        .iter()
        .map(|d| match &d.detail {
            Some(detail) => format!("{}: {}", d.summary, detail),
            None => d.summary.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}
