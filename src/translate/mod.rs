//! Translation between the configuration tree and the vendor model.
//!
//! [`build`] turns a [`TestConfig`] into a [`SyntheticsTest`] ready to send;
//! [`flatten`] turns what the vendor returned back into a [`TestConfig`],
//! using the prior configuration for anything the vendor never echoes.
//! Neither direction fails on unrecognized variants: they are skipped and
//! reported as warning diagnostics.

mod api_step;
mod assertion;
mod auth;
mod browser_step;
mod keys;
mod options;
mod prior;
mod request;
mod value;
mod variable;

pub use assertion::TARGET_TYPING;
pub use auth::{AuthKind, BASIC_AUTH_RULES};
pub use browser_step::{LocatorKind, LOCATOR_RULES};
pub use keys::{step_params, to_config_key, to_model_key, STEP_PARAMS};
pub use value::{convert_to_string, format_float, is_template, target_to_string, NumericTarget};

use tracing::warn;

use crate::error::ProviderError;
use crate::model::SyntheticsTest;
use crate::schema::Diagnostic;
use crate::state::TestConfig;

/// A translated value and the warnings raised while producing it.
#[derive(Debug, Clone)]
pub struct Translated<T> {
    /// The translated value.
    pub value: T,
    /// Warnings for parts that were skipped.
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Translated<T> {
    /// Whether translation raised any warning.
    pub fn has_warnings(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Drop the diagnostics and keep the value.
    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Build the vendor model from a configuration.
pub fn build(config: &TestConfig) -> Result<Translated<SyntheticsTest>, ProviderError> {
    let mut diagnostics = Vec::new();
    let value = match config.test_type.as_str() {
        "api" => SyntheticsTest::Api(api_test::build_api_test(config, &mut diagnostics)?),
        "browser" => {
            SyntheticsTest::Browser(browser_test::build_browser_test(config, &mut diagnostics))
        }
        other => {
            return Err(ProviderError::Validation(format!(
                "unsupported test type \"{}\"; expected \"api\" or \"browser\"",
                other
            )))
        }
    };
    Ok(Translated { value, diagnostics })
}

/// Flatten a vendor test back into configuration.
///
/// `prior` is the configuration (or state) the test was last built from. It
/// supplies write-only secrets and keeps server-side normalizations from
/// showing up as changes. Pass `None` when importing.
pub fn flatten(
    test: &SyntheticsTest,
    prior: Option<&TestConfig>,
) -> Result<Translated<TestConfig>, ProviderError> {
    let mut diagnostics = Vec::new();
    let value = match test {
        SyntheticsTest::Api(api) => api_test::flatten_api_test(api, prior, &mut diagnostics)?,
        SyntheticsTest::Browser(browser) => {
            browser_test::flatten_browser_test(browser, prior, &mut diagnostics)?
        }
    };
    Ok(Translated { value, diagnostics })
}

/// Record a non-fatal translation problem.
pub(crate) fn warning(
    diagnostics: &mut Vec<Diagnostic>,
    attribute: &str,
    summary: impl Into<String>,
    detail: impl Into<String>,
) {
    let summary = summary.into();
    let detail = detail.into();
    warn!(attribute, detail = %detail, "{}", summary);
    diagnostics.push(
        Diagnostic::warning(summary)
            .with_detail(detail)
            .with_attribute(attribute),
    );
}
