//! The vendor API seam.
//!
//! The resource only talks to the vendor through [`SyntheticsApi`]. An HTTP
//! client implements it in production; [`crate::testing::InMemorySyntheticsApi`]
//! implements it in tests.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::model::SyntheticsTest;

/// Operations the vendor exposes for synthetic tests.
///
/// A test that does not exist must be reported as
/// [`ProviderError::NotFound`]; the resource relies on it to detect deleted
/// tests and to wait for new ones to become readable.
///
/// # Example
///
/// ```ignore
/// use hemmer_provider_synthetics::{async_trait, ProviderError, SyntheticsApi};
/// use hemmer_provider_synthetics::model::SyntheticsTest;
///
/// struct HttpApi { /* client, credentials */ }
///
/// #[async_trait]
/// impl SyntheticsApi for HttpApi {
///     async fn create_test(&self, test: &SyntheticsTest) -> Result<SyntheticsTest, ProviderError> {
///         // POST /api/v1/synthetics/tests/{api,browser}
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait SyntheticsApi: Send + Sync {
    /// Create a test; the returned test carries its public id.
    async fn create_test(&self, test: &SyntheticsTest) -> Result<SyntheticsTest, ProviderError>;

    /// Fetch a test by public id.
    async fn get_test(&self, public_id: &str) -> Result<SyntheticsTest, ProviderError>;

    /// Replace the test with `public_id`.
    async fn update_test(
        &self,
        public_id: &str,
        test: &SyntheticsTest,
    ) -> Result<SyntheticsTest, ProviderError>;

    /// Delete tests. With `force_delete_dependencies`, tests referenced by
    /// other resources are deleted too.
    async fn delete_tests(
        &self,
        public_ids: &[String],
        force_delete_dependencies: bool,
    ) -> Result<(), ProviderError>;
}
