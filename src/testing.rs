//! Testing utilities for code that drives the synthetics API.
//!
//! [`InMemorySyntheticsApi`] stands in for the vendor: it assigns public ids
//! and monitor ids, hides secrets in every response, and swaps uploaded file
//! content for a bucket key, so a create/read/update cycle exercises the same
//! reconciliation paths a real vendor does.
//!
//! # Example
//!
//! ```ignore
//! use hemmer_provider_synthetics::testing::InMemorySyntheticsApi;
//! use hemmer_provider_synthetics::{ProviderConfig, SyntheticsTestResource};
//!
//! #[tokio::test]
//! async fn test_create() {
//!     let resource = SyntheticsTestResource::new(InMemorySyntheticsApi::new(), ProviderConfig::new());
//!     let state = resource.create(config).await.unwrap();
//!     assert_eq!(state.value.id, "aaa-aaa-aab");
//! }
//! ```

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use crate::api::SyntheticsApi;
use crate::error::ProviderError;
use crate::model::{ApiStep, BasicAuth, SyntheticsTest, TestRequest};
use crate::schema::{Diagnostic, DiagnosticSeverity};

const FIRST_MONITOR_ID: i64 = 1_000_000;

/// One `delete_tests` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deletion {
    /// Ids passed to the delete call.
    pub public_ids: Vec<String>,
    /// Whether dependent resources were deleted too.
    pub force_delete_dependencies: bool,
}

#[derive(Default)]
struct Store {
    tests: BTreeMap<String, SyntheticsTest>,
    serial: u64,
    unreadable_gets: u32,
    deletions: Vec<Deletion>,
}

/// An in-memory synthetics API.
///
/// Tests are stored as submitted. Responses are what the vendor would return:
/// certificate content and credential secrets are blanked, file content is
/// replaced by a bucket key.
#[derive(Default)]
pub struct InMemorySyntheticsApi {
    store: Mutex<Store>,
}

impl InMemorySyntheticsApi {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the next `count` reads with [`ProviderError::NotFound`], like a
    /// vendor whose reads lag behind its writes.
    pub fn with_unreadable_gets(self, count: u32) -> Self {
        self.lock().unreadable_gets = count;
        self
    }

    /// Store an existing test, as if created outside this crate. Returns its
    /// public id.
    pub fn insert(&self, mut test: SyntheticsTest) -> String {
        let mut store = self.lock();
        let public_id = store.assign_ids(&mut test);
        store.tests.insert(public_id.clone(), test);
        public_id
    }

    /// The test as it was last submitted, secrets included.
    pub fn stored(&self, public_id: &str) -> Option<SyntheticsTest> {
        self.lock().tests.get(public_id).cloned()
    }

    /// Number of stored tests.
    pub fn len(&self) -> usize {
        self.lock().tests.len()
    }

    /// Whether no test is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every `delete_tests` call, in order.
    pub fn deletions(&self) -> Vec<Deletion> {
        self.lock().deletions.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Store {
    fn assign_ids(&mut self, test: &mut SyntheticsTest) -> String {
        self.serial += 1;
        let public_id = public_id(self.serial);
        test.set_public_id(public_id.clone());
        test.set_monitor_id(FIRST_MONITOR_ID + self.serial as i64);
        public_id
    }
}

#[async_trait]
impl SyntheticsApi for InMemorySyntheticsApi {
    async fn create_test(&self, test: &SyntheticsTest) -> Result<SyntheticsTest, ProviderError> {
        let mut stored = test.clone();
        let mut store = self.lock();
        let public_id = store.assign_ids(&mut stored);
        debug!(public_id = %public_id, "created test");
        let response = vendor_response(&stored);
        store.tests.insert(public_id, stored);
        Ok(response)
    }

    async fn get_test(&self, public_id: &str) -> Result<SyntheticsTest, ProviderError> {
        let mut store = self.lock();
        if store.unreadable_gets > 0 {
            store.unreadable_gets -= 1;
            return Err(ProviderError::NotFound(public_id.to_string()));
        }
        store
            .tests
            .get(public_id)
            .map(vendor_response)
            .ok_or_else(|| ProviderError::NotFound(public_id.to_string()))
    }

    async fn update_test(
        &self,
        public_id: &str,
        test: &SyntheticsTest,
    ) -> Result<SyntheticsTest, ProviderError> {
        let mut store = self.lock();
        let current = store
            .tests
            .get(public_id)
            .ok_or_else(|| ProviderError::NotFound(public_id.to_string()))?;
        if current.test_type() != test.test_type() {
            return Err(ProviderError::Validation(format!(
                "cannot change the type of test {} from {} to {}",
                public_id,
                current.test_type(),
                test.test_type()
            )));
        }

        let mut updated = test.clone();
        keep_certificates(&mut updated, current);
        updated.set_public_id(public_id);
        if let Some(monitor_id) = monitor_id(current) {
            updated.set_monitor_id(monitor_id);
        }
        let response = vendor_response(&updated);
        store.tests.insert(public_id.to_string(), updated);
        Ok(response)
    }

    async fn delete_tests(
        &self,
        public_ids: &[String],
        force_delete_dependencies: bool,
    ) -> Result<(), ProviderError> {
        let mut store = self.lock();
        if let Some(missing) = public_ids.iter().find(|id| !store.tests.contains_key(*id)) {
            return Err(ProviderError::NotFound(missing.clone()));
        }
        for public_id in public_ids {
            store.tests.remove(public_id);
        }
        store.deletions.push(Deletion {
            public_ids: public_ids.to_vec(),
            force_delete_dependencies,
        });
        Ok(())
    }
}

/// Ids shaped like the vendor's: three groups of three lowercase letters.
fn public_id(serial: u64) -> String {
    let mut n = serial;
    let mut letters = [b'a'; 9];
    for letter in letters.iter_mut().rev() {
        *letter = b'a' + (n % 26) as u8;
        n /= 26;
    }
    let text: String = letters.iter().map(|&b| b as char).collect();
    format!("{}-{}-{}", &text[0..3], &text[3..6], &text[6..9])
}

fn monitor_id(test: &SyntheticsTest) -> Option<i64> {
    match test {
        SyntheticsTest::Api(api) => api.monitor_id,
        SyntheticsTest::Browser(browser) => browser.monitor_id,
    }
}

fn requests_mut(test: &mut SyntheticsTest) -> Vec<&mut TestRequest> {
    match test {
        SyntheticsTest::Api(api) => {
            let mut requests: Vec<&mut TestRequest> = api.config.request.iter_mut().collect();
            for step in api.config.steps.iter_mut().flatten() {
                if let ApiStep::Request(step) = step {
                    requests.push(&mut step.request);
                }
            }
            requests
        }
        SyntheticsTest::Browser(browser) => vec![&mut browser.config.request],
    }
}

fn requests(test: &SyntheticsTest) -> Vec<&TestRequest> {
    match test {
        SyntheticsTest::Api(api) => {
            let mut requests: Vec<&TestRequest> = api.config.request.iter().collect();
            for step in api.config.steps.iter().flatten() {
                if let ApiStep::Request(step) = step {
                    requests.push(&step.request);
                }
            }
            requests
        }
        SyntheticsTest::Browser(browser) => vec![&browser.config.request],
    }
}

/// Certificates sent without content keep the content already stored at the
/// same position.
fn keep_certificates(updated: &mut SyntheticsTest, current: &SyntheticsTest) {
    let current = requests(current);
    for (index, request) in requests_mut(updated).into_iter().enumerate() {
        let (Some(certificate), Some(stored)) = (
            request.certificate.as_mut(),
            current.get(index).and_then(|r| r.certificate.as_ref()),
        ) else {
            continue;
        };
        for (item, stored) in [
            (certificate.cert.as_mut(), stored.cert.as_ref()),
            (certificate.key.as_mut(), stored.key.as_ref()),
        ] {
            if let (Some(item), Some(stored)) = (item, stored) {
                if item.content.is_none() {
                    item.content = stored.content.clone();
                }
            }
        }
    }
}

fn vendor_response(test: &SyntheticsTest) -> SyntheticsTest {
    let mut response = test.clone();
    let public_id = response.public_id().unwrap_or_default().to_string();
    for request in requests_mut(&mut response) {
        hide_secrets(request, &public_id);
    }
    response
}

fn hide_secrets(request: &mut TestRequest, public_id: &str) {
    if let Some(certificate) = request.certificate.as_mut() {
        for item in [certificate.cert.as_mut(), certificate.key.as_mut()].into_iter().flatten() {
            item.content = None;
            item.updated_at = Some("2024-01-01T00:00:00Z".to_string());
        }
    }

    if let Some(auth) = request.basic_auth.as_mut() {
        match auth {
            BasicAuth::Web(web) => web.password.clear(),
            BasicAuth::Sigv4(sigv4) => {
                sigv4.secret_key.clear();
                sigv4.session_token = None;
            }
            BasicAuth::Ntlm(ntlm) => ntlm.password = None,
            BasicAuth::OauthClient(oauth) => oauth.client_secret.clear(),
            BasicAuth::OauthRop(oauth) => {
                oauth.password.clear();
                oauth.client_secret = None;
            }
            BasicAuth::Digest(digest) => digest.password.clear(),
            BasicAuth::Unknown(_) => {}
        }
    }

    for file in request.files.iter_mut().flatten() {
        if file.content.take().is_some() {
            let name = file.name.as_deref().unwrap_or_default();
            file.bucket_key = Some(format!("api-upload-file/{}/{}", public_id, name));
        }
    }
}

// =========================================================================
// Assertion Helpers
// =========================================================================

/// Assert that diagnostics contain no errors.
///
/// # Panics
///
/// Panics if there are any error diagnostics.
pub fn assert_no_errors(diagnostics: &[Diagnostic]) {
    let errors: Vec<_> = diagnostics.iter().filter(|d| d.is_error()).collect();

    assert!(
        errors.is_empty(),
        "Expected no errors, but got {} error(s): {:?}",
        errors.len(),
        errors.iter().map(|d| &d.summary).collect::<Vec<_>>()
    );
}

/// Assert that diagnostics contain at least one error.
///
/// # Panics
///
/// Panics if there are no error diagnostics.
pub fn assert_has_errors(diagnostics: &[Diagnostic]) {
    assert!(
        diagnostics.iter().any(Diagnostic::is_error),
        "Expected at least one error, but got none"
    );
}

/// Assert that diagnostics contain an error with the given summary substring.
///
/// # Panics
///
/// Panics if no error diagnostic contains the given substring.
pub fn assert_error_contains(diagnostics: &[Diagnostic], substring: &str) {
    let has_matching_error = diagnostics
        .iter()
        .any(|d| d.is_error() && d.summary.contains(substring));

    assert!(
        has_matching_error,
        "Expected an error containing '{}', but no matching error found. Errors: {:?}",
        substring,
        diagnostics
            .iter()
            .filter(|d| d.is_error())
            .map(|d| &d.summary)
            .collect::<Vec<_>>()
    );
}

/// Assert the number of warnings, e.g. one per unrecognized variant.
///
/// # Panics
///
/// Panics if the count differs.
pub fn assert_warning_count(diagnostics: &[Diagnostic], expected: usize) {
    let warnings: Vec<_> = diagnostics
        .iter()
        .filter(|d| matches!(d.severity, DiagnosticSeverity::Warning))
        .collect();

    assert_eq!(
        warnings.len(),
        expected,
        "Expected {} warning(s), got {:?}",
        expected,
        warnings
            .iter()
            .map(|d| (&d.summary, &d.attribute))
            .collect::<Vec<_>>()
    );
}
