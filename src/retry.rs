//! Polling with a deadline.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::error::ProviderError;

/// Errors worth another attempt: the vendor has not caught up yet. Anything
/// else is fatal.
pub fn is_retryable(err: &ProviderError) -> bool {
    matches!(err, ProviderError::NotFound(_))
}

/// Run `operation` every `interval` until it succeeds, fails with a
/// non-retryable error, or `timeout` elapses.
///
/// On timeout the last retryable error is reported as
/// [`ProviderError::DeadlineExceeded`].
pub async fn retry_until<T, F, Fut>(
    timeout: Duration,
    interval: Duration,
    mut operation: F,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let deadline = Instant::now() + timeout;
    let mut attempt = 1u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if is_retryable(&err) => {
                if Instant::now() + interval > deadline {
                    return Err(ProviderError::DeadlineExceeded(format!(
                        "gave up after {} attempts in {}: {}",
                        attempt,
                        humantime::format_duration(timeout),
                        err
                    )));
                }
                debug!(attempt, error = %err, "retrying");
                sleep(interval).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
