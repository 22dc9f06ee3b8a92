//! Retry classification and the fixed-delay retry loop.
//!
//! # Rules
//! - `status == 0`: the host never answered. Not retried.
//! - `status >= 400`: the server answered with an error. Not retried.
//! - anything else: a transient hiccup. Wait `delay`, then reissue.
//!
//! There is no attempt cap. The loop ends on success, on a non-retryable
//! failure, or when the caller drops the future (the executor's timeout).

use std::future::Future;
use std::time::Duration;

use crate::transport::TransportFailure;

/// Delay between attempts.
pub const RETRY_DELAY: Duration = Duration::from_millis(1500);

/// Whether a failed attempt with this status is reissued.
pub fn is_retryable(status: u16) -> bool {
    status != 0 && status < 400
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { delay: RETRY_DELAY }
    }
}

impl RetryPolicy {
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    /// Run `attempt` until it succeeds or fails with a non-retryable status.
    pub async fn run<T, F, Fut>(&self, mut attempt: F) -> Result<T, TransportFailure>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TransportFailure>>,
    {
        let mut retries: u64 = 0;
        loop {
            match attempt().await {
                Ok(value) => return Ok(value),
                Err(failure) if is_retryable(failure.status) => {
                    retries += 1;
                    tracing::warn!(
                        status = failure.status,
                        retry = retries,
                        delay_ms = self.delay.as_millis() as u64,
                        "Retryable failure, reissuing request"
                    );
                    tokio::time::sleep(self.delay).await;
                }
                Err(failure) => return Err(failure),
            }
        }
    }
}
