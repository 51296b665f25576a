//! Fixed-delay retry helper shared by the fetcher and the loader.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

/// How many times to retry an operation and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before each retry.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 1,
            delay: Duration::from_millis(2000),
        }
    }
}

impl RetryPolicy {
    /// Retry exactly once after `delay`.
    pub fn once_after(delay: Duration) -> Self {
        Self {
            max_retries: 1,
            delay,
        }
    }

    /// Never retry.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            delay: Duration::ZERO,
        }
    }

    /// Run `attempt` until it succeeds or the retries are exhausted.
    ///
    /// The error of the last attempt is returned.
    pub async fn run<T, E, F, Fut>(&self, operation: &str, attempt: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.run_if(operation, |_| true, attempt).await
    }

    /// Like [`run`](Self::run), but errors for which `retryable` returns
    /// false are returned at once.
    pub async fn run_if<T, E, F, Fut, P>(
        &self,
        operation: &str,
        retryable: P,
        mut attempt: F,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
        P: Fn(&E) -> bool,
    {
        let mut retries = 0;
        loop {
            match attempt().await {
                Ok(value) => {
                    if retries > 0 {
                        info!(operation = %operation, retries = retries, "Succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) if retries < self.max_retries && retryable(&e) => {
                    retries += 1;
                    warn!(
                        operation = %operation,
                        attempt = retries,
                        max_retries = self.max_retries,
                        delay_ms = self.delay.as_millis() as u64,
                        error = %e,
                        "Operation failed, retrying"
                    );
                    tokio::time::sleep(self.delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
