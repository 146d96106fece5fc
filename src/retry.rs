use std::future::Future;

use crate::connectivity::Connectivity;

/// Retry decision returned by the error classifier callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryAction {
    Retry,
    Abort,
}

/// Attempt ceiling for one operation. Waits between attempts are governed
/// by connectivity polling, not by a fixed backoff schedule.
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_attempts: 10 }
    }
}

/// Retry an async operation, blocking on connectivity between attempts.
///
/// - `config`: attempt ceiling
/// - `connectivity`: awaited after every failed attempt except the last
/// - `classifier`: inspects an error and returns `Retry` or `Abort`
/// - `operation`: the async closure to retry
///
/// Returns the first `Ok` result, or the last error if attempts are
/// exhausted or the classifier returns `Abort`.
pub async fn retry_until_connected<F, Fut, T, E, C>(
    config: &RetryConfig,
    connectivity: &dyn Connectivity,
    classifier: C,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: Fn(&E) -> RetryAction,
    E: std::fmt::Display,
{
    let total_attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(e) => {
                if classifier(&e) == RetryAction::Abort || attempt >= total_attempts {
                    return Err(e);
                }
                tracing::warn!(
                    "Attempt {}/{} failed: {}. Retrying once connected...",
                    attempt,
                    total_attempts,
                    e
                );
                connectivity.wait_for_connection().await;
                attempt += 1;
            }
        }
    }
}
