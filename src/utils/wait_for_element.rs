//! Element polling utility for JavaScript-rendered pages
//!
//! Word pages attach their `<video>` player after the load event fires, so the
//! element is polled for instead of sampled once.

use std::future::Future;
use std::time::Duration;

use crate::browser::{BrowserError, BrowserResult};

/// Poll `probe` until it yields a value or `timeout` elapses
///
/// # Polling Strategy
/// - Starts at 100ms intervals
/// - Doubles each retry (exponential backoff)
/// - Caps at 1 second maximum interval
/// - Total duration limited by timeout parameter
///
/// `probe` returning `None` means "not present yet"; the selector is only used
/// for the timeout error.
pub async fn wait_for_element<T, F, Fut>(
    selector: &str,
    timeout: Duration,
    mut probe: F,
) -> BrowserResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let start = tokio::time::Instant::now();
    let mut poll_interval = Duration::from_millis(100); // Start with 100ms
    let max_interval = Duration::from_secs(1); // Cap at 1 second

    loop {
        if let Some(found) = probe().await {
            return Ok(found);
        }

        if start.elapsed() >= timeout {
            return Err(BrowserError::ElementTimeout {
                selector: selector.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            });
        }

        tokio::time::sleep(poll_interval).await;

        poll_interval = (poll_interval * 2).min(max_interval);
    }
}
