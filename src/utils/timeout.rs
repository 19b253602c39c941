//! Timeout validation utilities for browser operations

use std::time::Duration;

use super::errors::ScrapeError;

/// Maximum timeout for page loads (5 minutes)
/// Covers slow-loading sites, heavy SPAs, and network delays
pub const MAX_NAVIGATION_TIMEOUT_MS: u64 = 300_000; // 5 minutes

/// Maximum timeout for waiting on an element (30 seconds)
/// Covers dynamic element loading and late video players
pub const MAX_INTERACTION_TIMEOUT_MS: u64 = 30_000; // 30 seconds

/// Validate the page-load timeout
///
/// # Returns
/// * `Ok(Duration)` - Validated Duration object
/// * `Err(ScrapeError::Config)` - If zero or above MAX_NAVIGATION_TIMEOUT_MS
pub fn validate_navigation_timeout(ms: u64) -> Result<Duration, ScrapeError> {
    if ms == 0 {
        return Err(ScrapeError::Config(
            "page_load_timeout_ms must be positive; an unbounded page load can hang the run".into(),
        ));
    }

    if ms > MAX_NAVIGATION_TIMEOUT_MS {
        return Err(ScrapeError::Config(format!(
            "page_load_timeout_ms cannot exceed {}ms ({} minutes). Received: {}ms ({:.1} minutes)",
            MAX_NAVIGATION_TIMEOUT_MS,
            MAX_NAVIGATION_TIMEOUT_MS / 60_000,
            ms,
            ms as f64 / 60_000.0
        )));
    }

    Ok(Duration::from_millis(ms))
}

/// Validate the element-presence wait used before reading the video source
pub fn validate_interaction_timeout(ms: u64) -> Result<Duration, ScrapeError> {
    if ms > MAX_INTERACTION_TIMEOUT_MS {
        return Err(ScrapeError::Config(format!(
            "element_wait_timeout_ms cannot exceed {}ms ({} seconds). Received: {}ms ({} seconds)",
            MAX_INTERACTION_TIMEOUT_MS,
            MAX_INTERACTION_TIMEOUT_MS / 1000,
            ms,
            ms / 1000
        )));
    }

    Ok(Duration::from_millis(ms))
}
