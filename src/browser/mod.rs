//! Browser infrastructure for launching Chrome and driving word pages
//!
//! The scraping core never touches chromiumoxide directly; it talks to a
//! [`PageDriver`], which [`crate::BrowserSession`] implements over a live
//! browser and tests implement over canned markup.

mod wrapper;

pub use crate::browser_setup::{download_managed_browser, find_browser_executable};
pub use wrapper::{BrowserWrapper, launch_browser};

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// One page at a time, navigated sequentially
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate to `url` and let the page settle
    async fn open(&self, url: &str) -> BrowserResult<()>;

    /// Markup of the current page after scripts have run
    async fn rendered_html(&self) -> BrowserResult<String>;

    /// Block until `selector` matches an element or `timeout` elapses
    async fn wait_for_element(&self, selector: &str, timeout: Duration) -> BrowserResult<()>;

    /// Attribute `name` of the first element matching `selector`
    ///
    /// `Ok(None)` when the element or the attribute is missing.
    async fn attribute(&self, selector: &str, name: &str) -> BrowserResult<Option<String>>;

    /// Playback duration in seconds of the first `<video>` on the page
    ///
    /// `Ok(None)` when the player has not loaded metadata (the DOM reports NaN).
    async fn video_duration(&self) -> BrowserResult<Option<f64>>;

    /// Write a PNG capture of the current page to `path`
    async fn capture_screenshot(&self, path: &Path) -> BrowserResult<()>;
}

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Failed to create page: {0}")]
    PageCreationFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Navigation timeout after {timeout_ms}ms for URL: {url}")]
    NavigationTimeout { url: String, timeout_ms: u64 },

    #[error("Element not found (timeout after {timeout_ms}ms): '{selector}'")]
    ElementTimeout { selector: String, timeout_ms: u64 },

    #[error("Script evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("Screenshot failed: {0}")]
    ScreenshotFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

pub type BrowserResult<T> = Result<T, BrowserError>;
