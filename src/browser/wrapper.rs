//! Browser lifecycle ownership
//!
//! Handles launching the chromiumoxide browser for a scraping run and making
//! sure the Chrome process, its CDP handler task and its profile directory are
//! released however the run ends.

use anyhow::Result;
use chromiumoxide::browser::Browser;
use std::path::PathBuf;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::BrowserConfig;

/// Wrapper for Browser and its event handler task
///
/// `close()` is the release path: it waits for Chrome to exit before the
/// profile directory is removed. Dropping without it aborts the handler and
/// lets `Browser` kill the Chrome child, but leaves the directory behind.
pub struct BrowserWrapper {
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
}

impl BrowserWrapper {
    pub(crate) fn new(browser: Browser, handler: JoinHandle<()>, user_data_dir: PathBuf) -> Self {
        Self {
            browser,
            handler,
            user_data_dir: Some(user_data_dir),
        }
    }

    /// Get reference to inner browser
    pub(crate) fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Close Chrome, wait for the process to exit, then remove the profile
    ///
    /// `wait()` must complete before the directory is removed or Chrome may
    /// still hold file handles in it.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser cleanly: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Failed to wait for browser exit: {}", e);
        }
        self.cleanup_temp_dir();
    }

    /// Remove the profile directory (blocking, callable from Drop)
    fn cleanup_temp_dir(&mut self) {
        if let Some(path) = self.user_data_dir.take() {
            info!("Cleaning up temp directory: {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                warn!(
                    "Failed to clean up temp directory {}: {}. Manual cleanup may be required.",
                    path.display(),
                    e
                );
            }
        }
    }
}

impl Drop for BrowserWrapper {
    fn drop(&mut self) {
        self.handler.abort();
        // Chrome is only killed when `browser` drops after this, and it can
        // still write into the profile until then.
        if let Some(path) = &self.user_data_dir {
            warn!(
                "BrowserWrapper dropped without close(); profile directory left at {}",
                path.display()
            );
        }
    }
}

/// Launch the browser for one scraping run
///
/// Each process gets its own profile directory so a second run started while
/// the first is alive does not hit Chrome's profile lock.
pub async fn launch_browser(config: &BrowserConfig) -> Result<BrowserWrapper> {
    info!("Launching browser for scraping session");

    let user_data_dir =
        std::env::temp_dir().join(format!("isl_dataset_scraper_{}", std::process::id()));

    let (browser, handler) =
        crate::browser_setup::launch_browser(config, user_data_dir.clone()).await?;

    Ok(BrowserWrapper::new(browser, handler, user_data_dir))
}
