//! Scoped browser session for one scraping run
//!
//! # Architecture
//!
//! A run acquires exactly one [`BrowserSession`] at start and releases it on
//! exit. The session owns a single page that is reused for every navigation,
//! which keeps the crawl strictly sequential.
//!
//! Release happens through `shutdown()` (close + wait + profile cleanup) on
//! every exit path of `crate::run`, including Ctrl-C and SIGTERM, which stop
//! the crawl instead of the process. If the run unwinds before reaching it,
//! `BrowserWrapper::drop` still lets `Browser` kill the Chrome child.

use async_trait::async_trait;
use chromiumoxide::page::{Page, ScreenshotParams};
use chromiumoxide_cdp::cdp::browser_protocol::page::CaptureScreenshotFormat;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::browser::{BrowserError, BrowserResult, BrowserWrapper, PageDriver, launch_browser};
use crate::utils::wait_for_element;
use crate::{BrowserConfig, TimingConfig};

/// Reads `duration` off the first `<video>`; -1 stands in for NaN/missing
/// because CDP cannot return NaN by value.
const VIDEO_DURATION_JS: &str = r#"(() => {
    const video = document.querySelector('video');
    if (!video) { return -1; }
    const d = video.duration;
    return Number.isFinite(d) ? d : -1;
})()"#;

/// Live browser plus the page every navigation goes through
pub struct BrowserSession {
    wrapper: BrowserWrapper,
    page: Page,
    page_load_timeout: Duration,
    settle_delay: Duration,
}

impl BrowserSession {
    /// Launch Chrome and open the working page
    ///
    /// Any failure here is fatal for the run; the caller maps it to
    /// `ScrapeError::FatalSession`.
    pub async fn launch(browser: &BrowserConfig, timing: &TimingConfig) -> BrowserResult<Self> {
        let page_load_timeout = crate::utils::validate_navigation_timeout(timing.page_load_timeout_ms)
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        let wrapper = launch_browser(browser)
            .await
            .map_err(|e| BrowserError::LaunchFailed(format!("{e:#}")))?;

        let created = wrapper.browser().new_page("about:blank").await;
        let page = match created {
            Ok(page) => page,
            Err(e) => {
                wrapper.close().await;
                return Err(BrowserError::PageCreationFailed(e.to_string()));
            }
        };

        info!("Browser session ready");
        Ok(Self {
            wrapper,
            page,
            page_load_timeout,
            settle_delay: Duration::from_millis(timing.settle_delay_ms),
        })
    }

    /// Close the page and the browser, then remove the profile directory
    pub async fn shutdown(self) {
        info!("Shutting down browser session");
        let Self { wrapper, page, .. } = self;
        if let Err(e) = page.close().await {
            debug!("Failed to close page before shutdown: {}", e);
        }
        wrapper.close().await;
        info!("Browser closed");
    }
}

#[async_trait]
impl PageDriver for BrowserSession {
    async fn open(&self, url: &str) -> BrowserResult<()> {
        let navigation = async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;
            Ok::<_, chromiumoxide::error::CdpError>(())
        };

        tokio::time::timeout(self.page_load_timeout, navigation)
            .await
            .map_err(|_| BrowserError::NavigationTimeout {
                url: url.to_string(),
                timeout_ms: self.page_load_timeout.as_millis() as u64,
            })?
            .map_err(|e| BrowserError::NavigationFailed(format!("{url}: {e}")))?;

        // Content is rendered client-side after the load event
        tokio::time::sleep(self.settle_delay).await;
        Ok(())
    }

    async fn rendered_html(&self) -> BrowserResult<String> {
        self.page
            .content()
            .await
            .map_err(|e| BrowserError::EvaluationFailed(format!("page content: {e}")))
    }

    async fn wait_for_element(&self, selector: &str, timeout: Duration) -> BrowserResult<()> {
        wait_for_element(selector, timeout, || async {
            self.page.find_element(selector).await.ok().map(|_| ())
        })
        .await
    }

    async fn attribute(&self, selector: &str, name: &str) -> BrowserResult<Option<String>> {
        let element = match self.page.find_element(selector).await {
            Ok(element) => element,
            Err(e) => {
                debug!("No element for '{}': {}", selector, e);
                return Ok(None);
            }
        };

        element
            .attribute(name)
            .await
            .map_err(|e| BrowserError::EvaluationFailed(format!("{selector}[{name}]: {e}")))
    }

    async fn video_duration(&self) -> BrowserResult<Option<f64>> {
        let seconds: f64 = self
            .page
            .evaluate(VIDEO_DURATION_JS)
            .await
            .map_err(|e| BrowserError::EvaluationFailed(format!("video duration: {e}")))?
            .into_value()
            .map_err(|e| BrowserError::EvaluationFailed(format!("video duration: {e}")))?;

        Ok((seconds >= 0.0).then_some(seconds))
    }

    async fn capture_screenshot(&self, path: &Path) -> BrowserResult<()> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();

        let image = self
            .page
            .screenshot(params)
            .await
            .map_err(|e| BrowserError::ScreenshotFailed(e.to_string()))?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| BrowserError::IoError(e.to_string()))?;
        }
        tokio::fs::write(path, image)
            .await
            .map_err(|e| BrowserError::IoError(e.to_string()))
    }
}
