//! In-memory `PageDriver` serving canned markup, for pipeline tests

#![allow(dead_code)]

use async_trait::async_trait;
use isl_dataset_scraper::{BrowserError, BrowserResult, Config, PageDriver};
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

pub const ROOT: &str = "https://talkinghands.co.in";

#[derive(Debug, Clone)]
struct FakePage {
    html: String,
    duration: Option<f64>,
}

/// Serves registered pages; anything else fails to navigate
#[derive(Default)]
pub struct FakeDriver {
    pages: HashMap<String, FakePage>,
    current: Mutex<Option<String>>,
    visits: Mutex<Vec<String>>,
    screenshots: Mutex<Vec<PathBuf>>,
    fail_screenshots: bool,
    notify_on_open: Option<(String, Arc<Notify>)>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            FakePage {
                html: html.to_string(),
                duration: None,
            },
        );
        self
    }

    /// Word page whose player reports `duration`
    pub fn video_page(mut self, url: &str, html: &str, duration: Option<f64>) -> Self {
        self.pages.insert(
            url.to_string(),
            FakePage {
                html: html.to_string(),
                duration,
            },
        );
        self
    }

    pub fn failing_screenshots(mut self) -> Self {
        self.fail_screenshots = true;
        self
    }

    /// Fire `notify` when `url` is opened
    pub fn notify_on_open(mut self, url: &str, notify: Arc<Notify>) -> Self {
        self.notify_on_open = Some((url.to_string(), notify));
        self
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }

    pub fn screenshots(&self) -> Vec<PathBuf> {
        self.screenshots.lock().unwrap().clone()
    }

    fn current_page(&self) -> BrowserResult<FakePage> {
        let current = self.current.lock().unwrap().clone();
        current
            .and_then(|url| self.pages.get(&url).cloned())
            .ok_or_else(|| BrowserError::NavigationFailed("no page loaded".into()))
    }
}

fn first_attribute(html: &str, selector: &str, name: &str) -> Option<Option<String>> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(selector).ok()?;
    let element = document.select(&selector).next()?;
    Some(element.value().attr(name).map(str::to_string))
}

#[async_trait]
impl PageDriver for FakeDriver {
    async fn open(&self, url: &str) -> BrowserResult<()> {
        self.visits.lock().unwrap().push(url.to_string());
        if let Some((trigger, notify)) = &self.notify_on_open
            && trigger == url
        {
            notify.notify_one();
        }
        if !self.pages.contains_key(url) {
            return Err(BrowserError::NavigationFailed(format!("{url}: net::ERR_NAME_NOT_RESOLVED")));
        }
        *self.current.lock().unwrap() = Some(url.to_string());
        Ok(())
    }

    async fn rendered_html(&self) -> BrowserResult<String> {
        Ok(self.current_page()?.html)
    }

    async fn wait_for_element(&self, selector: &str, timeout: Duration) -> BrowserResult<()> {
        let page = self.current_page()?;
        match first_attribute(&page.html, selector, "id") {
            Some(_) => Ok(()),
            None => Err(BrowserError::ElementTimeout {
                selector: selector.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }),
        }
    }

    async fn attribute(&self, selector: &str, name: &str) -> BrowserResult<Option<String>> {
        let page = self.current_page()?;
        Ok(first_attribute(&page.html, selector, name).flatten())
    }

    async fn video_duration(&self) -> BrowserResult<Option<f64>> {
        Ok(self.current_page()?.duration)
    }

    async fn capture_screenshot(&self, path: &Path) -> BrowserResult<()> {
        self.screenshots.lock().unwrap().push(path.to_path_buf());
        if self.fail_screenshots {
            return Err(BrowserError::ScreenshotFailed("target closed".into()));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| BrowserError::IoError(e.to_string()))?;
        }
        std::fs::write(path, b"\x89PNG").map_err(|e| BrowserError::IoError(e.to_string()))
    }
}

/// Config pointing at the fake site with every delay removed
pub fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.site.root_url = ROOT.to_string();
    config.site.fallback_categories = vec![isl_dataset_scraper::resolvers::CategoryEntry {
        name: "Animals and Birds".into(),
        url: format!("{ROOT}/animals-and-birds-in-isl"),
    }];
    config.timing.settle_delay_ms = 0;
    config.timing.inter_word_delay_ms = 0;
    config.timing.element_wait_timeout_ms = 0;
    config.output.output_dir = dir.join("output");
    config.output.diagnostics_dir = dir.join("output").join("diagnostics");
    config
}

pub fn video_html(src: &str) -> String {
    format!(r#"<html><body><video controls><source src="{src}" type="video/mp4"></video></body></html>"#)
}
