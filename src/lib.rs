//! Sign-language dataset scraper
//!
//! Walks a JavaScript-rendered sign-language reference site with a headless
//! browser: category listing, then the words of each category, then the video
//! behind each word. Every resolved word becomes a [`DatasetRecord`] and the
//! records are flushed to CSV after each category and at the end of the run.

mod browser;
pub mod browser_setup;
pub mod dataset;
mod manager;
pub mod page_extractor;
pub mod pipeline;
pub mod resolvers;
mod utils;

use serde::{Deserialize, Serialize};
use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::page_extractor::ExtractionPolicy;
use crate::resolvers::CategoryEntry;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub extraction: ExtractionConfig,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    /// Tracing filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Where the crawl starts and how category pages are recognised
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Landing page; also the base for root-relative hrefs
    #[serde(default = "default_root_url")]
    pub root_url: String,

    /// Substring that identifies category page hrefs
    #[serde(default = "default_category_marker")]
    pub category_marker: String,

    /// Category labels that are never scraped
    #[serde(default = "default_excluded_categories")]
    pub excluded_categories: Vec<String>,

    /// Used when the landing page yields no categories
    #[serde(default = "default_fallback_categories")]
    pub fallback_categories: Vec<CategoryEntry>,
}

/// Link filtering on category pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// How word links are located on a category page
    #[serde(default = "default_word_policy")]
    pub word_policy: ExtractionPolicy,

    /// Anchor labels treated as page chrome (case-insensitive)
    #[serde(default = "default_ui_labels")]
    pub ui_labels: Vec<String>,

    /// Href fragments that disqualify a word link
    #[serde(default = "default_excluded_fragments")]
    pub excluded_fragments: Vec<String>,

    /// Also reject hrefs containing the category marker
    ///
    /// Ignored under the pattern policy, which selects on that marker.
    #[serde(default = "default_exclude_category_links")]
    pub exclude_category_links: bool,
}

/// Fixed delays and bounded waits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Pause after every navigation so client-side rendering can finish
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Pause after every word page
    #[serde(default = "default_inter_word_delay_ms")]
    pub inter_word_delay_ms: u64,

    /// Upper bound on waiting for the `<video>` element
    #[serde(default = "default_element_wait_timeout_ms")]
    pub element_wait_timeout_ms: u64,

    /// Upper bound on a single page load
    #[serde(default = "default_page_load_timeout_ms")]
    pub page_load_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// File name prefix for every exported CSV
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Where page captures go when a word has no video
    #[serde(default = "default_diagnostics_dir")]
    pub diagnostics_dir: PathBuf,
}

/// Browser security and launch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Disable web security features (Same-Origin Policy, etc.)
    /// WARNING: Only enable for trusted content
    #[serde(default = "default_disable_security")]
    pub disable_security: bool,

    /// Window dimensions
    #[serde(default)]
    pub window: WindowConfig,

    /// Explicit Chrome/Chromium binary; searched for when unset
    #[serde(default)]
    pub chrome_executable: Option<PathBuf>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_width")]
    pub width: u32,

    #[serde(default = "default_window_height")]
    pub height: u32,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_root_url() -> String {
    constants::DEFAULT_ROOT_URL.to_string()
}

fn default_category_marker() -> String {
    constants::CATEGORY_MARKER.to_string()
}

fn default_excluded_categories() -> Vec<String> {
    constants::EXCLUDED_CATEGORIES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_fallback_categories() -> Vec<CategoryEntry> {
    vec![CategoryEntry {
        name: "Animals and Birds".to_string(),
        url: format!("{}/animals-and-birds-in-isl", constants::DEFAULT_ROOT_URL),
    }]
}

fn default_word_policy() -> ExtractionPolicy {
    ExtractionPolicy::Containment {
        regions: constants::DEFAULT_CONTENT_REGIONS
            .iter()
            .map(|s| s.to_string())
            .collect(),
    }
}

fn default_ui_labels() -> Vec<String> {
    constants::UI_CHROME_LABELS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_excluded_fragments() -> Vec<String> {
    constants::EXCLUDED_HREF_FRAGMENTS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_exclude_category_links() -> bool {
    true
}

fn default_settle_delay_ms() -> u64 {
    3_000
}

fn default_inter_word_delay_ms() -> u64 {
    1_000
}

fn default_element_wait_timeout_ms() -> u64 {
    10_000
}

fn default_page_load_timeout_ms() -> u64 {
    30_000
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_file_prefix() -> String {
    "isl_dataset".to_string()
}

fn default_diagnostics_dir() -> PathBuf {
    PathBuf::from("output").join("diagnostics")
}

fn default_headless() -> bool {
    true
}

fn default_disable_security() -> bool {
    false // SECURE BY DEFAULT
}

fn default_user_agent() -> String {
    constants::CHROME_USER_AGENT.to_string()
}

fn default_window_width() -> u32 {
    1920
}

fn default_window_height() -> u32 {
    1080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            extraction: ExtractionConfig::default(),
            timing: TimingConfig::default(),
            output: OutputConfig::default(),
            browser: BrowserConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root_url: default_root_url(),
            category_marker: default_category_marker(),
            excluded_categories: default_excluded_categories(),
            fallback_categories: default_fallback_categories(),
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            word_policy: default_word_policy(),
            ui_labels: default_ui_labels(),
            excluded_fragments: default_excluded_fragments(),
            exclude_category_links: default_exclude_category_links(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            inter_word_delay_ms: default_inter_word_delay_ms(),
            element_wait_timeout_ms: default_element_wait_timeout_ms(),
            page_load_timeout_ms: default_page_load_timeout_ms(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            file_prefix: default_file_prefix(),
            diagnostics_dir: default_diagnostics_dir(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            disable_security: default_disable_security(),
            window: WindowConfig::default(),
            chrome_executable: None,
            user_agent: default_user_agent(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
        }
    }
}

impl Config {
    /// Reject settings that would make the run hang or silently scrape nothing
    pub fn validate(&self) -> ScrapeResult<()> {
        let root = url::Url::parse(&self.site.root_url).map_err(|e| {
            ScrapeError::Config(format!("root_url '{}' is not absolute: {e}", self.site.root_url))
        })?;
        if !matches!(root.scheme(), "http" | "https") {
            return Err(ScrapeError::Config(format!(
                "root_url must be http(s), got '{}'",
                root.scheme()
            )));
        }

        if self.site.category_marker.trim().is_empty() {
            return Err(ScrapeError::Config("category_marker must not be empty".into()));
        }

        if self.output.file_prefix.trim().is_empty() {
            return Err(ScrapeError::Config("file_prefix must not be empty".into()));
        }

        utils::validate_navigation_timeout(self.timing.page_load_timeout_ms)?;
        utils::validate_interaction_timeout(self.timing.element_wait_timeout_ms)?;
        self.extraction.word_policy.validate()?;

        Ok(())
    }
}

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "ISL_SCRAPER_CONFIG";

/// Load config from YAML
///
/// Lookup order: `ISL_SCRAPER_CONFIG`, `./config.yaml`, then `config.yaml` in
/// the package root. No file at all means defaults.
pub fn load_yaml_config() -> ScrapeResult<Config> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return load_config_from(Path::new(&path));
    }

    let candidates = [
        PathBuf::from("config.yaml"),
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config.yaml"),
    ];

    match candidates.iter().find(|p| p.exists()) {
        Some(path) => load_config_from(path),
        None => Ok(Config::default()),
    }
}

/// Parse one YAML config file; missing keys take their defaults
pub fn load_config_from(path: &Path) -> ScrapeResult<Config> {
    let contents = fs::read_to_string(path).map_err(|e| {
        ScrapeError::Config(format!("cannot read {}: {e}", path.display()))
    })?;
    let config: Config = serde_yaml::from_str(&contents)?;
    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Future that resolves on the first Ctrl-C or SIGTERM
///
/// The handlers are installed when this is called, so a signal that arrives
/// before the future is first polled is still observed.
#[cfg(unix)]
pub fn shutdown_signal() -> impl Future<Output = ()> {
    use tokio::signal::unix::{Signal, SignalKind, signal};

    fn install(kind: SignalKind, name: &str) -> Option<Signal> {
        signal(kind)
            .inspect_err(|e| warn!("Failed to register {} handler: {}", name, e))
            .ok()
    }

    async fn recv(stream: Option<Signal>) {
        match stream {
            Some(mut stream) => {
                stream.recv().await;
            }
            None => std::future::pending::<()>().await,
        }
    }

    let interrupt = install(SignalKind::interrupt(), "SIGINT");
    let terminate = install(SignalKind::terminate(), "SIGTERM");

    async move {
        tokio::select! {
            _ = recv(interrupt) => info!("Received Ctrl+C, shutting down"),
            _ = recv(terminate) => info!("Received SIGTERM, shutting down"),
        }
    }
}

/// Future that resolves on the first Ctrl-C
#[cfg(not(unix))]
pub fn shutdown_signal() -> impl Future<Output = ()> {
    async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await
            }
        }
    }
}

/// Scrape the whole site with a freshly launched browser
///
/// The browser is acquired once and released before this returns, whatever
/// the pipeline outcome. Ctrl-C or SIGTERM stops the crawl, saves what was
/// collected and still releases the browser. A launch failure is the only
/// error that stops the run before any page is visited.
pub async fn run(config: &Config) -> ScrapeResult<pipeline::RunReport> {
    config.validate()?;

    // Installed before launch so an early Ctrl-C does not kill the process
    // with Chrome still running.
    let shutdown = shutdown_signal();

    let session = BrowserSession::launch(&config.browser, &config.timing)
        .await
        .map_err(|e| {
            error!("Could not establish browser session: {}", e);
            ScrapeError::FatalSession(e)
        })?;

    let outcome = match pipeline::Scraper::new(&session, config) {
        Ok(scraper) => scraper.run_until(shutdown).await,
        Err(e) => Err(e),
    };

    session.shutdown().await;
    outcome
}

pub use browser::{
    BrowserError, BrowserResult, BrowserWrapper, PageDriver, download_managed_browser,
    find_browser_executable, launch_browser,
};
pub use dataset::{Dataset, DatasetRecord, DatasetWriter, sanitize_filename};
pub use manager::BrowserSession;
pub use pipeline::{RunReport, RunSummary, Scraper};
pub use utils::{ScrapeError, ScrapeResult, constants};
