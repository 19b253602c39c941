//! Sequential crawl: categories, then words, then videos
//!
//! Failures are contained at the narrowest boundary that can absorb them: a
//! word that fails is logged and skipped, a category that fails is logged and
//! the next one starts. Only writing the final dataset can fail the run.
//!
//! A shutdown request stops the crawl between pages; whatever was collected up
//! to then is still written as the complete dataset.

use chrono::Utc;
use serde::Serialize;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use crate::Config;
use crate::browser::{BrowserResult, PageDriver};
use crate::dataset::{Dataset, DatasetRecord, DatasetWriter};
use crate::resolvers::{
    CategoryEntry, CategoryListing, CategorySource, WordEntry, list_categories, list_words,
    resolve_video,
};
use crate::utils::ScrapeResult;

/// Counters describing how a run went
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub category_source: CategorySource,
    pub categories_found: usize,
    pub categories_failed: usize,
    pub words_seen: usize,
    pub words_skipped: usize,
    pub words_failed: usize,
    pub records: usize,
    pub complete_file: Option<PathBuf>,
    /// The crawl was stopped early by a shutdown request
    pub interrupted: bool,
}

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    pub dataset: Dataset,
    pub summary: RunSummary,
}

/// Result of one category
#[derive(Debug, Default)]
struct CategoryOutcome {
    dataset: Dataset,
    words_seen: usize,
    words_skipped: usize,
    words_failed: usize,
    interrupted: bool,
}

enum WordOutcome {
    Recorded(DatasetRecord),
    NoVideo,
}

/// Drives one crawl over a [`PageDriver`]
pub struct Scraper<'a, D: PageDriver + ?Sized> {
    driver: &'a D,
    config: &'a Config,
    writer: DatasetWriter,
}

impl<'a, D: PageDriver + ?Sized> Scraper<'a, D> {
    /// Prepare a run; creates the output directory
    pub fn new(driver: &'a D, config: &'a Config) -> ScrapeResult<Self> {
        Ok(Self {
            driver,
            config,
            writer: DatasetWriter::new(&config.output)?,
        })
    }

    /// Crawl every category and write the complete dataset
    pub async fn run(&self) -> ScrapeResult<RunReport> {
        self.run_until(std::future::pending()).await
    }

    /// Like [`Scraper::run`], but stop early once `shutdown` completes
    ///
    /// The page in flight is abandoned; records collected before it are
    /// written as the complete dataset.
    pub async fn run_until<S>(&self, shutdown: S) -> ScrapeResult<RunReport>
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let listing = tokio::select! {
            biased;
            _ = &mut shutdown => None,
            listing = list_categories(self.driver, &self.config.site) => Some(listing),
        };
        let interrupted = listing.is_none();
        let listing = listing.unwrap_or(CategoryListing {
            entries: Vec::new(),
            source: CategorySource::Live,
        });
        if listing.is_fallback() {
            warn!(
                "Live category extraction failed; crawling {} fallback categories",
                listing.entries.len()
            );
        }

        let mut overall = Dataset::new();
        let mut summary = RunSummary {
            category_source: listing.source,
            categories_found: listing.entries.len(),
            categories_failed: 0,
            words_seen: 0,
            words_skipped: 0,
            words_failed: 0,
            records: 0,
            complete_file: None,
            interrupted,
        };

        for category in &listing.entries {
            if summary.interrupted {
                break;
            }
            info!("Processing category: {}", category.name);

            let outcome = match self.scrape_category(category, &mut shutdown).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!("Category '{}' failed: {}", category.name, e);
                    summary.categories_failed += 1;
                    continue;
                }
            };

            summary.words_seen += outcome.words_seen;
            summary.words_skipped += outcome.words_skipped;
            summary.words_failed += outcome.words_failed;
            summary.interrupted = outcome.interrupted;

            if let Err(e) = self.writer.write_category(&category.name, &outcome.dataset) {
                warn!("Could not save category '{}': {}", category.name, e);
            }
            overall.extend(outcome.dataset);

            match self.writer.write_progress(&overall) {
                Ok(Some(_)) => info!("Saved overall progress ({} records)", overall.len()),
                Ok(None) => {}
                Err(e) => warn!("Could not save overall progress: {}", e),
            }
        }

        if summary.interrupted {
            warn!("Shutdown requested; saving {} records collected so far", overall.len());
        }
        summary.records = overall.len();
        summary.complete_file = self.writer.write_complete(&overall)?;

        info!(
            "Run finished: {} records from {} categories ({} failed), {} words skipped, {} words failed",
            summary.records,
            summary.categories_found,
            summary.categories_failed,
            summary.words_skipped,
            summary.words_failed
        );

        Ok(RunReport {
            dataset: overall,
            summary,
        })
    }

    /// Every word of one category; only listing the words can fail
    async fn scrape_category<S>(
        &self,
        category: &CategoryEntry,
        shutdown: &mut S,
    ) -> ScrapeResult<CategoryOutcome>
    where
        S: Future<Output = ()> + Unpin,
    {
        let site = &self.config.site;
        let extraction = &self.config.extraction;
        let listed = tokio::select! {
            biased;
            _ = &mut *shutdown => None,
            words = list_words(self.driver, category, site, extraction) => Some(words),
        };
        let Some(words) = listed else {
            return Ok(CategoryOutcome {
                interrupted: true,
                ..CategoryOutcome::default()
            });
        };
        let words = words?;

        let mut outcome = CategoryOutcome {
            words_seen: words.len(),
            ..CategoryOutcome::default()
        };
        let delay = Duration::from_millis(self.config.timing.inter_word_delay_ms);

        for word in &words {
            info!("Processing word: {}", word.word);

            let scraped = tokio::select! {
                biased;
                _ = &mut *shutdown => None,
                result = self.scrape_word(word) => Some(result),
            };

            match scraped {
                None => {
                    outcome.interrupted = true;
                    break;
                }
                Some(Ok(WordOutcome::Recorded(record))) => {
                    info!("Added to dataset: {}", word.word);
                    outcome.dataset.push(record);
                }
                Some(Ok(WordOutcome::NoVideo)) => {
                    info!("Skipping {} (no video link found)", word.word);
                    outcome.words_skipped += 1;
                }
                Some(Err(e)) => {
                    warn!("Word '{}' in '{}' failed: {}", word.word, category.name, e);
                    outcome.words_failed += 1;
                }
            }

            tokio::select! {
                biased;
                _ = &mut *shutdown => {
                    outcome.interrupted = true;
                    break;
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }

        Ok(outcome)
    }

    async fn scrape_word(&self, word: &WordEntry) -> ScrapeResult<WordOutcome> {
        let video = resolve_video(self.driver, &word.url, self.config).await?;

        match DatasetRecord::from_video(word, &video) {
            Some(record) => Ok(WordOutcome::Recorded(record)),
            None => {
                match self.capture_diagnostic().await {
                    Ok(path) => info!("Saved error screenshot to {}", path.display()),
                    Err(e) => warn!("Diagnostic capture for {} failed: {}", word.url, e),
                }
                Ok(WordOutcome::NoVideo)
            }
        }
    }

    /// Capture the current page for later debugging
    async fn capture_diagnostic(&self) -> BrowserResult<PathBuf> {
        let name = format!("error_{}.png", Utc::now().format("%Y%m%dT%H%M%S%.3fZ"));
        let path = self.config.output.diagnostics_dir.join(name);

        self.driver.capture_screenshot(&path).await?;
        Ok(path)
    }
}
