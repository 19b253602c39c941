//! Word links on a category page

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::browser::PageDriver;
use crate::page_extractor::{ExtractionPolicy, normalize_url, origin_of};
use crate::resolvers::CategoryEntry;
use crate::utils::{ScrapeError, ScrapeResult};
use crate::{ExtractionConfig, SiteConfig};

/// A word whose page holds the sign video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    /// Absolute URL
    pub url: String,
}

/// Base for relative word hrefs on `category_url`
///
/// The category URL cut right before `/<marker>`. Category URLs that embed the
/// marker in their last segment (`/animals-and-birds-in-isl`) have no such cut
/// point and use the site origin instead, so `cat` on that page resolves to
/// `https://talkinghands.co.in/cat`. The full category URL is deliberately
/// never used as the base: word pages live at the site root, and
/// `.../animals-and-birds-in-isl/cat` does not exist.
pub fn word_base_url(category_url: &str, marker: &str) -> String {
    if !marker.is_empty() {
        let cut = format!("/{marker}");
        if let Some(idx) = category_url.find(&cut) {
            return category_url[..idx].to_string();
        }
    }

    origin_of(category_url).unwrap_or_else(|| category_url.trim_end_matches('/').to_string())
}

/// Filter deciding whether an anchor on a category page names a word
struct WordFilter<'a> {
    ui_labels: &'a [String],
    excluded_fragments: &'a [String],
    category_marker: Option<&'a str>,
}

impl<'a> WordFilter<'a> {
    fn new(site: &'a SiteConfig, extraction: &'a ExtractionConfig) -> Self {
        let selects_on_marker = matches!(extraction.word_policy, ExtractionPolicy::Pattern { .. });
        Self {
            ui_labels: &extraction.ui_labels,
            excluded_fragments: &extraction.excluded_fragments,
            category_marker: (extraction.exclude_category_links && !selects_on_marker)
                .then_some(site.category_marker.as_str()),
        }
    }

    fn accepts(&self, text: &str, href: &str) -> bool {
        let rejected = text.is_empty()
            || self.ui_labels.iter().any(|label| label.eq_ignore_ascii_case(text))
            || self
                .excluded_fragments
                .iter()
                .any(|fragment| href.contains(fragment.as_str()))
            || self.category_marker.is_some_and(|marker| href.contains(marker));

        if rejected {
            debug!("Skipping non-word link: {} -> {}", text, href);
        }
        !rejected
    }
}

/// Word links in the markup of `category_url`
pub fn resolve_words(
    html: &str,
    category_url: &str,
    site: &SiteConfig,
    extraction: &ExtractionConfig,
) -> ScrapeResult<Vec<WordEntry>> {
    let filter = WordFilter::new(site, extraction);
    let anchors = extraction
        .word_policy
        .extract(html, |text, href| filter.accepts(text, href))?;

    let base = word_base_url(category_url, &site.category_marker);
    let words = anchors
        .into_iter()
        .map(|anchor| WordEntry {
            url: normalize_url(&anchor.href, &base),
            word: anchor.text,
        })
        .inspect(|w| debug!("Adding word: {} - {}", w.word, w.url))
        .collect();

    Ok(words)
}

/// Visit a category page and list its words
///
/// An empty list is a normal outcome; only navigation problems are errors.
pub async fn list_words<D>(
    driver: &D,
    category: &CategoryEntry,
    site: &SiteConfig,
    extraction: &ExtractionConfig,
) -> ScrapeResult<Vec<WordEntry>>
where
    D: PageDriver + ?Sized,
{
    info!("Getting words from: {}", category.url);

    driver
        .open(&category.url)
        .await
        .map_err(|e| ScrapeError::navigation("open category page", &category.url, e))?;
    let html = driver
        .rendered_html()
        .await
        .map_err(|e| ScrapeError::navigation("read category page", &category.url, e))?;

    let words = resolve_words(&html, &category.url, site, extraction)?;
    info!("Found {} words in category {}", words.len(), category.name);
    Ok(words)
}
