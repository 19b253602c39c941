//! Category listing from the landing page

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::SiteConfig;
use crate::browser::PageDriver;
use crate::page_extractor::{ExtractionPolicy, normalize_url};
use crate::utils::ScrapeResult;

/// A category page to scrape words from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub name: String,
    /// Absolute URL
    pub url: String,
}

/// Whether the listing came from the site or from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategorySource {
    Live,
    Fallback,
}

/// Categories to crawl plus how they were obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryListing {
    pub entries: Vec<CategoryEntry>,
    pub source: CategorySource,
}

impl CategoryListing {
    fn fallback(site: &SiteConfig) -> Self {
        Self {
            entries: site.fallback_categories.clone(),
            source: CategorySource::Fallback,
        }
    }

    /// True when live extraction failed and the configured list is in use
    pub fn is_fallback(&self) -> bool {
        self.source == CategorySource::Fallback
    }
}

/// Category links on the landing page
///
/// Keeps anchors whose href carries the category marker, drops empty and
/// denylisted names, and removes repeated (name, url) pairs since the site
/// links each category from both the menu and the page body.
pub fn resolve_categories(html: &str, site: &SiteConfig) -> ScrapeResult<Vec<CategoryEntry>> {
    let policy = ExtractionPolicy::Pattern {
        marker: site.category_marker.clone(),
    };

    let anchors = policy.extract(html, |text, _| {
        !text.is_empty() && !site.excluded_categories.iter().any(|ex| ex == text)
    })?;

    let mut categories: Vec<CategoryEntry> = Vec::with_capacity(anchors.len());
    for anchor in anchors {
        let entry = CategoryEntry {
            url: normalize_url(&anchor.href, &site.root_url),
            name: anchor.text,
        };
        if !categories.contains(&entry) {
            info!("Adding category: {} - {}", entry.name, entry.url);
            categories.push(entry);
        }
    }

    Ok(categories)
}

/// Visit the landing page and list its categories
///
/// Never fails: a broken landing page or an empty result degrades to the
/// configured fallback list, flagged as [`CategorySource::Fallback`].
pub async fn list_categories<D>(driver: &D, site: &SiteConfig) -> CategoryListing
where
    D: PageDriver + ?Sized,
{
    info!("Fetching categories from {}", site.root_url);

    let live = async {
        driver.open(&site.root_url).await?;
        driver.rendered_html().await
    }
    .await;

    let html = match live {
        Ok(html) => html,
        Err(e) => {
            warn!(
                "Landing page {} failed ({}); using fallback categories",
                site.root_url, e
            );
            return CategoryListing::fallback(site);
        }
    };

    match resolve_categories(&html, site) {
        Ok(entries) if !entries.is_empty() => {
            info!("Found {} categories", entries.len());
            CategoryListing {
                entries,
                source: CategorySource::Live,
            }
        }
        Ok(_) => {
            warn!("No categories found automatically. Using fallback categories");
            CategoryListing::fallback(site)
        }
        Err(e) => {
            warn!("Category extraction failed ({}); using fallback categories", e);
            CategoryListing::fallback(site)
        }
    }
}
