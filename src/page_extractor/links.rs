//! Anchor extraction under the two link-filtering policies

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utils::{ScrapeError, ScrapeResult};

/// An `<a>` element that carried an `href`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Descendant text, trimmed
    pub text: String,
    /// Raw `href` attribute as written in the markup
    pub href: String,
}

/// How candidate links are located in a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionPolicy {
    /// Whole document, keeping only hrefs that contain `marker`
    Pattern { marker: String },

    /// Only inside the first region selector that matches anything
    ///
    /// Falls back to the whole document when no region matches.
    Containment { regions: Vec<String> },
}

impl ExtractionPolicy {
    /// Check that every selector this policy uses parses
    pub fn validate(&self) -> ScrapeResult<()> {
        match self {
            ExtractionPolicy::Pattern { marker } if marker.is_empty() => Err(
                ScrapeError::Config("pattern policy needs a non-empty marker".into()),
            ),
            ExtractionPolicy::Pattern { .. } => Ok(()),
            ExtractionPolicy::Containment { regions } => {
                regions.iter().try_for_each(|r| parse_selector(r).map(drop))
            }
        }
    }

    /// Anchors in `html` accepted by this policy and by `predicate(text, href)`
    pub fn extract<P>(&self, html: &str, predicate: P) -> ScrapeResult<Vec<Anchor>>
    where
        P: Fn(&str, &str) -> bool,
    {
        match self {
            ExtractionPolicy::Pattern { marker } => {
                extract_anchors(html, &[], |text, href| {
                    href.contains(marker.as_str()) && predicate(text, href)
                })
            }
            ExtractionPolicy::Containment { regions } => {
                let regions = regions
                    .iter()
                    .map(|r| parse_selector(r))
                    .collect::<ScrapeResult<Vec<_>>>()?;
                extract_anchors(html, &regions, predicate)
            }
        }
    }
}

/// Parse a CSS selector, reporting failures instead of panicking
pub fn parse_selector(selector: &str) -> ScrapeResult<Selector> {
    Selector::parse(selector).map_err(|e| ScrapeError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Collect anchors in document order
///
/// `regions` are tried in order; the first one matching any element restricts
/// the search to those elements. An empty slice, or no match at all, scans the
/// whole document. Anchors without an `href` are skipped. Results are not
/// deduplicated.
pub fn extract_anchors<P>(html: &str, regions: &[Selector], predicate: P) -> ScrapeResult<Vec<Anchor>>
where
    P: Fn(&str, &str) -> bool,
{
    let document = Html::parse_document(html);
    let anchor = parse_selector("a")?;

    let scopes = content_scopes(&document, regions);
    let mut anchors = Vec::new();
    let mut scanned = 0usize;

    for scope in scopes {
        for link in scope.select(&anchor) {
            scanned += 1;
            let Some(href) = link.value().attr("href") else {
                continue;
            };
            let text = link.text().collect::<String>();
            let text = text.trim();
            if predicate(text, href) {
                anchors.push(Anchor {
                    text: text.to_string(),
                    href: href.to_string(),
                });
            }
        }
    }

    debug!("Scanned {} links, kept {}", scanned, anchors.len());
    Ok(anchors)
}

/// Elements to search, outermost only so nested matches are not scanned twice
fn content_scopes<'a>(document: &'a Html, regions: &[Selector]) -> Vec<ElementRef<'a>> {
    for region in regions {
        let matched: Vec<ElementRef<'a>> = document.select(region).collect();
        if matched.is_empty() {
            continue;
        }
        let ids: Vec<_> = matched.iter().map(|el| el.id()).collect();
        return matched
            .into_iter()
            .filter(|el| !el.ancestors().any(|a| ids.contains(&a.id())))
            .collect();
    }

    vec![document.root_element()]
}
