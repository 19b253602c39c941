//! Video source and clip window for a word page

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::Config;
use crate::browser::PageDriver;
use crate::page_extractor::normalize_url;
use crate::utils::constants::{
    DEFAULT_CLIP_SECONDS, VIDEO_SELECTOR, VIDEO_SOURCE_SELECTOR,
};
use crate::utils::{ScrapeError, ScrapeResult, validate_interaction_timeout};

/// Where a word's video lives and which part of it to export
///
/// `source_url == None` means no playable source was found; the word must be
/// skipped. The window always starts at 0:00 and ends at the clip length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub source_url: Option<String>,
    pub start_minute: u32,
    pub start_second: u32,
    pub end_minute: u32,
    pub end_second: u32,
}

impl VideoMetadata {
    /// No playable source on the page
    pub fn not_found() -> Self {
        Self {
            source_url: None,
            start_minute: 0,
            start_second: 0,
            end_minute: 0,
            end_second: 0,
        }
    }

    /// Full-clip window for `source_url`
    ///
    /// A missing, NaN, infinite or non-positive duration gives the default
    /// window of 0:00 to 0:03.
    pub fn with_duration(source_url: String, duration_secs: Option<f64>) -> Self {
        let (end_minute, end_second) = match duration_secs {
            Some(d) if d.is_finite() && d > 0.0 => {
                ((d / 60.0).floor() as u32, (d % 60.0).floor() as u32)
            }
            _ => (0, DEFAULT_CLIP_SECONDS),
        };

        Self {
            source_url: Some(source_url),
            start_minute: 0,
            start_second: 0,
            end_minute,
            end_second,
        }
    }

    pub fn is_found(&self) -> bool {
        self.source_url.is_some()
    }
}

/// First non-empty `src` among `<video><source>` and `<video>` itself
async fn read_video_source<D>(driver: &D, word_url: &str) -> Option<String>
where
    D: PageDriver + ?Sized,
{
    for selector in [VIDEO_SOURCE_SELECTOR, VIDEO_SELECTOR] {
        match driver.attribute(selector, "src").await {
            Ok(Some(src)) if !src.trim().is_empty() => return Some(src.trim().to_string()),
            Ok(_) => debug!("No src on '{}' at {}", selector, word_url),
            Err(e) => warn!("Reading '{}' src at {} failed: {}", selector, word_url, e),
        }
    }
    None
}

/// Open a word page and resolve its video
///
/// Navigation failures are errors. Everything after the page loaded degrades
/// instead: no video element or no source gives [`VideoMetadata::not_found`],
/// an unreadable duration gives the default window.
pub async fn resolve_video<D>(driver: &D, word_url: &str, config: &Config) -> ScrapeResult<VideoMetadata>
where
    D: PageDriver + ?Sized,
{
    info!("Getting video details from: {}", word_url);

    driver
        .open(word_url)
        .await
        .map_err(|e| ScrapeError::navigation("open word page", word_url, e))?;

    let wait = validate_interaction_timeout(config.timing.element_wait_timeout_ms)?;
    if let Err(e) = driver.wait_for_element(VIDEO_SELECTOR, wait).await {
        info!("No video element at {}: {}", word_url, e);
        return Ok(VideoMetadata::not_found());
    }

    let Some(src) = read_video_source(driver, word_url).await else {
        info!("No video source found at {}", word_url);
        return Ok(VideoMetadata::not_found());
    };
    let src = normalize_url(&src, &config.site.root_url);
    info!("Found video source: {}", src);

    let duration = match driver.video_duration().await {
        Ok(Some(d)) if d.is_finite() && d > 0.0 => Some(d),
        Ok(_) => {
            info!("Could not get video duration, using default (0m {}s)", DEFAULT_CLIP_SECONDS);
            None
        }
        Err(e) => {
            warn!("Error getting duration at {}: {}", word_url, e);
            None
        }
    };

    Ok(VideoMetadata::with_duration(src, duration))
}
