//! Shared configuration constants for the scraper
//!
//! Defaults for the target site and the link-filtering heuristics live here so
//! the config layer and the resolvers agree on them.

/// Chrome user agent string for stealth mode
///
/// Chrome releases new stable versions ~every 4 weeks.
/// Update quarterly to stay within reasonable version window.
///
/// Reference: https://chromiumdash.appspot.com/schedule
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

/// Landing page of the sign-language reference site
pub const DEFAULT_ROOT_URL: &str = "https://talkinghands.co.in";

/// Substring present in every category page href
pub const CATEGORY_MARKER: &str = "in-isl";

/// Category labels that are listed on the landing page but hold no word videos
pub const EXCLUDED_CATEGORIES: &[&str] = &["Alphabets", "ASL Alphabets"];

/// Anchor labels that belong to page chrome, compared case-insensitively
pub const UI_CHROME_LABELS: &[&str] = &["previous", "next", "home", "back", "log in", "logout"];

/// Href fragments that never point at a word page
pub const EXCLUDED_HREF_FRAGMENTS: &[&str] = &["#", "user", "menu", "block-bartik"];

/// Content regions searched for word links, in priority order
pub const DEFAULT_CONTENT_REGIONS: &[&str] = &["div#content", "div.content"];

/// Characters that are not allowed in file names on common filesystems
pub const RESERVED_FILENAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Selector for the word video element
pub const VIDEO_SELECTOR: &str = "video";

/// Selector for a nested `<source>` inside the word video
pub const VIDEO_SOURCE_SELECTOR: &str = "video source";

/// Seconds exported as the clip end when the duration cannot be read
pub const DEFAULT_CLIP_SECONDS: u32 = 3;
