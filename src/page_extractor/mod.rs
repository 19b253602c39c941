//! Markup-level extraction from rendered pages
//!
//! Pure functions over HTML strings: anchor extraction under a configurable
//! [`ExtractionPolicy`] and href normalization. Nothing here talks to the
//! browser.

mod links;
mod href;

pub use links::{Anchor, ExtractionPolicy, extract_anchors, parse_selector};
pub use href::{has_scheme, normalize_url, origin_of};
