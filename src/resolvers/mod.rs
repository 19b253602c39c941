//! Category, word and video resolution
//!
//! Each resolver splits into a pure markup step (testable against fixture
//! HTML) and a thin async step that drives a [`crate::PageDriver`].

mod categories;
mod video;
mod words;

pub use categories::{
    CategoryEntry, CategoryListing, CategorySource, list_categories, resolve_categories,
};
pub use video::{VideoMetadata, resolve_video};
pub use words::{WordEntry, list_words, resolve_words, word_base_url};
