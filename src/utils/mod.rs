// Shared helpers: constants, error taxonomy, timeout rules, element polling
pub mod constants;
mod errors;
mod timeout;
mod wait_for_element;

pub use errors::{ScrapeError, ScrapeResult};
pub use timeout::{validate_interaction_timeout, validate_navigation_timeout};
pub use wait_for_element::wait_for_element;
