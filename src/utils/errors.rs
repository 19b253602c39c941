use thiserror::Error;

use crate::browser::BrowserError;

/// Errors raised while scraping and exporting the dataset
///
/// Everything except `FatalSession` and a failed final export is caught at the
/// word or category boundary by the pipeline and logged.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("{stage} failed for {url}: {source}")]
    Navigation {
        stage: &'static str,
        url: String,
        #[source]
        source: BrowserError,
    },

    #[error("Browser session could not be established: {0}")]
    FatalSession(#[source] BrowserError),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("CSV error: {0}")]
    CsvError(String),
}

impl ScrapeError {
    /// Wrap a browser failure with the stage and URL it happened at
    pub fn navigation(stage: &'static str, url: impl Into<String>, source: BrowserError) -> Self {
        ScrapeError::Navigation {
            stage,
            url: url.into(),
            source,
        }
    }
}

/// Implement From<std::io::Error> for ScrapeError
impl From<std::io::Error> for ScrapeError {
    fn from(err: std::io::Error) -> Self {
        ScrapeError::IoError(err.to_string())
    }
}

/// Implement From<csv::Error> for ScrapeError
impl From<csv::Error> for ScrapeError {
    fn from(err: csv::Error) -> Self {
        ScrapeError::CsvError(err.to_string())
    }
}

/// Implement From<serde_yaml::Error> for ScrapeError
impl From<serde_yaml::Error> for ScrapeError {
    fn from(err: serde_yaml::Error) -> Self {
        ScrapeError::Config(err.to_string())
    }
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;
