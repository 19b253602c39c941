// Binary: Sign-language dataset scraper
//
// Loads config.yaml, crawls the site with a headless browser and writes the
// CSV dataset. Exits non-zero only when the run could not happen at all or the
// final dataset could not be written.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = isl_dataset_scraper::load_yaml_config().context("Failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting dataset scrape of {}", config.site.root_url);

    let report = isl_dataset_scraper::run(&config)
        .await
        .inspect_err(|e| tracing::error!("Scrape aborted: {}", e))
        .context("Dataset scrape failed")?;

    tracing::info!(
        "Collected {} records; summary: {}",
        report.dataset.len(),
        serde_json::to_string(&report.summary).unwrap_or_else(|_| "{}".to_string())
    );

    Ok(())
}
