//! End-to-end crawl tests over an in-memory site

mod common;

use std::sync::Arc;
use tokio::sync::Notify;

use common::{FakeDriver, ROOT, test_config, video_html};
use isl_dataset_scraper::Scraper;
use isl_dataset_scraper::resolvers::{
    CategoryEntry, CategorySource, list_categories, list_words, resolve_video,
};

const LANDING: &str = r#"<html><body>
    <nav>
      <a href="/alphabets-in-isl">Alphabets</a>
      <a href="/animals-and-birds-in-isl">Animals and Birds</a>
      <a href="/contact">Contact</a>
    </nav>
</body></html>"#;

const ANIMALS: &str = r#"<html><body>
    <div id="menu"><a href="/">Home</a></div>
    <div id="content">
      <a href="/cat">Cat</a>
      <a href="/dog">Dog</a>
      <a href="/animals-and-birds-in-isl?page=1">Next</a>
    </div>
</body></html>"#;

fn animals_url() -> String {
    format!("{ROOT}/animals-and-birds-in-isl")
}

fn two_word_site() -> FakeDriver {
    FakeDriver::new()
        .page(ROOT, LANDING)
        .page(&animals_url(), ANIMALS)
        .video_page(&format!("{ROOT}/cat"), &video_html("/videos/cat.mp4"), Some(125.7))
        .video_page(
            &format!("{ROOT}/dog"),
            &video_html("https://cdn.talkinghands.co.in/dog.mp4"),
            Some(4.2),
        )
}

#[tokio::test]
async fn landing_page_yields_only_non_excluded_category() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let driver = two_word_site();

    let listing = list_categories(&driver, &config.site).await;
    assert_eq!(listing.source, CategorySource::Live);
    assert_eq!(
        listing.entries,
        vec![CategoryEntry {
            name: "Animals and Birds".into(),
            url: animals_url(),
        }]
    );
}

#[tokio::test]
async fn category_page_drops_ui_chrome_links() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let driver = two_word_site();
    let category = CategoryEntry {
        name: "Animals and Birds".into(),
        url: animals_url(),
    };

    let words = list_words(&driver, &category, &config.site, &config.extraction)
        .await
        .unwrap();
    let urls: Vec<_> = words.iter().map(|w| w.url.as_str()).collect();
    assert_eq!(urls, [format!("{ROOT}/cat"), format!("{ROOT}/dog")]);
}

#[tokio::test]
async fn full_run_exports_every_resolved_word() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let driver = two_word_site();

    let report = Scraper::new(&driver, &config).unwrap().run().await.unwrap();

    let rows: Vec<_> = report
        .dataset
        .records()
        .iter()
        .map(|r| {
            (
                r.name.as_str(),
                r.link.as_str(),
                r.start_minute,
                r.start_second,
                r.end_minute,
                r.end_second,
            )
        })
        .collect();
    assert_eq!(
        rows,
        [
            ("Cat", "https://talkinghands.co.in/videos/cat.mp4", 0, 0, 2, 5),
            ("Dog", "https://cdn.talkinghands.co.in/dog.mp4", 0, 0, 0, 4),
        ]
    );

    let out = dir.path().join("output");
    assert!(out.join("isl_dataset_Animals and Birds.csv").exists());
    assert!(out.join("isl_dataset_progress.csv").exists());
    assert_eq!(
        report.summary.complete_file.as_deref(),
        Some(out.join("isl_dataset_complete.csv").as_path())
    );
    assert_eq!(report.summary.category_source, CategorySource::Live);
    assert_eq!(report.summary.records, 2);
    assert_eq!(report.summary.words_failed, 0);
}

#[tokio::test]
async fn category_without_words_produces_no_records() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let landing = r#"<a href="/empty-in-isl">Empty</a><a href="/animals-and-birds-in-isl">Animals</a>"#;
    let driver = FakeDriver::new()
        .page(ROOT, landing)
        .page(&format!("{ROOT}/empty-in-isl"), r#"<div id="content"><p>Coming soon</p></div>"#)
        .page(&animals_url(), r#"<div id="content"><a href="/cat">Cat</a></div>"#)
        .video_page(&format!("{ROOT}/cat"), &video_html("/v/cat.mp4"), Some(2.0));

    let report = Scraper::new(&driver, &config).unwrap().run().await.unwrap();

    assert_eq!(report.summary.categories_found, 2);
    assert_eq!(report.summary.categories_failed, 0);
    assert_eq!(report.dataset.len(), 1);
    assert!(!dir.path().join("output/isl_dataset_Empty.csv").exists());
    assert!(dir.path().join("output/isl_dataset_Animals.csv").exists());
}

#[tokio::test]
async fn word_without_video_is_skipped_and_captured() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let driver = two_word_site().page(&format!("{ROOT}/dog"), "<html><body><p>Video removed</p></body></html>");

    let report = Scraper::new(&driver, &config).unwrap().run().await.unwrap();

    assert_eq!(report.dataset.len(), 1);
    assert_eq!(report.summary.words_skipped, 1);
    let shots = driver.screenshots();
    assert_eq!(shots.len(), 1);
    assert!(shots[0].starts_with(&config.output.diagnostics_dir));
    assert!(shots[0].exists());
}

#[tokio::test]
async fn failed_capture_is_not_raised() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let driver = two_word_site()
        .page(&format!("{ROOT}/cat"), "<p>nothing</p>")
        .page(&format!("{ROOT}/dog"), "<video></video>")
        .failing_screenshots();

    let report = Scraper::new(&driver, &config).unwrap().run().await.unwrap();

    assert_eq!(driver.screenshots().len(), 2);
    assert_eq!(report.summary.words_skipped, 2);
    assert!(report.dataset.is_empty());
    assert_eq!(report.summary.complete_file, None);
}

#[tokio::test]
async fn broken_word_page_does_not_abort_category() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let driver = FakeDriver::new()
        .page(ROOT, LANDING)
        .page(&animals_url(), ANIMALS)
        .video_page(&format!("{ROOT}/dog"), &video_html("/v/dog.mp4"), Some(3.0));

    let report = Scraper::new(&driver, &config).unwrap().run().await.unwrap();

    assert_eq!(report.summary.words_failed, 1);
    assert_eq!(report.dataset.records()[0].name, "Dog");
    assert!(driver.visits().contains(&format!("{ROOT}/cat")));
}

#[tokio::test]
async fn unreachable_category_is_counted_and_run_continues() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let landing = r#"<a href="/gone-in-isl">Gone</a><a href="/animals-and-birds-in-isl">Animals and Birds</a>"#;
    let driver = FakeDriver::new()
        .page(ROOT, landing)
        .page(&animals_url(), ANIMALS)
        .video_page(&format!("{ROOT}/cat"), &video_html("/v/cat.mp4"), Some(1.0))
        .video_page(&format!("{ROOT}/dog"), &video_html("/v/dog.mp4"), Some(1.0));

    let report = Scraper::new(&driver, &config).unwrap().run().await.unwrap();

    assert_eq!(report.summary.categories_failed, 1);
    assert_eq!(report.dataset.len(), 2);
}

#[tokio::test]
async fn empty_landing_page_falls_back_observably() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let driver = FakeDriver::new()
        .page(ROOT, "<html><body>Loading…</body></html>")
        .page(&animals_url(), ANIMALS)
        .video_page(&format!("{ROOT}/cat"), &video_html("/v/cat.mp4"), Some(1.0))
        .video_page(&format!("{ROOT}/dog"), &video_html("/v/dog.mp4"), Some(1.0));

    let listing = list_categories(&driver, &config.site).await;
    assert!(listing.is_fallback());

    let report = Scraper::new(&driver, &config).unwrap().run().await.unwrap();
    assert_eq!(report.summary.category_source, CategorySource::Fallback);
    assert_eq!(report.dataset.len(), 2);
}

#[tokio::test]
async fn unreachable_landing_page_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let driver = FakeDriver::new();

    let listing = list_categories(&driver, &config.site).await;
    assert_eq!(listing.source, CategorySource::Fallback);
    assert_eq!(listing.entries.len(), 1);
}

#[tokio::test]
async fn video_src_attribute_is_read_when_no_source_child() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let url = format!("{ROOT}/owl");
    let driver = FakeDriver::new().video_page(
        &url,
        r#"<video src="media/owl.webm" preload="metadata"></video>"#,
        Some(61.0),
    );

    let video = resolve_video(&driver, &url, &config).await.unwrap();
    assert_eq!(
        video.source_url.as_deref(),
        Some("https://talkinghands.co.in/media/owl.webm")
    );
    assert_eq!((video.end_minute, video.end_second), (1, 1));
}

#[tokio::test]
async fn empty_source_child_falls_through_to_video_src() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let url = format!("{ROOT}/owl");
    let driver = FakeDriver::new().video_page(
        &url,
        r#"<video src="/media/owl.webm"><source src="  "></video>"#,
        None,
    );

    let video = resolve_video(&driver, &url, &config).await.unwrap();
    assert_eq!(
        video.source_url.as_deref(),
        Some("https://talkinghands.co.in/media/owl.webm")
    );
    assert_eq!(
        (video.start_minute, video.start_second, video.end_minute, video.end_second),
        (0, 0, 0, 3)
    );
}

#[tokio::test]
async fn missing_video_is_absent_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let url = format!("{ROOT}/owl");
    let driver = FakeDriver::new().page(&url, "<p>No player</p>");

    let video = resolve_video(&driver, &url, &config).await.unwrap();
    assert!(!video.is_found());
}

#[tokio::test]
async fn word_navigation_failure_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let driver = FakeDriver::new();

    let err = resolve_video(&driver, "https://talkinghands.co.in/missing", &config)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("open word page"), "{err}");
}

#[tokio::test]
async fn shutdown_mid_crawl_still_writes_complete_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let stop = Arc::new(Notify::new());
    let driver = two_word_site().notify_on_open(&format!("{ROOT}/cat"), stop.clone());

    let report = Scraper::new(&driver, &config)
        .unwrap()
        .run_until(async move { stop.notified().await })
        .await
        .unwrap();

    assert!(report.summary.interrupted);
    let names: Vec<_> = report.dataset.records().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Cat"]);
    assert!(!driver.visits().contains(&format!("{ROOT}/dog")));

    let complete = report.summary.complete_file.expect("complete file written");
    let rows: Vec<isl_dataset_scraper::DatasetRecord> = csv::Reader::from_path(&complete)
        .unwrap()
        .deserialize()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(rows, report.dataset.records());
    assert!(dir.path().join("output/isl_dataset_Animals and Birds.csv").exists());
}

#[tokio::test]
async fn shutdown_before_start_visits_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let driver = two_word_site();

    let report = Scraper::new(&driver, &config)
        .unwrap()
        .run_until(std::future::ready(()))
        .await
        .unwrap();

    assert!(report.summary.interrupted);
    assert!(driver.visits().is_empty());
    assert!(report.dataset.is_empty());
    assert_eq!(report.summary.complete_file, None);
}

#[tokio::test]
async fn uninterrupted_run_is_not_flagged() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let driver = two_word_site();

    let report = Scraper::new(&driver, &config).unwrap().run().await.unwrap();
    assert!(!report.summary.interrupted);
    assert_eq!(report.dataset.len(), 2);
}
