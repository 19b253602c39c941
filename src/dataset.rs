//! Dataset rows and their CSV export
//!
//! A run keeps two owned collections: one per category and one for the whole
//! run. The category dataset is written out on its own, then moved into the
//! overall dataset, which is re-written as the progress file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::OutputConfig;
use crate::resolvers::{VideoMetadata, WordEntry};
use crate::utils::ScrapeResult;
use crate::utils::constants::RESERVED_FILENAME_CHARS;

/// One exported row; field order is the column order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "display-name")]
    pub display_name: String,
    #[serde(rename = "Link")]
    pub link: String,
    pub start_minute: u32,
    pub start_second: u32,
    pub end_minute: u32,
    pub end_second: u32,
}

impl DatasetRecord {
    /// Row for a word whose video resolved; `None` when it has no source
    pub fn from_video(word: &WordEntry, video: &VideoMetadata) -> Option<Self> {
        let link = video.source_url.clone()?;
        Some(Self {
            name: word.word.clone(),
            display_name: word.word.clone(),
            link,
            start_minute: video.start_minute,
            start_second: video.start_second,
            end_minute: video.end_minute,
            end_second: video.end_second,
        })
    }
}

/// Ordered, append-only collection of records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<DatasetRecord>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: DatasetRecord) {
        self.records.push(record);
    }

    /// Move every record of `other` to the end of this dataset
    pub fn extend(&mut self, other: Dataset) {
        self.records.extend(other.records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[DatasetRecord] {
        &self.records
    }
}

/// Replace characters that are reserved in file names with `_`
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if RESERVED_FILENAME_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// Writes the per-category, progress and complete CSV files
#[derive(Debug, Clone)]
pub struct DatasetWriter {
    output_dir: PathBuf,
    file_prefix: String,
}

impl DatasetWriter {
    /// Create the output directory if needed
    pub fn new(output: &OutputConfig) -> ScrapeResult<Self> {
        fs::create_dir_all(&output.output_dir)?;
        Ok(Self {
            output_dir: output.output_dir.clone(),
            file_prefix: output.file_prefix.clone(),
        })
    }

    pub fn category_path(&self, category_name: &str) -> PathBuf {
        self.output_dir.join(format!(
            "{}_{}.csv",
            self.file_prefix,
            sanitize_filename(category_name)
        ))
    }

    pub fn progress_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}_progress.csv", self.file_prefix))
    }

    pub fn complete_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}_complete.csv", self.file_prefix))
    }

    /// Write one category's records; skipped when there are none
    pub fn write_category(&self, category_name: &str, dataset: &Dataset) -> ScrapeResult<Option<PathBuf>> {
        let path = self.category_path(category_name);
        let written = write_csv(&path, dataset)?;
        if written.is_some() {
            info!("Saved progress for category: {}", category_name);
        }
        Ok(written)
    }

    /// Rewrite the cumulative progress file
    pub fn write_progress(&self, dataset: &Dataset) -> ScrapeResult<Option<PathBuf>> {
        write_csv(&self.progress_path(), dataset)
    }

    /// Write the final dataset
    pub fn write_complete(&self, dataset: &Dataset) -> ScrapeResult<Option<PathBuf>> {
        let written = write_csv(&self.complete_path(), dataset)?;
        match &written {
            Some(path) => info!("Dataset creation completed: {}", path.display()),
            None => warn!("No data was collected. Dataset creation failed."),
        }
        Ok(written)
    }
}

/// Serialize `dataset` to `path` via a sibling temp file and rename
///
/// A crash mid-write leaves the previous file intact.
fn write_csv(path: &Path, dataset: &Dataset) -> ScrapeResult<Option<PathBuf>> {
    if dataset.is_empty() {
        return Ok(None);
    }

    let tmp = path.with_extension("csv.tmp");
    {
        let mut writer = csv::Writer::from_path(&tmp)?;
        for record in dataset.records() {
            writer.serialize(record)?;
        }
        writer.flush()?;
    }
    fs::rename(&tmp, path)?;

    Ok(Some(path.to_path_buf()))
}
