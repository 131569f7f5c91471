//! Run one pipeline over every image in a directory.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::{ImageProcessorError, Result};
use crate::pipeline::Pipeline;
use crate::processor::ImageProcessor;
use crate::utils::paths;

/// File extensions picked up by [`find_images`], compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "gif"];

/// Outcome of a directory run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// `(input, output)` for every file that was written.
    pub processed: Vec<(PathBuf, PathBuf)>,
    /// Files that failed, with the reason.
    pub failed: Vec<(PathBuf, ImageProcessorError)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.processed.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Images directly inside `dir`, sorted by path. Subdirectories are not searched.
pub fn find_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_file() && has_supported_extension(&path) {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

/// Load, transform and save each image found in `input_dir`.
///
/// Per-file errors are collected in the report; only a failure to list
/// `input_dir` aborts the run.
pub fn process_directory(
    input_dir: &Path,
    output_dir: &Path,
    pipeline: &Pipeline,
) -> Result<BatchReport> {
    let images = find_images(input_dir)?;
    info!("Images found: {}", images.len());

    let mut report = BatchReport::default();
    for (i, input) in images.iter().enumerate() {
        info!("Processing {}/{}: {}", i + 1, images.len(), input.display());
        let output = paths::batch_output_path(output_dir, input);
        match process_one(input, &output, pipeline) {
            Ok(written) => report.processed.push((input.clone(), written)),
            Err(e) => {
                warn!("Skipping {}: {e}", input.display());
                report.failed.push((input.clone(), e));
            }
        }
    }
    Ok(report)
}

fn process_one(input: &Path, output: &Path, pipeline: &Pipeline) -> Result<PathBuf> {
    let mut processor = ImageProcessor::open(input)?;
    processor.apply_pipeline(pipeline)?;
    processor.save(Some(output))
}
