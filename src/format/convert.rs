//! Batch conversion of delimited annotation files to structured records.
//!
//! Every `*.txt` in a directory is paired by base name with an image
//! (`jpg`, `jpeg`, `png`, `bmp`, any case) and rewritten as `<stem>.json` next
//! to the image. Files are parsed with the same 136-token rule as the session
//! loader, so malformed files fail with the identical error.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::coords::round_ratio;
use crate::format::error::FormatError;
use crate::format::formats::parse_delimited_values;
use crate::format::record::{KeypointEntry, KeypointRecord};
use crate::model::KeypointId;
use crate::state::{IMAGE_EXTENSIONS, is_image_file};

/// Why a single file could not be converted.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// No image with the same base name exists next to the annotation file
    #[error("no matching image file found")]
    MissingImage,

    /// The annotation file could not be read, parsed, or written
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Outcome of converting one delimited file.
#[derive(Debug)]
pub struct ConversionOutcome {
    /// The delimited file that was processed
    pub source: PathBuf,
    /// The JSON file written, or the reason for failure
    pub result: Result<PathBuf, ConvertError>,
}

/// Per-file results of a batch conversion.
#[derive(Debug, Default)]
pub struct ConversionReport {
    pub outcomes: Vec<ConversionOutcome>,
}

impl ConversionReport {
    /// Number of files converted successfully.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Number of files that failed (including files without an image).
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Check if there were any failures.
    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }
}

/// Find the image belonging to an annotation file stem among `images`.
///
/// Extensions are tried in [`IMAGE_EXTENSIONS`] order; the extension match
/// ignores case.
pub fn find_image_for_stem<'a>(images: &'a [PathBuf], stem: &str) -> Option<&'a Path> {
    let candidates: Vec<&Path> = images
        .iter()
        .map(PathBuf::as_path)
        .filter(|p| is_image_file(p))
        .filter(|p| p.file_stem().and_then(|s| s.to_str()) == Some(stem))
        .collect();

    IMAGE_EXTENSIONS.iter().find_map(|ext| {
        candidates.iter().copied().find(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(ext))
        })
    })
}

/// Convert one delimited file into the structured record of `image_path`.
///
/// Values are written as found (rounded to 6 decimals), so sentinel entries
/// stay `-1.0`.
pub fn convert_file(txt_path: &Path, image_path: &Path) -> Result<PathBuf, FormatError> {
    let text = std::fs::read_to_string(txt_path)?;
    let values = parse_delimited_values(&text)?;

    let keypoints = KeypointId::all()
        .zip(values.chunks_exact(2))
        .map(|(id, pair)| KeypointEntry {
            id: i64::from(id.get()),
            x: round_ratio(pair[0]),
            y: round_ratio(pair[1]),
        })
        .collect();

    let record = KeypointRecord {
        image_name: image_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string(),
        keypoints,
    };

    let json_path = image_path.with_extension("json");
    std::fs::write(&json_path, serde_json::to_string_pretty(&record)?)?;
    Ok(json_path)
}

/// Convert every delimited file in `dir`.
pub fn convert_directory(dir: &Path) -> Result<ConversionReport, FormatError> {
    log::info!("Converting TXT annotations in {:?}", dir);

    // One listing serves both the annotation files and the image lookup
    let files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    let images: Vec<PathBuf> = files.iter().filter(|p| is_image_file(p)).cloned().collect();
    let mut txt_files: Vec<PathBuf> = files
        .into_iter()
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("txt"))
        })
        .collect();
    txt_files.sort();

    let mut report = ConversionReport::default();
    for txt_path in txt_files {
        let stem = txt_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();

        let result = match find_image_for_stem(&images, stem) {
            Some(image_path) => convert_file(&txt_path, image_path).map_err(ConvertError::from),
            None => Err(ConvertError::MissingImage),
        };

        match &result {
            Ok(json_path) => log::info!("Converted {:?} -> {:?}", txt_path, json_path),
            Err(e) => log::warn!("Failed to convert {:?}: {}", txt_path, e),
        }

        report.outcomes.push(ConversionOutcome {
            source: txt_path,
            result,
        });
    }

    log::info!(
        "Conversion finished: {} succeeded, {} failed",
        report.succeeded(),
        report.failed()
    );
    Ok(report)
}
