//! Image metadata probing.
//!
//! The session only needs an image's native pixel dimensions to map between
//! pixel and ratio space. Decoding pixels is the renderer's business, so the
//! probe reads image headers only.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::coords::ImageSize;

/// Error type for probe operations.
#[derive(Error, Debug)]
#[error("Failed to read image {path:?}: {message}")]
pub struct ImageProbeError {
    /// Image that could not be probed.
    pub path: PathBuf,
    /// Human-readable error message.
    pub message: String,
}

impl ImageProbeError {
    /// Create a new probe error.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Trait for reading image dimensions.
///
/// Implemented by the file-backed [`FileImageProbe`]; embedders that already
/// decoded the image (or tests without image files) can supply their own.
pub trait ImageProbe {
    /// Native pixel dimensions of the image at `path`.
    fn dimensions(&self, path: &Path) -> Result<ImageSize, ImageProbeError>;
}

/// Reads dimensions from the image file header using the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileImageProbe;

impl ImageProbe for FileImageProbe {
    fn dimensions(&self, path: &Path) -> Result<ImageSize, ImageProbeError> {
        let (width, height) = image::image_dimensions(path)
            .map_err(|e| ImageProbeError::new(path, e.to_string()))?;
        if width == 0 || height == 0 {
            return Err(ImageProbeError::new(path, "image has zero size"));
        }
        Ok(ImageSize::new(width, height))
    }
}

/// Reports the same dimensions for every image.
#[derive(Debug, Clone, Copy)]
pub struct FixedSizeProbe(pub ImageSize);

impl ImageProbe for FixedSizeProbe {
    fn dimensions(&self, _path: &Path) -> Result<ImageSize, ImageProbeError> {
        Ok(self.0)
    }
}
