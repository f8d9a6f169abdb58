//! Error and report types for session operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::coords::CoordinateUnavailable;
use crate::format::FormatError;
use crate::state::ImageProbeError;

/// Errors returned by [`AnnotationSession`](super::AnnotationSession).
#[derive(Error, Debug)]
pub enum SessionError {
    /// Pixel/ratio conversion without usable image dimensions
    #[error(transparent)]
    CoordinateUnavailable(#[from] CoordinateUnavailable),

    /// Annotation file content could not be encoded or decoded
    #[error("Annotation file {path:?}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    /// Annotation file could not be read or written
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The operation needs a loaded image
    #[error("No image is loaded")]
    NoImage,

    /// Requested image index is outside the working set
    #[error("Image index {index} out of range ({len} images)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Image dimensions could not be determined
    #[error(transparent)]
    Image(#[from] ImageProbeError),
}

impl SessionError {
    /// Attach the annotation file path to a codec error, splitting file-system
    /// failures from malformed content.
    pub fn from_format(path: PathBuf, source: FormatError) -> Self {
        match source {
            FormatError::Io(source) => Self::Io { path, source },
            source => Self::Format { path, source },
        }
    }
}

/// Outcome of loading one image of the working set.
///
/// Loading never fails because of a broken annotation file or an unreadable
/// image header; those problems end up here as warnings instead.
#[derive(Debug)]
pub struct LoadReport {
    /// Index of the loaded image
    pub index: usize,
    /// Path of the loaded image
    pub image: PathBuf,
    /// Number of annotated landmarks after loading
    pub annotated: usize,
    /// True when an annotation file existed in the active format
    pub found_annotations: bool,
    /// Annotation file failed to load; the store was left empty
    pub annotation_error: Option<SessionError>,
    /// Image dimensions are unknown; edits and point rendering are unavailable
    pub image_error: Option<ImageProbeError>,
}

impl LoadReport {
    /// True when the load produced no warnings.
    pub fn is_clean(&self) -> bool {
        self.annotation_error.is_none() && self.image_error.is_none()
    }

    /// Human-readable warnings, one per problem.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if let Some(e) = &self.image_error {
            warnings.push(e.to_string());
        }
        if let Some(e) = &self.annotation_error {
            warnings.push(e.to_string());
        }
        warnings
    }
}

/// Result of an undo or redo request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryOutcome {
    /// A snapshot was restored
    Applied,
    /// The corresponding stack was empty
    NoneAvailable,
}
