//! Trait definitions for annotation codec implementations.

use std::path::{Path, PathBuf};

use crate::format::error::FormatError;
use crate::model::AnnotationStore;

/// Trait for per-image landmark annotation codecs.
///
/// Each on-disk format (delimited text, structured JSON) implements this trait
/// to convert between an [`AnnotationStore`] and file contents. Codecs work
/// purely in ratio space; pixel conversion happens in the session.
pub trait KeypointCodec: Send + Sync {
    /// Unique identifier for this format (e.g., "txt", "json").
    fn id(&self) -> &'static str;

    /// Human-readable name for UI display.
    fn display_name(&self) -> &'static str;

    /// File extension of annotation files, without the dot.
    fn extension(&self) -> &'static str;

    /// Encode all 68 landmarks, unannotated ones as the `(-1, -1)` sentinel.
    ///
    /// `image_name` is the file name of the image the annotations belong to.
    fn encode(&self, store: &AnnotationStore, image_name: &str) -> Result<String, FormatError>;

    /// Decode file contents, dropping sentinel entries.
    ///
    /// Either the whole file decodes or an error is returned; partial stores
    /// are never produced.
    fn decode(&self, text: &str) -> Result<AnnotationStore, FormatError>;

    /// Annotation file belonging to `image_path` (same base name).
    fn annotation_path(&self, image_path: &Path) -> PathBuf {
        image_path.with_extension(self.extension())
    }

    /// Read the annotations of an image. `Ok(None)` when no file exists yet.
    fn read(&self, image_path: &Path) -> Result<Option<AnnotationStore>, FormatError> {
        let path = self.annotation_path(image_path);
        if !path.exists() {
            log::debug!("No {} annotation file at {:?}", self.id(), path);
            return Ok(None);
        }
        let text = std::fs::read_to_string(&path)?;
        let store = self.decode(&text)?;
        log::info!(
            "Loaded {} keypoints ({}) from {:?}",
            store.len(),
            self.display_name(),
            path
        );
        Ok(Some(store))
    }

    /// Write the annotations of an image, returning the file written.
    fn write(&self, store: &AnnotationStore, image_path: &Path) -> Result<PathBuf, FormatError> {
        let path = self.annotation_path(image_path);
        let image_name = image_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let content = self.encode(store, image_name)?;
        std::fs::write(&path, content)?;
        log::info!(
            "Saved {} keypoints ({}) to {:?}",
            store.len(),
            self.display_name(),
            path
        );
        Ok(path)
    }
}
