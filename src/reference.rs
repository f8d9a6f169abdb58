//! Read-only reference overlay.
//!
//! A reference image is a previously annotated face shown next to the working
//! image as a placement guide. Its landmarks come from the same-stem `.json`
//! file and are never written back.

use std::path::{Path, PathBuf};

use crate::coords::ImageSize;
use crate::format::AnnotationFormat;
use crate::model::{AnnotationStore, KeypointId, PixelPoint};
use crate::session::SessionError;
use crate::state::ImageProbe;

/// Reference image with its landmarks.
#[derive(Debug, Clone)]
pub struct ReferenceOverlay {
    image_path: PathBuf,
    size: ImageSize,
    store: AnnotationStore,
}

impl ReferenceOverlay {
    /// Load a reference image and its structured annotations.
    ///
    /// A missing `.json` file yields an overlay without landmarks.
    pub fn load(image_path: &Path, probe: &dyn ImageProbe) -> Result<Self, SessionError> {
        let size = probe.dimensions(image_path)?;
        let codec = AnnotationFormat::Structured.codec();
        let store = codec
            .read(image_path)
            .map_err(|source| SessionError::from_format(codec.annotation_path(image_path), source))?
            .unwrap_or_else(|| {
                log::warn!("Reference image {:?} has no JSON annotations", image_path);
                AnnotationStore::new()
            });

        log::info!(
            "Loaded reference {:?} ({}x{}) with {} keypoints",
            image_path,
            size.width,
            size.height,
            store.len()
        );

        Ok(Self {
            image_path: image_path.to_path_buf(),
            size,
            store,
        })
    }

    pub fn image_path(&self) -> &Path {
        &self.image_path
    }

    pub fn size(&self) -> ImageSize {
        self.size
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn contains(&self, id: KeypointId) -> bool {
        self.store.contains(id)
    }

    /// Landmarks in the reference image's pixel space, in id order.
    pub fn pixel_points(&self) -> Vec<(KeypointId, PixelPoint)> {
        self.store
            .iter()
            .filter_map(|(id, ratio)| self.size.to_pixel(ratio).ok().map(|p| (id, p)))
            .collect()
    }
}
