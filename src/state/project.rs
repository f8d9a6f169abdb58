//! Ordered image sequence for an annotation session.

use std::path::{Path, PathBuf};

/// Supported image extensions (matched case-insensitively)
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp"];

/// Check if a path has a supported image extension
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Direction of a navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// The working set of images and the position within it.
#[derive(Clone, Debug, Default)]
pub struct ImageSequence {
    /// Image files in navigation order
    images: Vec<PathBuf>,
    /// Current image index, `None` when the sequence is empty
    current_index: Option<usize>,
}

impl ImageSequence {
    /// Build a sequence from an explicit, already ordered list.
    pub fn new(images: Vec<PathBuf>) -> Self {
        let current_index = if images.is_empty() { None } else { Some(0) };
        Self {
            images,
            current_index,
        }
    }

    /// Discover image files in a folder, non-recursively.
    ///
    /// Files are sorted by path and de-duplicated so that case variants of the
    /// same extension never appear twice.
    pub fn from_folder(folder: &Path) -> std::io::Result<Self> {
        let mut images: Vec<PathBuf> = std::fs::read_dir(folder)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_image_file(path))
            .collect();

        // Sort by filename for consistent ordering
        images.sort();
        images.dedup();

        log::info!("Scanned folder {:?}: found {} images", folder, images.len());
        Ok(Self::new(images))
    }

    pub fn images(&self) -> &[PathBuf] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Get the current image path.
    pub fn current_image(&self) -> Option<&Path> {
        self.current_index
            .and_then(|i| self.images.get(i))
            .map(PathBuf::as_path)
    }

    /// Move the position. Returns false if `index` is out of range.
    pub fn set_current(&mut self, index: usize) -> bool {
        if index < self.images.len() {
            self.current_index = Some(index);
            true
        } else {
            false
        }
    }

    /// Index one step in `direction`, or `None` at a boundary.
    pub fn neighbor(&self, direction: Direction) -> Option<usize> {
        let current = self.current_index?;
        match direction {
            Direction::Previous => current.checked_sub(1),
            Direction::Next => Some(current + 1).filter(|&i| i < self.images.len()),
        }
    }
}
