//! The annotation session.
//!
//! [`AnnotationSession`] is the single owner of editing state for one run:
//! the working set of images, the current image's landmark store, its
//! undo/redo history, the active annotation format, and the auto-save policy.
//! Every change to the store goes through [`AnnotationSession::mutate`], which
//! records history and queues [`RenderCommand`]s for the rendering surface.
//!
//! Lifecycle:
//!
//! ```text
//! NoImage -> ImageLoaded -> [Editing]* -> ImageLoaded (next/prev) -> ... -> NoImage (close)
//! ```
//!
//! Persistence happens only on explicit save, on navigation and close when
//! auto-save is on, and when switching format. Individual edits and undo/redo
//! never touch the disk.

mod error;
mod gesture;
#[cfg(test)]
mod tests;

pub use error::{HistoryOutcome, LoadReport, SessionError};

use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::coords::{ImageSize, pixel_for, ratio_for};
use crate::format::AnnotationFormat;
use crate::model::{AnnotationStore, KeypointId, PixelPoint, RatioPoint};
use crate::reference::ReferenceOverlay;
use crate::render::RenderCommand;
use crate::state::{Direction, ImageProbe, ImageSequence};
use crate::undo::{HistoryManager, UndoConfig};

use gesture::PendingDrag;

/// A user edit of the landmark store, in ratio space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditOp {
    /// Place `id` at `at`, replacing any previous position
    Add { id: KeypointId, at: RatioPoint },
    /// Move an annotated `id` to `to`
    Move { id: KeypointId, to: RatioPoint },
    /// Remove `id`
    Delete(KeypointId),
    /// Exchange the positions of two ids
    Swap(KeypointId, KeypointId),
    /// Remove every landmark
    Clear,
}

impl EditOp {
    /// Whether applying this op to `store` would change anything.
    fn changes(&self, store: &AnnotationStore) -> bool {
        match *self {
            EditOp::Add { at, .. } => at.is_storable(),
            EditOp::Move { id, to } => store.contains(id) && to.is_storable(),
            EditOp::Delete(id) => store.contains(id),
            EditOp::Swap(a, b) => a != b && (store.contains(a) || store.contains(b)),
            EditOp::Clear => !store.is_empty(),
        }
    }
}

/// One line of the landmark list view.
#[derive(Debug, Clone, PartialEq)]
pub struct KeypointRow {
    pub id: KeypointId,
    pub point: Option<RatioPoint>,
    pub text: String,
}

/// Editing state for one run of the tool.
pub struct AnnotationSession {
    probe: Box<dyn ImageProbe>,
    sequence: ImageSequence,
    /// Native dimensions of the current image, `None` when unknown
    image_size: Option<ImageSize>,
    store: AnnotationStore,
    history: HistoryManager,
    format: AnnotationFormat,
    auto_save: bool,
    drag_threshold: f64,
    drag: Option<PendingDrag>,
    /// Id that the next pointer-down on the image will place
    adding: Option<KeypointId>,
    selected: Option<KeypointId>,
    commands: Vec<RenderCommand>,
    reference: Option<ReferenceOverlay>,
}

impl AnnotationSession {
    /// Create a session from user preferences.
    ///
    /// A configured reference image is loaded right away; failing to load it
    /// is logged and leaves the session without an overlay.
    pub fn new(config: &AppConfig, probe: impl ImageProbe + 'static) -> Self {
        let prefs = &config.preferences;
        let mut session = Self {
            probe: Box::new(probe),
            sequence: ImageSequence::default(),
            image_size: None,
            store: AnnotationStore::new(),
            history: HistoryManager::with_config(UndoConfig {
                max_history: prefs.max_undo_steps,
            }),
            format: prefs.annotation_format,
            auto_save: prefs.auto_save,
            drag_threshold: prefs.drag_threshold,
            drag: None,
            adding: None,
            selected: None,
            commands: Vec::new(),
            reference: None,
        };

        if let Some(path) = &prefs.reference_image {
            if let Err(e) = session.load_reference(path) {
                log::warn!("Failed to load reference image {:?}: {}", path, e);
            }
        }

        session
    }

    // ------------------------------------------------------------------
    // Working set and navigation
    // ------------------------------------------------------------------

    /// Replace the working set with an explicit image list and load the first
    /// image. Unsaved edits of the previous image are discarded.
    pub fn open_sequence(
        &mut self,
        images: Vec<PathBuf>,
    ) -> Result<Option<LoadReport>, SessionError> {
        self.start_sequence(ImageSequence::new(images))
    }

    /// Replace the working set with the images found in `dir`.
    pub fn open_directory(&mut self, dir: &Path) -> Result<Option<LoadReport>, SessionError> {
        let sequence = ImageSequence::from_folder(dir).map_err(|source| SessionError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        self.start_sequence(sequence)
    }

    fn start_sequence(
        &mut self,
        sequence: ImageSequence,
    ) -> Result<Option<LoadReport>, SessionError> {
        self.reset_image_state();
        self.sequence = sequence;
        if self.sequence.is_empty() {
            log::info!("Opened an empty image set");
            self.commands.push(RenderCommand::Clear);
            return Ok(None);
        }
        self.load_at(0).map(Some)
    }

    /// Make image `index` current and load its annotations.
    ///
    /// The in-memory store and history are discarded without saving. Broken
    /// annotation files and unreadable image headers are reported in the
    /// returned [`LoadReport`], not as errors.
    pub fn load_at(&mut self, index: usize) -> Result<LoadReport, SessionError> {
        let len = self.sequence.len();
        if !self.sequence.set_current(index) {
            return Err(SessionError::IndexOutOfRange { index, len });
        }
        let image = self
            .sequence
            .current_image()
            .map(Path::to_path_buf)
            .ok_or(SessionError::NoImage)?;

        self.reset_image_state();

        let image_error = match self.probe.dimensions(&image) {
            Ok(size) => {
                self.image_size = Some(size);
                None
            }
            Err(e) => {
                log::warn!("Image dimensions unavailable: {}", e);
                Some(e)
            }
        };

        let codec = self.format.codec();
        let (found_annotations, annotation_error) = match codec.read(&image) {
            Ok(Some(store)) => {
                self.store = store;
                (true, None)
            }
            Ok(None) => (false, None),
            Err(source) => {
                let path = codec.annotation_path(&image);
                log::warn!(
                    "Failed to load {} annotations from {:?}, starting empty: {}",
                    codec.display_name(),
                    path,
                    source
                );
                (true, Some(SessionError::from_format(path, source)))
            }
        };

        self.redraw();
        log::info!(
            "Loaded image {}/{} {:?} with {} keypoints",
            index + 1,
            len,
            image,
            self.store.len()
        );

        Ok(LoadReport {
            index,
            image,
            annotated: self.store.len(),
            found_annotations,
            annotation_error,
            image_error,
        })
    }

    /// Move one image forward or back.
    ///
    /// Returns `Ok(None)` at either end of the sequence. With auto-save on, the
    /// current image is saved first; if that fails the move is aborted and the
    /// in-memory annotations are kept for a retry.
    pub fn advance(&mut self, direction: Direction) -> Result<Option<LoadReport>, SessionError> {
        let Some(target) = self.sequence.neighbor(direction) else {
            log::debug!("No image in direction {:?}", direction);
            return Ok(None);
        };

        self.resolve_pending_drag();
        if self.auto_save {
            self.save()?;
        }
        self.load_at(target).map(Some)
    }

    /// Drop all per-image state.
    fn reset_image_state(&mut self) {
        self.image_size = None;
        self.store.clear();
        self.history.clear();
        self.drag = None;
        self.adding = None;
        self.selected = None;
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Write the store to the current image's annotation file in the active
    /// format. On failure the store is left untouched.
    pub fn save(&mut self) -> Result<PathBuf, SessionError> {
        let image = self
            .sequence
            .current_image()
            .ok_or(SessionError::NoImage)?;
        let codec = self.format.codec();
        codec.write(&self.store, image).map_err(|source| {
            let path = codec.annotation_path(image);
            log::warn!("Failed to save annotations to {:?}: {}", path, source);
            SessionError::from_format(path, source)
        })
    }

    /// Switch the annotation format.
    ///
    /// Annotated points of the current image are persisted in the old format
    /// first: always with auto-save, otherwise only if `confirm` agrees. A
    /// failed save aborts the switch. The current image is then reloaded from
    /// the new format's file.
    pub fn set_format(
        &mut self,
        format: AnnotationFormat,
        confirm: impl FnOnce() -> bool,
    ) -> Result<Option<LoadReport>, SessionError> {
        if format == self.format {
            return Ok(None);
        }

        self.resolve_pending_drag();
        if self.sequence.current_image().is_some() && !self.store.is_empty() {
            if self.auto_save || confirm() {
                self.save()?;
            } else {
                log::info!(
                    "Discarding {} unsaved keypoints on format switch",
                    self.store.len()
                );
            }
        }

        log::info!("Annotation format: {} -> {}", self.format, format);
        self.format = format;

        match self.sequence.current_index() {
            Some(index) => self.load_at(index).map(Some),
            None => Ok(None),
        }
    }

    /// Flip between delimited and structured.
    pub fn toggle_format(
        &mut self,
        confirm: impl FnOnce() -> bool,
    ) -> Result<Option<LoadReport>, SessionError> {
        self.set_format(self.format.toggled(), confirm)
    }

    /// Flush and return to the no-image state.
    ///
    /// If the auto-save fails the session stays open.
    pub fn close(&mut self) -> Result<(), SessionError> {
        self.resolve_pending_drag();
        if self.auto_save && self.sequence.current_image().is_some() {
            self.save()?;
        }
        self.reset_image_state();
        self.sequence = ImageSequence::default();
        self.commands.push(RenderCommand::Clear);
        log::info!("Session closed");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Apply an edit: record history, change the store, queue render commands.
    ///
    /// Returns `Ok(false)` for edits that would change nothing (deleting an
    /// unannotated id, for example); those leave no history entry.
    pub fn mutate(&mut self, op: EditOp) -> Result<bool, SessionError> {
        if self.sequence.current_image().is_none() {
            return Err(SessionError::NoImage);
        }
        if !op.changes(&self.store) {
            log::debug!("Ignoring edit without effect: {:?}", op);
            return Ok(false);
        }

        self.history.record_before_mutation(&self.store);
        match op {
            EditOp::Add { id, at } | EditOp::Move { id, to: at } => {
                self.store.set(id, at);
                self.emit_point(id);
            }
            EditOp::Delete(id) => {
                self.store.remove(id);
                self.commands.push(RenderCommand::Remove { id });
                if self.selected == Some(id) {
                    self.selected = None;
                    self.commands.push(RenderCommand::ClearHighlight);
                }
                log::info!("Deleted keypoint {}", id);
            }
            EditOp::Swap(a, b) => {
                self.store.swap(a, b);
                self.emit_point(a);
                self.emit_point(b);
                log::info!("Swapped keypoints {} and {}", a, b);
            }
            EditOp::Clear => {
                self.store.clear();
                self.selected = None;
                self.commands.push(RenderCommand::Clear);
                log::info!("Cleared all keypoints");
            }
        }
        Ok(true)
    }

    /// Place `id` at a pixel position of the current image.
    pub fn add_at_pixel(&mut self, id: KeypointId, at: PixelPoint) -> Result<bool, SessionError> {
        let at = self.pixel_to_ratio(at)?;
        self.mutate(EditOp::Add { id, at })
    }

    /// Move `id` to a pixel position of the current image.
    pub fn move_to_pixel(&mut self, id: KeypointId, to: PixelPoint) -> Result<bool, SessionError> {
        let to = self.pixel_to_ratio(to)?;
        self.mutate(EditOp::Move { id, to })
    }

    fn pixel_to_ratio(&self, pixel: PixelPoint) -> Result<RatioPoint, SessionError> {
        if self.sequence.current_image().is_none() {
            return Err(SessionError::NoImage);
        }
        ratio_for(self.image_size, pixel).map_err(|e| {
            log::warn!("Cannot store keypoint: {}", e);
            SessionError::from(e)
        })
    }

    /// Restore the state before the last edit. Never persists.
    pub fn undo(&mut self) -> HistoryOutcome {
        match self.history.undo(&self.store) {
            Some(previous) => {
                self.store.restore(previous);
                self.after_restore();
                HistoryOutcome::Applied
            }
            None => HistoryOutcome::NoneAvailable,
        }
    }

    /// Re-apply the last undone edit. Never persists.
    pub fn redo(&mut self) -> HistoryOutcome {
        match self.history.redo(&self.store) {
            Some(next) => {
                self.store.restore(next);
                self.after_restore();
                HistoryOutcome::Applied
            }
            None => HistoryOutcome::NoneAvailable,
        }
    }

    fn after_restore(&mut self) {
        self.drag = None;
        if self.selected.is_some_and(|id| !self.store.contains(id)) {
            self.selected = None;
        }
        self.redraw();
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Select `id`, highlighting it in the main view and the reference overlay.
    pub fn select(&mut self, id: KeypointId) {
        self.selected = Some(id);
        if self.store.contains(id) {
            self.commands.push(RenderCommand::Highlight { id });
        } else {
            self.commands.push(RenderCommand::ClearHighlight);
        }
        if self.reference.as_ref().is_some_and(|r| r.contains(id)) {
            self.commands.push(RenderCommand::HighlightReference { id });
        }
    }

    pub fn deselect(&mut self) {
        if self.selected.take().is_some() {
            self.commands.push(RenderCommand::ClearHighlight);
        }
    }

    /// Enter add mode: the next pointer-down on the image places `id`.
    pub fn begin_adding(&mut self, id: KeypointId) {
        log::info!("Click on the image to place keypoint {}", id);
        self.adding = Some(id);
    }

    /// A row of the landmark list was clicked.
    pub fn list_clicked(&mut self, id: KeypointId) {
        if self.store.contains(id) {
            self.select(id);
        } else {
            self.begin_adding(id);
        }
    }

    // ------------------------------------------------------------------
    // Reference overlay
    // ------------------------------------------------------------------

    /// Load a reference image and its same-stem JSON annotations.
    pub fn load_reference(&mut self, image_path: &Path) -> Result<&ReferenceOverlay, SessionError> {
        let overlay = ReferenceOverlay::load(image_path, self.probe.as_ref())?;
        Ok(self.reference.insert(overlay))
    }

    pub fn clear_reference(&mut self) {
        self.reference = None;
    }

    pub fn reference(&self) -> Option<&ReferenceOverlay> {
        self.reference.as_ref()
    }

    // ------------------------------------------------------------------
    // Rendering and views
    // ------------------------------------------------------------------

    fn emit_point(&mut self, id: KeypointId) {
        match self.store.get(id) {
            Some(ratio) => {
                if let Ok(at) = pixel_for(self.image_size, ratio) {
                    self.commands.push(RenderCommand::Place { id, at });
                }
            }
            None => self.commands.push(RenderCommand::Remove { id }),
        }
    }

    /// Queue a full redraw of the main view.
    fn redraw(&mut self) {
        self.commands.push(RenderCommand::Clear);
        for (id, ratio) in self.store.iter() {
            if let Ok(at) = pixel_for(self.image_size, ratio) {
                self.commands.push(RenderCommand::Place { id, at });
            }
        }
        if let Some(id) = self.selected.filter(|&id| self.store.contains(id)) {
            self.commands.push(RenderCommand::Highlight { id });
        }
    }

    /// Take all render commands queued since the last call.
    pub fn drain_render_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    /// All 68 landmarks with their list text.
    pub fn keypoint_rows(&self) -> Vec<KeypointRow> {
        KeypointId::all()
            .map(|id| {
                let point = self.store.get(id);
                let text = match point {
                    Some(p) => format!("{}: ({:.4}, {:.4})", id, p.x, p.y),
                    None => format!("{}: unannotated", id),
                };
                KeypointRow { id, point, text }
            })
            .collect()
    }

    /// Position in the working set, e.g. `3/20 - face_003.jpg`.
    pub fn progress(&self) -> Option<String> {
        let index = self.sequence.current_index()?;
        let name = self.sequence.current_image()?.file_name()?.to_string_lossy();
        Some(format!("{}/{} - {}", index + 1, self.sequence.len(), name))
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn auto_save(&self) -> bool {
        self.auto_save
    }

    pub fn set_auto_save(&mut self, enabled: bool) {
        log::info!("Auto-save {}", if enabled { "enabled" } else { "disabled" });
        self.auto_save = enabled;
    }

    pub fn format(&self) -> AnnotationFormat {
        self.format
    }

    pub fn current_index(&self) -> Option<usize> {
        self.sequence.current_index()
    }

    pub fn current_image(&self) -> Option<&Path> {
        self.sequence.current_image()
    }

    pub fn image_count(&self) -> usize {
        self.sequence.len()
    }

    pub fn image_size(&self) -> Option<ImageSize> {
        self.image_size
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn selected(&self) -> Option<KeypointId> {
        self.selected
    }

    pub fn adding(&self) -> Option<KeypointId> {
        self.adding
    }

    pub fn drag_threshold(&self) -> f64 {
        self.drag_threshold
    }
}
