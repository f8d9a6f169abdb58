//! Pointer gesture resolution.
//!
//! A drag is one logical move: pointer-down on a marker remembers where it
//! started, pointer-moves only update the preview, and pointer-up commits a
//! single `Move` if the net distance exceeds the drag threshold.

use crate::model::{KeypointId, PixelPoint};
use crate::render::{Gesture, RenderCommand};

use super::{AnnotationSession, SessionError};

/// A marker press that has not been released yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct PendingDrag {
    pub id: KeypointId,
    pub start: PixelPoint,
    pub last: PixelPoint,
}

impl AnnotationSession {
    /// Feed one pointer gesture from the rendering surface.
    pub fn handle_gesture(&mut self, gesture: Gesture) -> Result<(), SessionError> {
        match gesture {
            Gesture::PointerDown { hit, at } => {
                // A release can go missing (pointer left the surface)
                self.resolve_pending_drag();

                if let Some(id) = self.adding.take() {
                    log::debug!("🖱️ Placing keypoint {} at ({:.1}, {:.1})", id, at.x, at.y);
                    if self.add_at_pixel(id, at)? {
                        self.select(id);
                    }
                    return Ok(());
                }

                match hit.filter(|&id| self.store.contains(id)) {
                    Some(id) => {
                        self.select(id);
                        self.drag = Some(PendingDrag {
                            id,
                            start: at,
                            last: at,
                        });
                    }
                    None => self.deselect(),
                }
                Ok(())
            }
            Gesture::PointerMove { at } => {
                if let Some(drag) = self.drag.as_mut() {
                    drag.last = at;
                    let id = drag.id;
                    // Preview only; the store changes on release
                    self.commands.push(RenderCommand::Place { id, at });
                }
                Ok(())
            }
            Gesture::PointerUp { at } => {
                let Some(mut drag) = self.drag.take() else {
                    return Ok(());
                };
                drag.last = at;
                self.commit_drag(drag)
            }
        }
    }

    /// True while a marker is pressed.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Commit an unreleased drag at its last reported position.
    ///
    /// Used before navigation and close so a drag in flight is never lost or
    /// applied to the next image.
    pub(super) fn resolve_pending_drag(&mut self) {
        if let Some(drag) = self.drag.take() {
            log::debug!("🖱️ Resolving pending drag of keypoint {}", drag.id);
            if let Err(e) = self.commit_drag(drag) {
                log::warn!("Dropped pending drag of keypoint {}: {}", drag.id, e);
            }
        }
    }

    fn commit_drag(&mut self, drag: PendingDrag) -> Result<(), SessionError> {
        if drag.last.moved_beyond(&drag.start, self.drag_threshold) {
            log::debug!(
                "🖱️ Drag of keypoint {}: ({:.1}, {:.1}) -> ({:.1}, {:.1})",
                drag.id,
                drag.start.x,
                drag.start.y,
                drag.last.x,
                drag.last.y
            );
            if let Err(e) = self.move_to_pixel(drag.id, drag.last) {
                self.emit_point(drag.id);
                return Err(e);
            }
        } else {
            // Below threshold: a click, put the preview back
            self.emit_point(drag.id);
        }
        Ok(())
    }
}
