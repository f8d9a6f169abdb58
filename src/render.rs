//! Protocol between the session and the rendering surface.
//!
//! The dependency is one-directional: the rendering surface reports raw
//! pointer gestures keyed by landmark id, and the session answers with render
//! commands in pixel space. The surface never mutates annotation state itself.

use serde::{Deserialize, Serialize};

use crate::model::{KeypointId, PixelPoint};

/// Command for the rendering surface, always in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderCommand {
    /// Remove every landmark marker from the main view
    Clear,
    /// Draw (or redraw) the marker of `id` at `at`
    Place { id: KeypointId, at: PixelPoint },
    /// Remove the marker of `id`
    Remove { id: KeypointId },
    /// Highlight `id` in the main view
    Highlight { id: KeypointId },
    /// Remove any highlight from the main view
    ClearHighlight,
    /// Highlight `id` in the reference overlay
    HighlightReference { id: KeypointId },
}

/// Pointer gesture reported by the rendering surface, in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Primary button pressed; `hit` is the marker under the pointer, if any
    PointerDown {
        hit: Option<KeypointId>,
        at: PixelPoint,
    },
    /// Pointer moved while a button is held
    PointerMove { at: PixelPoint },
    /// Primary button released
    PointerUp { at: PixelPoint },
}

/// Visual variant of landmark markers.
///
/// Purely a presentation choice; the session emits the same commands for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerStyle {
    #[default]
    Circle,
    Cross,
}
