//! KPAT - Keypoint Annotation Tool
//!
//! State engine for annotating the 68 standard facial landmarks on a sequence
//! of images. Landmarks are stored resolution-independently as ratios of the
//! image size and persisted per image as either a delimited `.txt` file or a
//! structured `.json` record.
//!
//! The engine is UI-agnostic: a rendering surface reports pointer gestures to
//! an [`session::AnnotationSession`] and draws the [`render::RenderCommand`]s
//! it gets back.

pub mod config;
pub mod constants;
pub mod coords;
pub mod format;
pub mod model;
pub mod reference;
pub mod render;
pub mod session;
pub mod state;
pub mod undo;
