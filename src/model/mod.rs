//! Data models for the keypoint annotation engine.

mod keypoint;
mod store;

pub use keypoint::{KeypointId, PixelPoint, RatioPoint};
pub use store::AnnotationStore;
