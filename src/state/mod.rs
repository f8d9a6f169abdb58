//! Session state building blocks: the image sequence and image metadata.

mod image_data;
mod project;

pub use image_data::{FileImageProbe, FixedSizeProbe, ImageProbe, ImageProbeError};
pub use project::{Direction, IMAGE_EXTENSIONS, ImageSequence, is_image_file};
