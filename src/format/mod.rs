//! Annotation file formats.
//!
//! Landmark annotations are persisted per image in one of two interchangeable
//! formats, selected per session:
//!
//! - **TXT**: 136 whitespace-separated ratio values, `x1 y1 ... x68 y68`
//! - **JSON**: `{image_name, keypoints: [{id, x, y}, ...]}`
//!
//! Both write all 68 ids and encode unannotated ids as `(-1, -1)`; both drop
//! that sentinel on decode.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kpat::format::AnnotationFormat;
//!
//! let codec = AnnotationFormat::Structured.codec();
//! let store = codec.read(Path::new("faces/001.jpg"))?.unwrap_or_default();
//! codec.write(&store, Path::new("faces/001.jpg"))?;
//! ```

pub mod convert;
mod error;
pub mod formats;
mod record;
mod registry;
mod traits;

pub use convert::{ConversionReport, ConvertError, convert_directory};
pub use error::FormatError;
pub use formats::{
    DelimitedFormat, StructuredFormat, decode_delimited, decode_structured, encode_delimited,
    encode_structured,
};
pub use record::{KeypointEntry, KeypointRecord};
pub use registry::AnnotationFormat;
pub use traits::KeypointCodec;
