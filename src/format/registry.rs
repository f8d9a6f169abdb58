//! The closed set of annotation formats and their codecs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::format::formats::{DelimitedFormat, StructuredFormat};
use crate::format::traits::KeypointCodec;

/// Active on-disk format of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationFormat {
    /// 136 whitespace-separated numbers (`*.txt`)
    #[default]
    #[serde(alias = "txt")]
    Delimited,
    /// `{image_name, keypoints}` record (`*.json`)
    #[serde(alias = "json")]
    Structured,
}

impl AnnotationFormat {
    /// Codec implementing this format.
    pub fn codec(self) -> &'static dyn KeypointCodec {
        match self {
            AnnotationFormat::Delimited => &DelimitedFormat,
            AnnotationFormat::Structured => &StructuredFormat,
        }
    }

    /// The other format.
    pub fn toggled(self) -> Self {
        match self {
            AnnotationFormat::Delimited => AnnotationFormat::Structured,
            AnnotationFormat::Structured => AnnotationFormat::Delimited,
        }
    }

    /// Get all formats.
    pub fn all() -> &'static [AnnotationFormat] {
        &[AnnotationFormat::Delimited, AnnotationFormat::Structured]
    }

    /// File extension of this format's annotation files.
    pub fn extension(self) -> &'static str {
        self.codec().extension()
    }
}

impl fmt::Display for AnnotationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.codec().display_name())
    }
}

impl FromStr for AnnotationFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "txt" | "delimited" => Ok(AnnotationFormat::Delimited),
            "json" | "structured" => Ok(AnnotationFormat::Structured),
            other => Err(format!(
                "unknown annotation format '{}', expected txt or json",
                other
            )),
        }
    }
}
