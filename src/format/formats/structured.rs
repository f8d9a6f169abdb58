//! Structured JSON format implementation.
//!
//! One JSON file per image, see [`KeypointRecord`] for the layout.

use crate::format::error::FormatError;
use crate::format::record::KeypointRecord;
use crate::format::traits::KeypointCodec;
use crate::model::AnnotationStore;

/// Structured JSON format.
///
/// Supports:
/// - All 68 landmarks as `{id, x, y}` entries
/// - The associated image name
pub struct StructuredFormat;

impl KeypointCodec for StructuredFormat {
    fn id(&self) -> &'static str {
        "json"
    }

    fn display_name(&self) -> &'static str {
        "JSON"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn encode(&self, store: &AnnotationStore, image_name: &str) -> Result<String, FormatError> {
        let record = encode_structured(store, image_name);
        Ok(serde_json::to_string_pretty(&record)?)
    }

    fn decode(&self, text: &str) -> Result<AnnotationStore, FormatError> {
        let record: KeypointRecord = serde_json::from_str(text)?;
        decode_structured(&record)
    }
}

/// Build the structured record for a store.
pub fn encode_structured(store: &AnnotationStore, image_name: &str) -> KeypointRecord {
    KeypointRecord::from_store(store, image_name)
}

/// Convert a structured record back to a store, excluding sentinel entries.
pub fn decode_structured(record: &KeypointRecord) -> Result<AnnotationStore, FormatError> {
    record.to_store()
}
