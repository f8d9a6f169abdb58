//! Structured annotation record.
//!
//! This is the JSON shape written next to each image:
//!
//! ```json
//! {
//!   "image_name": "face_001.jpg",
//!   "keypoints": [
//!     { "id": 1, "x": 0.231544, "y": 0.402113 },
//!     { "id": 2, "x": -1.0, "y": -1.0 }
//!   ]
//! }
//! ```
//!
//! `keypoints` always lists all 68 ids in order when written; unannotated ids
//! carry the `(-1, -1)` sentinel.

use serde::{Deserialize, Serialize};

use crate::constants::UNSET_SENTINEL;
use crate::coords::round_ratio;
use crate::format::error::FormatError;
use crate::model::{AnnotationStore, KeypointId, RatioPoint};

/// Annotations of one image in structured form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeypointRecord {
    /// File name of the image these annotations belong to.
    pub image_name: String,

    /// One entry per landmark id.
    pub keypoints: Vec<KeypointEntry>,
}

/// A single landmark in a [`KeypointRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeypointEntry {
    /// Landmark id (1..=68).
    pub id: i64,
    /// Ratio x, or -1 when unannotated.
    pub x: f64,
    /// Ratio y, or -1 when unannotated.
    pub y: f64,
}

impl KeypointEntry {
    /// Entry for an annotated landmark, rounded to the persisted precision.
    pub fn annotated(id: KeypointId, point: RatioPoint) -> Self {
        Self {
            id: i64::from(id.get()),
            x: round_ratio(point.x),
            y: round_ratio(point.y),
        }
    }

    /// Sentinel entry for an unannotated landmark.
    pub fn unset(id: KeypointId) -> Self {
        Self {
            id: i64::from(id.get()),
            x: UNSET_SENTINEL,
            y: UNSET_SENTINEL,
        }
    }
}

impl KeypointRecord {
    /// Build the full 68-entry record for a store.
    pub fn from_store(store: &AnnotationStore, image_name: impl Into<String>) -> Self {
        let keypoints = KeypointId::all()
            .map(|id| match store.get(id) {
                Some(point) => KeypointEntry::annotated(id, point),
                None => KeypointEntry::unset(id),
            })
            .collect();

        Self {
            image_name: image_name.into(),
            keypoints,
        }
    }

    /// Convert back to a store, excluding sentinel entries.
    pub fn to_store(&self) -> Result<AnnotationStore, FormatError> {
        let mut store = AnnotationStore::new();
        for entry in &self.keypoints {
            let id = u32::try_from(entry.id)
                .ok()
                .and_then(KeypointId::new)
                .ok_or(FormatError::InvalidKeypointId { id: entry.id })?;

            let point = RatioPoint::new(entry.x, entry.y);
            if point.is_unset() {
                continue;
            }
            store.set(id, point);
        }
        Ok(store)
    }

    /// Number of entries that are not the sentinel.
    pub fn annotated_count(&self) -> usize {
        self.keypoints
            .iter()
            .filter(|e| !RatioPoint::new(e.x, e.y).is_unset())
            .count()
    }
}
