//! In-memory landmark annotations for the image being edited.

use std::collections::BTreeMap;

use super::keypoint::{KeypointId, RatioPoint};

/// Mapping from landmark id to ratio coordinate.
///
/// Absence of an id means "unannotated". The on-disk sentinel `(-1, -1)` is
/// never stored here; decoders drop such entries before insertion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationStore {
    points: BTreeMap<KeypointId, RatioPoint>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the coordinate of `id`.
    pub fn set(&mut self, id: KeypointId, point: RatioPoint) {
        debug_assert!(point.is_storable(), "only finite, set points enter the store");
        self.points.insert(id, point);
    }

    /// Remove an id, returning its coordinate if it was annotated.
    pub fn remove(&mut self, id: KeypointId) -> Option<RatioPoint> {
        self.points.remove(&id)
    }

    pub fn get(&self, id: KeypointId) -> Option<RatioPoint> {
        self.points.get(&id).copied()
    }

    pub fn contains(&self, id: KeypointId) -> bool {
        self.points.contains_key(&id)
    }

    /// Exchange the coordinates held by two ids.
    ///
    /// When only one side is annotated its value moves to the other id and the
    /// original id becomes unannotated; the set of occupied ids never grows.
    pub fn swap(&mut self, a: KeypointId, b: KeypointId) {
        if a == b {
            return;
        }
        match (self.points.remove(&a), self.points.remove(&b)) {
            (Some(pa), Some(pb)) => {
                self.points.insert(a, pb);
                self.points.insert(b, pa);
            }
            (Some(pa), None) => {
                self.points.insert(b, pa);
            }
            (None, Some(pb)) => {
                self.points.insert(a, pb);
            }
            (None, None) => {}
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Number of annotated ids.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Annotated ids with their coordinates, in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (KeypointId, RatioPoint)> + '_ {
        self.points.iter().map(|(id, p)| (*id, *p))
    }

    /// Deep copy of the current contents, used as an undo/redo snapshot.
    pub fn snapshot(&self) -> AnnotationStore {
        self.clone()
    }

    /// Replace the contents wholesale with a snapshot.
    pub fn restore(&mut self, snapshot: AnnotationStore) {
        self.points = snapshot.points;
    }
}
