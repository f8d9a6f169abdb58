//! Unit tests for annotation codec implementations.
//!
//! These tests verify the correctness of encoding, decoding, sentinel
//! handling, round-trips, and batch conversion.

mod delimited_tests;

use crate::model::{AnnotationStore, KeypointId, RatioPoint};

/// Shorthand for a valid landmark id.
pub(super) fn kp(n: u32) -> KeypointId {
    KeypointId::new(n).unwrap()
}

/// A store with a sparse set of annotated landmarks.
pub(super) fn sparse_store() -> AnnotationStore {
    let mut store = AnnotationStore::new();
    store.set(kp(1), RatioPoint::new(0.1, 0.2));
    store.set(kp(9), RatioPoint::new(0.5, 0.95));
    store.set(kp(34), RatioPoint::new(0.123456, 0.654321));
    store.set(kp(68), RatioPoint::new(1.0, 0.0));
    store
}
