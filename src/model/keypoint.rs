//! Landmark identity and the two coordinate spaces.

use std::fmt;

use crate::constants::KEYPOINT_COUNT;

/// Fixed semantic identifier of a facial landmark, always in `1..=68`.
///
/// Ids are never renumbered; the only way coordinates move between ids is an
/// explicit swap on the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeypointId(u8);

impl KeypointId {
    /// First landmark id (leftmost jaw point by convention).
    pub const FIRST: KeypointId = KeypointId(1);

    /// Last landmark id.
    pub const LAST: KeypointId = KeypointId(KEYPOINT_COUNT as u8);

    /// Create an id, returning `None` outside `1..=68`.
    pub fn new(id: u32) -> Option<Self> {
        if (1..=KEYPOINT_COUNT as u32).contains(&id) {
            Some(Self(id as u8))
        } else {
            None
        }
    }

    /// Create an id from a zero-based list row.
    pub fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index)
            .ok()
            .and_then(|i| i.checked_add(1))
            .and_then(Self::new)
    }

    /// The numeric id.
    pub fn get(self) -> u32 {
        u32::from(self.0)
    }

    /// Zero-based position of this id in the ordered landmark list.
    pub fn index(self) -> usize {
        usize::from(self.0) - 1
    }

    /// All 68 ids in ascending order.
    pub fn all() -> impl Iterator<Item = KeypointId> {
        (1..=KEYPOINT_COUNT as u8).map(KeypointId)
    }
}

impl fmt::Display for KeypointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolution-independent position, each component normalised to `[0, 1]`.
///
/// This is the only coordinate space that is stored and persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioPoint {
    pub x: f64,
    pub y: f64,
}

impl RatioPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// True when either component is negative, i.e. the on-disk "unannotated" encoding.
    pub fn is_unset(&self) -> bool {
        self.x < 0.0 || self.y < 0.0
    }

    /// True when the point can be held in a store and written back losslessly:
    /// both components finite and not the unannotated encoding.
    pub fn is_storable(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && !self.is_unset()
    }
}

/// Position in the loaded image's native pixel grid. Display only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// True if `other` lies more than `threshold` pixels away on either axis.
    pub fn moved_beyond(&self, other: &PixelPoint, threshold: f64) -> bool {
        (self.x - other.x).abs() > threshold || (self.y - other.y).abs() > threshold
    }
}
