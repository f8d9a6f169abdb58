//! Global constants for the KPAT annotation engine

/// Number of facial landmarks per image (ids 1..=68)
pub const KEYPOINT_COUNT: usize = 68;

/// Number of numeric tokens in a delimited annotation file (x and y per landmark)
pub const DELIMITED_TOKEN_COUNT: usize = KEYPOINT_COUNT * 2;

/// Decimal digits kept when ratio coordinates are persisted
pub const RATIO_DECIMALS: usize = 6;

/// On-disk value for both components of an unannotated landmark
pub const UNSET_SENTINEL: f64 = -1.0;

/// Default depth of the undo and redo stacks
pub const DEFAULT_MAX_UNDO_STEPS: usize = 10;

/// Default net drag distance (in image pixels) before a drag counts as a move
pub const DEFAULT_DRAG_THRESHOLD: f64 = 1.0;
