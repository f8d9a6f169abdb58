//! Delimited TXT format implementation.
//!
//! One text file per image holding exactly 136 whitespace-separated numbers,
//! `x1 y1 x2 y2 ... x68 y68`, each a ratio coordinate with 6 decimals or
//! `-1.000000` for both components of an unannotated landmark.

use crate::constants::{DELIMITED_TOKEN_COUNT, RATIO_DECIMALS, UNSET_SENTINEL};
use crate::format::error::FormatError;
use crate::format::traits::KeypointCodec;
use crate::model::{AnnotationStore, KeypointId, RatioPoint};

/// Delimited TXT format.
///
/// Supports:
/// - All 68 landmarks in fixed id order
/// - Per-image annotation files
///
/// Does not store:
/// - The image name (the pairing is by base name only)
pub struct DelimitedFormat;

impl KeypointCodec for DelimitedFormat {
    fn id(&self) -> &'static str {
        "txt"
    }

    fn display_name(&self) -> &'static str {
        "TXT"
    }

    fn extension(&self) -> &'static str {
        "txt"
    }

    fn encode(&self, store: &AnnotationStore, _image_name: &str) -> Result<String, FormatError> {
        Ok(encode_delimited(store))
    }

    fn decode(&self, text: &str) -> Result<AnnotationStore, FormatError> {
        decode_delimited(text)
    }
}

/// Encode all 68 landmarks as 136 space-separated values.
pub fn encode_delimited(store: &AnnotationStore) -> String {
    let mut values = Vec::with_capacity(DELIMITED_TOKEN_COUNT);
    for id in KeypointId::all() {
        let point = store
            .get(id)
            .unwrap_or(RatioPoint::new(UNSET_SENTINEL, UNSET_SENTINEL));
        values.push(format!("{:.*}", RATIO_DECIMALS, point.x));
        values.push(format!("{:.*}", RATIO_DECIMALS, point.y));
    }
    values.join(" ")
}

/// Parse the raw numbers of a delimited file, enforcing the 136-token rule.
///
/// Shared by the session loader and the batch converter so both report the
/// same token-count error.
pub fn parse_delimited_values(text: &str) -> Result<Vec<f64>, FormatError> {
    let values = text
        .split_whitespace()
        .map(|token| match token.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(FormatError::invalid_number(token)),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if values.len() != DELIMITED_TOKEN_COUNT {
        return Err(FormatError::TokenCount {
            expected: DELIMITED_TOKEN_COUNT,
            actual: values.len(),
        });
    }
    Ok(values)
}

/// Decode a delimited file, excluding landmarks with a negative component.
pub fn decode_delimited(text: &str) -> Result<AnnotationStore, FormatError> {
    let values = parse_delimited_values(text)?;

    let mut store = AnnotationStore::new();
    for (id, pair) in KeypointId::all().zip(values.chunks_exact(2)) {
        let point = RatioPoint::new(pair[0], pair[1]);
        if point.is_unset() {
            continue;
        }
        store.set(id, point);
    }
    Ok(store)
}
