//! Tests for the delimited TXT format.

use super::{kp, sparse_store};
use crate::format::error::FormatError;
use crate::format::formats::{DelimitedFormat, decode_delimited, encode_delimited};
use crate::format::traits::KeypointCodec;
use crate::model::{AnnotationStore, RatioPoint};

/// Build a file body from 136 values.
fn body(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format!("{:.6}", v))
        .collect::<Vec<_>>()
        .join(" ")
}

fn all_unset() -> Vec<f64> {
    vec![-1.0; 136]
}

#[test]
fn test_delimited_format_metadata() {
    let format = DelimitedFormat;

    assert_eq!(format.id(), "txt");
    assert_eq!(format.display_name(), "TXT");
    assert_eq!(format.extension(), "txt");
}

#[test]
fn test_encode_empty_store_is_all_sentinels() {
    let text = encode_delimited(&AnnotationStore::new());
    let tokens: Vec<&str> = text.split(' ').collect();

    assert_eq!(tokens.len(), 136);
    assert!(tokens.iter().all(|t| *t == "-1.000000"));
}

#[test]
fn test_encode_positions_and_precision() {
    let mut store = AnnotationStore::new();
    store.set(kp(1), RatioPoint::new(0.25, 0.5));
    store.set(kp(2), RatioPoint::new(0.123_456_789, 0.000_000_4));

    let text = encode_delimited(&store);
    let tokens: Vec<&str> = text.split_whitespace().collect();

    assert_eq!(&tokens[0..4], &["0.250000", "0.500000", "0.123457", "0.000000"]);
    assert_eq!(&tokens[4..6], &["-1.000000", "-1.000000"]);
    assert!(!text.ends_with(' '));
}

#[test]
fn test_decode_skips_sentinels() {
    let mut values = all_unset();
    values[0] = 0.1;
    values[1] = 0.2;
    // id 5 stays (-1, -1)
    values[10] = 0.6;
    values[11] = 0.7;

    let store = decode_delimited(&body(&values)).unwrap();

    assert_eq!(store.len(), 2);
    assert_eq!(store.get(kp(1)), Some(RatioPoint::new(0.1, 0.2)));
    assert_eq!(store.get(kp(6)), Some(RatioPoint::new(0.6, 0.7)));
    assert!(!store.contains(kp(5)));
}

#[test]
fn test_decode_drops_half_negative_pairs() {
    let mut values = all_unset();
    values[0] = 0.3;
    values[1] = -1.0;
    values[2] = -0.5;
    values[3] = 0.4;

    let store = decode_delimited(&body(&values)).unwrap();
    assert!(store.is_empty());
}

#[test]
fn test_decode_accepts_any_whitespace() {
    let values = all_unset();
    let text = values
        .chunks(2)
        .map(|p| format!("{}\t{}", p[0], p[1]))
        .collect::<Vec<_>>()
        .join("\n");

    let store = decode_delimited(&format!("  {}\n\n", text)).unwrap();
    assert!(store.is_empty());
}

#[test]
fn test_decode_wrong_token_count() {
    let values = vec![0.5; 135];
    let err = decode_delimited(&body(&values)).unwrap_err();

    match err {
        FormatError::TokenCount { expected, actual } => {
            assert_eq!(expected, 136);
            assert_eq!(actual, 135);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_token_count_message_names_both_counts() {
    let err = decode_delimited(&body(&[0.5; 137])).unwrap_err();
    let message = err.to_string();

    assert!(message.contains("136"), "{message}");
    assert!(message.contains("137"), "{message}");
}

#[test]
fn test_decode_empty_file_is_count_error() {
    let err = decode_delimited("").unwrap_err();
    assert!(matches!(err, FormatError::TokenCount { actual: 0, .. }));
}

#[test]
fn test_decode_non_numeric_token() {
    let text = body(&all_unset()).replacen("-1.000000", "abc", 1);
    let err = decode_delimited(&text).unwrap_err();

    assert!(matches!(err, FormatError::InvalidNumber { ref token } if token == "abc"));
}

#[test]
fn test_decode_rejects_non_finite() {
    let text = body(&all_unset()).replacen("-1.000000", "NaN", 1);
    assert!(matches!(
        decode_delimited(&text),
        Err(FormatError::InvalidNumber { .. })
    ));
}

#[test]
fn test_codec_trait_matches_free_functions() {
    let store = sparse_store();
    let via_trait = DelimitedFormat.encode(&store, "ignored.jpg").unwrap();
    assert_eq!(via_trait, encode_delimited(&store));
    assert_eq!(DelimitedFormat.decode(&via_trait).unwrap(), store);
}
