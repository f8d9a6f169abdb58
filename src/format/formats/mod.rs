//! Annotation codec implementations.

mod delimited;
mod structured;

#[cfg(test)]
mod tests;

pub use delimited::{DelimitedFormat, decode_delimited, encode_delimited, parse_delimited_values};
pub use structured::{StructuredFormat, decode_structured, encode_structured};
