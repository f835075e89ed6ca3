//! Response decoder

use tracing::{debug, trace};
use valnote_core::Value;

use crate::error::{DecodeError, DecodeResult};
use crate::grammar;

/// Tags that open an error response, with the variant each one maps to
const ERROR_TAGS: [(&str, fn(String) -> DecodeError); 3] = [
    ("SyntaxError:", DecodeError::SyntaxError),
    ("RuntimeError:", DecodeError::RuntimeError),
    ("AuthenticationError:", DecodeError::AuthenticationError),
];

/// Decode one response line (without its `\n`) into a value.
///
/// Productions are tried in a fixed order: null, boolean, character,
/// integer, float, string, vector, set, dictionary, tuple. A response that
/// matches none of them is either a tagged server error or malformed.
pub fn decode(literal: &str) -> DecodeResult<Value> {
    if let Some(value) = grammar::parse_literal(literal) {
        trace!(literal, "Decoded response");
        return value;
    }

    let err = classify_error(literal);
    debug!(error = %err, "Response is not a value");
    Err(err)
}

/// Map a response that is not a value onto its error variant
fn classify_error(literal: &str) -> DecodeError {
    ERROR_TAGS
        .iter()
        .find(|(tag, _)| literal.starts_with(tag))
        .map(|(_, variant)| variant(literal.to_string()))
        .unwrap_or_else(|| DecodeError::MalformedLiteral(literal.to_string()))
}
