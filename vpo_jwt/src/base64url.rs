//! Unpadded, URL-safe base64 for token segments.
//!
//! Encoding runs the standard alphabet and then strips `=` and swaps `+`/`/` for `-`/`_`. Decoding reverses the
//! substitutions and restores the padding before handing off to the standard decoder, so anything produced by
//! [`encode`] decodes back to the original text.

use crate::TokenError;

pub fn encode(input: &str) -> String {
    encode_bytes(input.as_bytes())
}

pub fn encode_bytes(input: &[u8]) -> String {
    base64::encode(input).trim_end_matches('=').replace('+', "-").replace('/', "_")
}

/// Decodes a segment into UTF-8 text. Invalid base64 and non-UTF-8 contents are both reported as malformed tokens.
pub fn decode(input: &str) -> Result<String, TokenError> {
    let bytes = decode_bytes(input)?;
    String::from_utf8(bytes).map_err(|e| TokenError::MalformedToken(format!("Segment is not valid UTF-8. {e}")))
}

pub fn decode_bytes(input: &str) -> Result<Vec<u8>, TokenError> {
    let mut standard = input.replace('-', "+").replace('_', "/");
    let padding = (4 - standard.len() % 4) % 4;
    standard.extend(std::iter::repeat('=').take(padding));
    base64::decode(&standard).map_err(|e| TokenError::MalformedToken(format!("Invalid base64 segment. {e}")))
}
