//! Minting and verifying `header.payload.signature` tokens.
//!
//! The header and the payload are JSON, encoded with [`crate::base64url`]. The signature is [`crate::hmac::sign`] over
//! the two encoded segments joined with a dot, exactly as they appear in the token.
//!
//! Verification checks, in order:
//! 1. the token has exactly three segments,
//! 2. the header and payload decode (and, in strict mode, the header names `HS256`),
//! 3. the recomputed signature matches the supplied one,
//! 4. `exp`, when present, has not passed,
//! 5. `iat`, when present, is not in the future.
//!
//! Times are whole seconds since the Unix epoch. There is no clock-skew allowance.

use log::trace;
use serde_json::Value;

use crate::{
    base64url,
    hmac::{constant_time_eq, sign},
    Claims,
    Clock,
    CompatMode,
    Header,
    SystemClock,
    TokenError,
};

pub const ALGORITHM: &str = "HS256";
pub const TOKEN_TYPE: &str = "JWT";
/// How long freshly issued access tokens stay valid, in seconds.
pub const DEFAULT_TOKEN_VALIDITY: i64 = 86_400;
/// The longest lifetime an access token can be given: ten years.
pub const MAX_TOKEN_VALIDITY: i64 = 10 * 365 * DEFAULT_TOKEN_VALIDITY;

/// Mints a token for `claims` signed with `secret`.
pub fn issue(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    issue_with_mode(claims, secret, CompatMode::Strict)
}

/// Verifies `token` against `secret` and the system clock, returning its claims.
pub fn verify(token: &str, secret: &str) -> Result<Claims, TokenError> {
    verify_at(token, secret, SystemClock.now(), CompatMode::Strict)
}

/// Mints a token in the given mode. Fails if a registered claim is held in `extra` with the wrong type, since the
/// payload would not verify.
pub fn issue_with_mode(claims: &Claims, secret: &str, mode: CompatMode) -> Result<String, TokenError> {
    if let Some(key) = claims.shadowed_claim() {
        return Err(TokenError::MalformedToken(format!("The {key} claim must be set through its typed field")));
    }
    let header = serde_json::to_string(&Header::default())
        .map_err(|e| TokenError::MalformedToken(format!("Could not serialize header. {e}")))?;
    let payload = serde_json::to_string(claims)
        .map_err(|e| TokenError::MalformedToken(format!("Could not serialize claims. {e}")))?;
    let signing_input = format!("{}.{}", base64url::encode(&header), base64url::encode(&payload));
    let signature = sign(&signing_input, secret, mode);
    Ok(format!("{signing_input}.{signature}"))
}

/// Verifies `token` as of `now` (seconds since the Unix epoch).
pub fn verify_at(token: &str, secret: &str, now: i64, mode: CompatMode) -> Result<Claims, TokenError> {
    let (header_part, payload_part, signature) = split_token(token)?;
    check_header(header_part, mode)?;
    let payload = base64url::decode(payload_part)?;
    let claims = serde_json::from_str::<Claims>(&payload)
        .map_err(|e| TokenError::MalformedToken(format!("Payload is not a valid claims object. {e}")))?;

    let expected = sign(&format!("{header_part}.{payload_part}"), secret, mode);
    if !constant_time_eq(expected.as_bytes(), signature.as_bytes()) {
        return Err(TokenError::InvalidSignature);
    }
    check_temporal_claims(&claims, now, mode)?;
    trace!("🔐️ Token for subject {:?} verified", claims.sub);
    Ok(claims)
}

fn split_token(token: &str) -> Result<(&str, &str, &str), TokenError> {
    let mut segments = token.split('.');
    match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(header), Some(payload), Some(signature), None) => Ok((header, payload, signature)),
        _ => Err(TokenError::MalformedToken("A token must have exactly three segments".to_string())),
    }
}

fn check_header(segment: &str, mode: CompatMode) -> Result<(), TokenError> {
    let json = base64url::decode(segment)?;
    match mode {
        CompatMode::Legacy => {
            serde_json::from_str::<Value>(&json)
                .map_err(|e| TokenError::MalformedToken(format!("Header is not valid JSON. {e}")))?;
        },
        CompatMode::Strict => {
            let header = serde_json::from_str::<Header>(&json)
                .map_err(|e| TokenError::MalformedToken(format!("Header is not valid. {e}")))?;
            if header.alg != ALGORITHM {
                return Err(TokenError::MalformedToken(format!("Unsupported signing algorithm: {}", header.alg)));
            }
            if let Some(typ) = header.typ.as_deref().filter(|t| *t != TOKEN_TYPE) {
                return Err(TokenError::MalformedToken(format!("Unsupported token type: {typ}")));
            }
        },
    }
    Ok(())
}

fn check_temporal_claims(claims: &Claims, now: i64, mode: CompatMode) -> Result<(), TokenError> {
    // Legacy tokens only checked claims that were truthy, so a zero timestamp counted as absent
    let present = |value: Option<i64>| match mode {
        CompatMode::Strict => value,
        CompatMode::Legacy => value.filter(|v| *v != 0),
    };
    if present(claims.exp).is_some_and(|exp| exp < now) {
        return Err(TokenError::TokenExpired);
    }
    if present(claims.iat).is_some_and(|iat| iat > now) {
        return Err(TokenError::TokenNotYetValid);
    }
    Ok(())
}
