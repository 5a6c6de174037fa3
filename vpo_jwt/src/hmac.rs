//! Keyed signatures (HMAC-SHA256) built on [`crate::sha256`].
//!
//! `mac = H((K' ^ opad) || H((K' ^ ipad) || message))`, where `K'` is the key stretched to one block with zero bytes.
//! How keys longer than a block become `K'`, and how the final MAC is rendered as text, depend on the [`CompatMode`].

use subtle::ConstantTimeEq;

use crate::{
    sha256::{digest, BLOCK_SIZE, DIGEST_SIZE},
    CompatMode,
};

pub const INNER_PAD: u8 = 0x36;
pub const OUTER_PAD: u8 = 0x5c;

/// Computes the raw 32-byte MAC of `message` under `key`.
pub fn hmac_sha256(key: &[u8], message: &[u8], mode: CompatMode) -> [u8; DIGEST_SIZE] {
    let block_key = block_sized_key(key, mode);

    let mut inner = Vec::with_capacity(BLOCK_SIZE + message.len());
    inner.extend(block_key.iter().map(|b| b ^ INNER_PAD));
    inner.extend_from_slice(message);
    let inner_hash = digest(&inner);

    let mut outer = Vec::with_capacity(BLOCK_SIZE + DIGEST_SIZE);
    outer.extend(block_key.iter().map(|b| b ^ OUTER_PAD));
    outer.extend_from_slice(&inner_hash);
    digest(&outer)
}

/// Signs `message` with `key` and renders the MAC as URL-safe text. This is the signature segment of a token.
pub fn sign(message: &str, key: &str, mode: CompatMode) -> String {
    let mac = hmac_sha256(key.as_bytes(), message.as_bytes(), mode);
    render_signature(&mac, mode)
}

/// Base64-encodes `mac` and swaps `+`/`/` for `-`/`_`.
///
/// Legacy tokens chop off the final character regardless of what it is. For a 32-byte MAC that character is always the
/// single `=` of padding, so both modes agree on every real signature; they only diverge for other input lengths.
pub fn render_signature(mac: &[u8], mode: CompatMode) -> String {
    let mut rendered = base64::encode(mac).replace('+', "-").replace('/', "_");
    match mode {
        CompatMode::Strict => {
            let unpadded_len = rendered.trim_end_matches('=').len();
            rendered.truncate(unpadded_len);
        },
        CompatMode::Legacy => {
            rendered.pop();
        },
    }
    rendered
}

/// Compares two byte strings in constant time. Only the lengths are compared early.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}

fn block_sized_key(key: &[u8], mode: CompatMode) -> [u8; BLOCK_SIZE] {
    let mut block = [0u8; BLOCK_SIZE];
    match mode {
        CompatMode::Strict if key.len() > BLOCK_SIZE => {
            block[..DIGEST_SIZE].copy_from_slice(&digest(key));
        },
        _ => {
            let n = key.len().min(BLOCK_SIZE);
            block[..n].copy_from_slice(&key[..n]);
        },
    }
    block
}
