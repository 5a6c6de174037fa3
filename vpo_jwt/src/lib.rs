//! # VPO tokens
//!
//! Compact, HMAC-signed access tokens for the vehicle parts ordering API. Nothing here depends on a JWT library; every
//! layer is implemented in this crate:
//!
//! 1. [`mod@sha256`] is the block digest (512-bit blocks, 256-bit output). Its round constants are derived once, on
//!    first use, from the fractional roots of the first 64 primes.
//! 2. [`mod@hmac`] builds the keyed signature on top of the digest and renders it as URL-safe text.
//! 3. [`mod@base64url`] is the unpadded URL-safe encoding used for the header and payload segments.
//! 4. [`mod@token`] composes the three into `header.payload.signature` tokens and checks the temporal claims.
//!
//! [`TokenCodec`] bundles a secret, a [`CompatMode`] and a [`Clock`] so that servers can share a single, cheaply
//! cloneable value across worker threads.
//!
//! ## Compatibility
//! Tokens minted by earlier deployments of the service differ from a textbook HS256 implementation in a few places.
//! [`CompatMode::Legacy`] reproduces those quirks exactly, while [`CompatMode::Strict`] (the default) uses the standard
//! behaviour. See [`CompatMode`] for the full list.

pub mod base64url;
mod claims;
mod clock;
mod codec;
mod errors;
pub mod hmac;
mod mode;
pub mod sha256;
pub mod token;

pub use claims::{Claims, Header, REGISTERED_CLAIMS};
pub use clock::{Clock, FixedClock, SystemClock};
pub use codec::TokenCodec;
pub use errors::TokenError;
pub use mode::CompatMode;
pub use token::{issue, verify, DEFAULT_TOKEN_VALIDITY, MAX_TOKEN_VALIDITY};
