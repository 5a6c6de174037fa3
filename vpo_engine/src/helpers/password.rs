//! bcrypt password hashes.
//!
//! Hashes are stored in the modular crypt format (`$2b$12$...`). Hashes written by older deployments (`$2a$05$...`)
//! still verify.

use log::debug;

use crate::AuthApiError;

pub const PASSWORD_HASH_COST: u32 = bcrypt::DEFAULT_COST;

pub fn hash_password(password: &str) -> Result<String, AuthApiError> {
    bcrypt::hash(password, PASSWORD_HASH_COST).map_err(|e| AuthApiError::PasswordHashError(e.to_string()))
}

/// Checks `password` against a stored bcrypt hash. Hashes that cannot be parsed never match.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match bcrypt::verify(password, stored) {
        Ok(valid) => valid,
        Err(e) => {
            debug!("🗃️ Stored password hash could not be checked. {e}");
            false
        },
    }
}
