//! Passcode hashing with Argon2id.
//!
//! Hashes are stored in PHC string format, which carries the salt and
//! parameters alongside the digest.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::AuthError;

pub fn hash_passcode(passcode: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(passcode.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(format!("failed to hash passcode: {e}")))
}

/// Returns `Ok(false)` on a mismatch and an error only when `hash` is not a
/// valid PHC string.
pub fn verify_passcode(passcode: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AuthError::Hash(format!("invalid passcode hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(passcode.as_bytes(), &parsed)
        .is_ok())
}
