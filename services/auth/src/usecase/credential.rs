use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::error::AuthServiceError;

/// Hash a password with Argon2id and a random salt.
pub fn hash_password(password: &str) -> Result<String, AuthServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthServiceError::Internal(anyhow::anyhow!("hash password: {e}")))
}

/// Verify a password against a stored hash. A mismatch is `Ok(false)`;
/// only an undecodable hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthServiceError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AuthServiceError::Internal(anyhow::anyhow!("parse password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
