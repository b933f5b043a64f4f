/// Password hashing and verification using Argon2id.
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{CatalogError, Result};

/// Hash a password for storage in a user's `pw_hash` field.
///
/// Produces a PHC-formatted Argon2id string with a per-password random
/// salt. Strength policy belongs to the registration form, not here: any
/// password hashes, the empty string included.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CatalogError::Internal(format!("password hashing failed: {}", e)))?
        .to_string();

    Ok(password_hash)
}

/// Verify a candidate password against a stored PHC hash.
///
/// A wrong password is `Ok(false)`, not an error. Only a stored hash that
/// cannot be parsed or verified at all errors.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|e| CatalogError::Internal(format!("invalid password hash: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CatalogError::Internal(format!(
            "password verification failed: {}",
            e
        ))),
    }
}
