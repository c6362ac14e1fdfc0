// src/utils/hash.rs

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use crate::error::AppError;

/// Prefix of the PHC strings produced by [`hash_password`].
const ARGON2_PREFIX: &str = "$argon2";

/// Prefix of bcrypt hashes (`$2a$`, `$2b$`, `$2y$`) found on older user directories.
const BCRYPT_PREFIX: &str = "$2";

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .to_string();

    Ok(password_hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    let result = Argon2::default().verify_password(password.as_bytes(), &parsed_hash);

    match result {
        Ok(_) => Ok(true),
        Err(_) => Ok(false),
    }
}

/// Checks `password` against a stored credential.
///
/// Stored values are argon2 PHC strings or, on legacy records, bcrypt hashes
/// or the plaintext password itself. An empty stored value never matches;
/// neither does a corrupt hash.
pub fn check_password(password: &str, stored: &str) -> bool {
    if stored.is_empty() {
        return false;
    }

    if stored.starts_with(ARGON2_PREFIX) {
        return verify_password(password, stored).unwrap_or_else(|e| {
            tracing::warn!("Unreadable password hash: {}", e);
            false
        });
    }

    if stored.starts_with(BCRYPT_PREFIX) {
        return bcrypt::verify(password, stored).unwrap_or_else(|e| {
            tracing::warn!("Unreadable bcrypt hash: {}", e);
            false
        });
    }

    password == stored
}
