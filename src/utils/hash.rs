// src/utils/hash.rs

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::AppError;

fn internal(e: argon2::password_hash::Error) -> AppError {
    AppError::InternalServerError(e.to_string())
}

/// Hashes the shared teacher secret with a fresh salt into a PHC string.
pub fn hash_secret(secret: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let phc = Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map_err(internal)?;
    Ok(phc.to_string())
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash itself is unreadable.
pub fn secret_matches(candidate: &str, stored_hash: &str) -> Result<bool, AppError> {
    let stored = PasswordHash::new(stored_hash).map_err(internal)?;
    Ok(Argon2::default()
        .verify_password(candidate.as_bytes(), &stored)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_only_the_hashed_secret() {
        let hash = hash_secret("abc").unwrap();
        assert!(secret_matches("abc", &hash).unwrap());
        assert!(!secret_matches("abd", &hash).unwrap());
        assert!(!secret_matches("", &hash).unwrap());
    }

    #[test]
    fn salts_differ_between_hashes() {
        assert_ne!(hash_secret("abc").unwrap(), hash_secret("abc").unwrap());
    }

    #[test]
    fn malformed_hash_is_internal_error() {
        let err = secret_matches("abc", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, AppError::InternalServerError(_)));
    }
}
