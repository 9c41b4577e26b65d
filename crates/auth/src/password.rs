//! Argon2 password hashing.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{AuthError, AuthResult};

/// Hashes a password with Argon2id and a fresh random salt.
///
/// Returns the hash in PHC string format, suitable for storing in the
/// `password_hash` column.
pub fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

/// Verifies a password against a stored PHC hash string.
///
/// Returns `Ok(())` on a match and [`AuthError::InvalidCredentials`] on a
/// mismatch. A malformed stored hash surfaces as a hashing error.
pub fn verify_password(password: &str, stored_hash: &str) -> AuthResult<()> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|e| AuthError::PasswordHash(e.to_string()))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("password123").unwrap();

        assert!(verify_password("password123", &hash).is_ok());
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hash = hash_password("password123").unwrap();

        let err = verify_password("wrongpassword", &hash).unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("password123").unwrap();
        let second = hash_password("password123").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let err = verify_password("password123", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, AuthError::PasswordHash(_)));
    }
}
