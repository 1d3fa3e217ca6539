use super::AuthError;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tracing::error;

/// Hash a plaintext password into an Argon2id PHC string with a fresh random salt.
///
/// # Errors
/// Returns [`AuthError::Hashing`] if the hasher fails.
pub fn hash_password(plaintext: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Failed to hash password: {e}");
            AuthError::Hashing
        })
}

/// Check a plaintext password against a stored PHC string.
///
/// A malformed stored hash is reported the same way as a wrong password.
///
/// # Errors
/// Returns [`AuthError::InvalidCredentials`] when the password does not match.
pub fn verify_password(plaintext: &str, encrypted: &str) -> Result<(), AuthError> {
    let hash = PasswordHash::new(encrypted).map_err(|_| AuthError::InvalidCredentials)?;

    Argon2::default()
        .verify_password(plaintext.as_bytes(), &hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
