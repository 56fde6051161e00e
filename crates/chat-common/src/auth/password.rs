//! Password hashing and verification (Argon2id)

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chat_core::DomainError;

use crate::error::AppError;

/// Hash a password using Argon2id
///
/// # Errors
/// Returns an error if hashing fails
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

/// Verify a password against a stored hash
///
/// # Errors
/// Returns an error if the stored hash is malformed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Password service for dependency injection
#[derive(Debug, Clone, Default)]
pub struct PasswordService;

impl PasswordService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        hash_password(password)
    }

    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        verify_password(password, hash)
    }

    /// Verify a login attempt; a mismatch is `InvalidCredentials`
    pub fn verify_or_error(&self, password: &str, hash: &str) -> Result<(), AppError> {
        if self.verify(password, hash)? {
            Ok(())
        } else {
            Err(AppError::InvalidCredentials)
        }
    }

    /// Re-authentication for sensitive changes; a mismatch is
    /// `IncorrectPassword` (403) rather than a 401 that would look like a
    /// dead session to the client.
    pub fn verify_current(&self, password: &str, hash: &str) -> Result<(), AppError> {
        if self.verify(password, hash)? {
            Ok(())
        } else {
            Err(DomainError::IncorrectPassword.into())
        }
    }
}

/// Require at least 8 characters with an upper-case letter, a lower-case
/// letter and a digit.
///
/// # Errors
/// Returns `WeakPassword` naming the first unmet requirement
pub fn validate_password_strength(password: &str) -> Result<(), AppError> {
    let weak = |msg: &str| -> Result<(), AppError> {
        Err(DomainError::WeakPassword(msg.to_string()).into())
    };

    if password.chars().count() < 8 {
        return weak("must be at least 8 characters long");
    }
    if !password.chars().any(char::is_uppercase) {
        return weak("must contain at least one uppercase letter");
    }
    if !password.chars().any(char::is_lowercase) {
        return weak("must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return weak("must contain at least one digit");
    }
    Ok(())
}
