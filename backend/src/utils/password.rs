//! One-way salted password hashing.
//!
//! Wraps bcrypt with the fixed work factor the service has always used.
//! Verification never reports why it failed beyond "the stored hash itself is
//! unusable"; callers on the authentication path treat that the same as a
//! mismatch.

use thiserror::Error;

/// bcrypt work factor. Fixed to keep stored hashes comparable across
/// deployments.
pub const HASH_COST: u32 = 10;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hashing(bcrypt::BcryptError),
    /// The stored hash is not a parseable bcrypt string.
    #[error("stored password hash is malformed: {0}")]
    InvalidHash(bcrypt::BcryptError),
}

/// Hashes a plaintext password with a fresh random salt.
pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    bcrypt::hash(plain, HASH_COST).map_err(PasswordError::Hashing)
}

/// Verifies a plaintext password against a stored hash.
///
/// Returns `Ok(false)` on a mismatch; errors only when `hashed` is not a
/// valid bcrypt string.
pub fn verify_password(plain: &str, hashed: &str) -> Result<bool, PasswordError> {
    bcrypt::verify(plain, hashed).map_err(PasswordError::InvalidHash)
}
