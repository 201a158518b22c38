//! Password hashing and verification.
//!
//! Bcrypt embeds a fresh random salt in every digest, so hashing the same
//! plaintext twice yields different digests.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::AppError;

/// Hash a password using bcrypt
///
/// # Errors
/// Returns error if bcrypt hashing fails
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its digest.
///
/// A mismatch is an expected outcome, not a fault: wrong passwords and
/// malformed digests both come back as `false`.
pub fn verify_password(password: &str, digest: &str) -> bool {
    verify(password, digest).unwrap_or(false)
}
