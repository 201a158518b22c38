//! Access-token generation and verification.
//!
//! Tokens are HS256 JWTs signed with the process-wide secret from
//! configuration. Verification is a pure function of the token, the secret,
//! and the caller-supplied clock; it does no I/O.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::Claims;
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};

/// Issue a new access token for `username`, expiring a fixed interval
/// after `now`.
///
/// # Errors
/// Returns error if token encoding fails
pub fn issue_access_token(
    username: &str,
    now: DateTime<Utc>,
    config: &JwtSettings,
) -> Result<String, AppError> {
    let claims = Claims::new(username.to_string(), now, config.access_token_expiry);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Verify an access token and extract its claims.
///
/// Expiry is checked against the `now` argument rather than the wall clock,
/// so callers own the notion of time. A bad signature, a malformed token,
/// and a missing subject all fail the same way; only the caller-facing
/// distinction between "expired/invalid" and "revoked" is made elsewhere.
///
/// # Errors
/// Returns `AuthError::TokenInvalid` for signature/decoding/subject
/// failures and `AuthError::TokenExpired` once `now` passes the embedded
/// expiry.
pub fn verify_access_token(
    token: &str,
    now: DateTime<Utc>,
    config: &JwtSettings,
) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is checked below against the caller's clock.
    validation.validate_exp = false;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::warn!("Token validation error: {}", e);
        AppError::Auth(AuthError::TokenInvalid)
    })?;

    if claims.sub.is_empty() {
        tracing::warn!("Token carries no subject");
        return Err(AppError::Auth(AuthError::TokenInvalid));
    }

    if claims.is_expired(now) {
        return Err(AppError::Auth(AuthError::TokenExpired));
    }

    Ok(claims)
}
