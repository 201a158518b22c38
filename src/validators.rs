//! Input validators for account and profile fields.
//!
//! Length caps guard against oversized payloads; the charset checks reject
//! control characters and other content that has no business in a name.

use crate::error::ValidationError;
use lazy_static::lazy_static;
use regex::Regex;

const MAX_USERNAME_LENGTH: usize = 64;
const MAX_DISPLAY_NAME_LENGTH: usize = 256;

lazy_static! {
    // Letters, digits, and a small set of separators; no leading separator.
    static ref USERNAME_REGEX: Regex =
        Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9._-]*$").unwrap();
}

/// Validates an account username.
/// Usernames identify accounts and become the token subject, so the charset
/// is kept narrow.
pub fn is_valid_username(username: &str) -> Result<String, ValidationError> {
    let trimmed = username.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("name".to_string()));
    }

    if trimmed.len() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::TooLong(
            "name".to_string(),
            MAX_USERNAME_LENGTH,
        ));
    }

    if !USERNAME_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat("name".to_string()));
    }

    Ok(trimmed.to_string())
}

/// Validates free-form display fields (profile name, city).
pub fn is_valid_display_name(field: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field.to_string()));
    }

    if trimmed.len() > MAX_DISPLAY_NAME_LENGTH {
        return Err(ValidationError::TooLong(
            field.to_string(),
            MAX_DISPLAY_NAME_LENGTH,
        ));
    }

    if trimmed.chars().any(|c| c.is_control()) {
        return Err(ValidationError::InvalidFormat(field.to_string()));
    }

    Ok(trimmed.to_string())
}
