//! Plaintext length rule for `validator`-derived request types

use validator::ValidationError;

use super::Password;
use crate::config::{MAX_PASSWORD_BYTES, MIN_PASSWORD_LEN};

/// Check that a non-empty plaintext is 6 to 72 characters long.
///
/// An empty plaintext passes, so records loaded from storage and requests
/// that leave the password untouched validate cleanly. Use with
/// `#[validate(custom(function = "validate_plaintext"))]`.
pub fn validate_plaintext(password: &Password) -> Result<(), ValidationError> {
    validate_plaintext_len(password.plaintext())
}

/// Same rule as [`validate_plaintext`], for a plaintext not yet hashed.
pub fn validate_plaintext_len(plaintext: &str) -> Result<(), ValidationError> {
    let len = plaintext.chars().count();
    if len == 0 || (MIN_PASSWORD_LEN..=MAX_PASSWORD_BYTES).contains(&len) {
        return Ok(());
    }

    let mut err = ValidationError::new("password_length");
    err.message = Some(
        format!(
            "Password must be between {} and {} characters",
            MIN_PASSWORD_LEN, MAX_PASSWORD_BYTES
        )
        .into(),
    );
    Err(err)
}
