//! Error handling module
//!
//! Errors surfaced by password hashing and inbound JSON decoding. Verification
//! and storage loads never fail, so they have no error variants here.

use thiserror::Error;

/// Password-wide error type
#[derive(Error, Debug)]
pub enum PasswordError {
    /// bcrypt rejected the input: cost out of range, plaintext over 72 bytes,
    /// or an internal primitive failure.
    #[error("Hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    /// Inbound JSON was not a bare string.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A background hashing task was cancelled or panicked.
    #[error("Worker error: {0}")]
    Worker(String),
}

impl PasswordError {
    pub fn is_hashing(&self) -> bool {
        matches!(self, PasswordError::Hashing(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, PasswordError::Decode(_))
    }
}

/// Result type alias for password operations
pub type PasswordResult<T> = Result<T, PasswordError>;
