//! Password value types
//!
//! [`HashedPassword`] holds a bcrypt hash and nothing else. [`Password`]
//! wraps one and adds the transient plaintext used for request validation
//! and JSON output.

mod hashed;
mod pg;
mod secret;
mod validation;

pub use hashed::HashedPassword;
pub use secret::Password;
pub use validation::{validate_plaintext, validate_plaintext_len};
