//! bcrypt-password - password fields that never hold plaintext at rest
//!
//! [`Password`] and [`HashedPassword`] keep a salted bcrypt hash and plug into
//! the usual record boundaries:
//!
//! - JSON: a `Password` deserializes from a bare string and hashes it on the
//!   spot; it serializes to the plaintext it was last updated with, never the
//!   hash.
//! - Storage: the column value is always the hash (possibly empty). Loading
//!   from storage copies the hash verbatim and clears any plaintext.
//! - Verification: an empty hash matches nothing, and every error while
//!   comparing counts as a mismatch.
//!
//! ```
//! use bcrypt_password::Password;
//!
//! let mut password: Password = serde_json::from_str(r#""fortest""#).unwrap();
//! assert!(password.verify("fortest"));
//!
//! let stored = password.to_storage_value();
//! password.load_from_storage(&stored);
//! assert_eq!(serde_json::to_string(&password).unwrap(), r#""""#);
//! assert!(password.verify("fortest"));
//! ```
//!
//! Hashing is slow on purpose. Async callers should use the `*_blocking`
//! variants, which run on tokio's blocking pool.

pub mod config;
pub mod error;
pub mod password;
pub mod storage;
pub mod users;

pub use error::{PasswordError, PasswordResult};
pub use password::{validate_plaintext, validate_plaintext_len, HashedPassword, Password};
pub use storage::{StorageValue, TryReadString};
