//! Stored bcrypt hash

use std::fmt;

use bcrypt::BcryptError;
use tracing::{debug, error, trace, warn};

use crate::config::default_cost;
use crate::error::PasswordResult;
use crate::storage::{StorageValue, TryReadString};

/// A password kept only as its bcrypt hash.
///
/// The hash is either empty, meaning no password is set, or a full
/// `$2b$<cost>$<salt+digest>` string. An empty hash never verifies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashedPassword {
    hashed: String,
}

impl HashedPassword {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a hash computed elsewhere. No hashing or format check happens.
    pub fn from_hash(hashed: impl Into<String>) -> Self {
        Self {
            hashed: hashed.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.hashed
    }

    pub fn is_set(&self) -> bool {
        !self.hashed.is_empty()
    }

    /// Replace the stored hash with a fresh hash of `password`.
    ///
    /// An empty `password` clears the hash and succeeds. `cost` defaults to
    /// [`default_cost`]. On error the previous hash is kept.
    pub fn update(&mut self, password: &str, cost: Option<u32>) -> PasswordResult<()> {
        if password.is_empty() {
            self.hashed.clear();
            return Ok(());
        }

        let cost = cost.unwrap_or_else(default_cost);
        self.hashed = bcrypt::non_truncating_hash(password, cost)?;
        debug!(cost, "Password hashed");
        Ok(())
    }

    /// Like [`update`](Self::update) but panics on a hashing error.
    ///
    /// Only for trusted call sites such as fixtures, seeds and migrations.
    /// Never call this with request input.
    pub fn update_or_abort(&mut self, password: &str, cost: Option<u32>) {
        if let Err(e) = self.update(password, cost) {
            panic!("failed to hash password: {}", e);
        }
    }

    /// Check `candidate` against the stored hash. Never fails: anything that
    /// cannot be proven to match is a mismatch.
    pub fn verify(&self, candidate: &str) -> bool {
        if self.hashed.is_empty() {
            return false;
        }

        match bcrypt::non_truncating_verify(candidate, &self.hashed) {
            Ok(matched) => matched,
            Err(BcryptError::Truncation(len)) => {
                debug!(len, "Candidate password exceeds bcrypt input limit");
                false
            }
            Err(e) => {
                debug!("Stored password hash could not be verified: {}", e);
                false
            }
        }
    }

    /// [`verify`](Self::verify) on the blocking thread pool.
    pub async fn verify_blocking(&self, candidate: &str) -> bool {
        if self.hashed.is_empty() {
            return false;
        }

        let hashed = self.clone();
        let candidate = candidate.to_owned();
        match tokio::task::spawn_blocking(move || hashed.verify(&candidate)).await {
            Ok(matched) => matched,
            Err(e) => {
                error!("Password verification task failed: {}", e);
                false
            }
        }
    }

    /// Copy a stored hash in verbatim. Non-text and absent values are ignored
    /// and leave the current hash in place.
    pub fn load_from_storage<R: TryReadString + ?Sized>(&mut self, raw: &R) {
        match raw.try_read_string() {
            Some(hashed) => self.hashed = hashed.to_owned(),
            None if raw.is_absent() => trace!("No stored password hash to load"),
            None => warn!(kind = raw.kind(), "Ignoring non-text stored password hash"),
        }
    }

    /// The value to persist. Always text, empty when no password is set.
    pub fn to_storage_value(&self) -> StorageValue {
        StorageValue::Text(self.hashed.clone())
    }
}

impl fmt::Display for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hashed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HASH_LEN, MIN_COST};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn hashed(password: &str) -> HashedPassword {
        let mut p = HashedPassword::new();
        p.update(password, Some(MIN_COST)).unwrap();
        p
    }

    #[test]
    fn test_empty_never_verifies() {
        let p = HashedPassword::new();
        assert!(!p.is_set());
        assert!(!p.verify(""));
        assert!(!p.verify("foobar"));
    }

    #[test]
    fn test_update_and_verify() {
        let p = hashed("foobar");
        assert_eq!(p.as_str().len(), HASH_LEN);
        assert!(p.as_str().starts_with("$2b$04$"));
        assert!(p.verify("foobar"));
        assert!(!p.verify("foobar2"));
        assert!(!p.verify(""));
    }

    #[test]
    fn test_update_with_empty_clears() {
        let mut p = hashed("foobar");
        p.update("", Some(MIN_COST)).unwrap();
        assert_eq!(p.as_str(), "");
        assert!(!p.verify(""));
        assert!(!p.verify("foobar"));
    }

    #[test]
    fn test_update_overwrites() {
        let mut p = hashed("first");
        p.update("second", Some(MIN_COST)).unwrap();
        assert!(!p.verify("first"));
        assert!(p.verify("second"));
    }

    #[test]
    fn test_invalid_cost_keeps_previous_hash() {
        let mut p = hashed("foobar");
        let before = p.clone();
        let err = p.update("other", Some(MIN_COST - 1)).unwrap_err();
        assert!(err.is_hashing());
        assert_eq!(p, before);
    }

    #[test]
    fn test_oversized_plaintext_rejected() {
        let mut p = HashedPassword::new();
        let long = "a".repeat(73);
        assert!(p.update(&long, Some(MIN_COST)).unwrap_err().is_hashing());
        assert!(!p.is_set());

        let max = "a".repeat(72);
        p.update(&max, Some(MIN_COST)).unwrap();
        assert!(p.verify(&max));
        assert!(!p.verify(&long));
    }

    #[test]
    #[should_panic(expected = "failed to hash password")]
    fn test_update_or_abort_panics() {
        HashedPassword::new().update_or_abort("foobar", Some(99));
    }

    #[test]
    fn test_malformed_hash_does_not_verify() {
        let p = HashedPassword::from_hash("not-a-bcrypt-hash");
        assert!(!p.verify("not-a-bcrypt-hash"));
        assert!(!p.verify(""));
    }

    #[test]
    fn test_display_renders_hash() {
        let p = hashed("foobar");
        assert_eq!(p.to_string(), p.as_str());
    }

    #[test]
    fn test_load_from_storage_text() {
        let source = hashed("stored");
        let mut p = HashedPassword::new();
        p.load_from_storage(source.as_str());
        assert_eq!(p, source);
        assert!(p.verify("stored"));
    }

    #[test]
    fn test_load_from_storage_empty_text_clears() {
        let mut p = hashed("foobar");
        p.load_from_storage("");
        assert!(!p.is_set());
        assert!(!p.verify(""));
    }

    #[test]
    fn test_load_from_storage_ignores_other_values() {
        let mut p = hashed("foobar");
        let before = p.clone();
        p.load_from_storage(&StorageValue::Null);
        p.load_from_storage(&StorageValue::Int(1));
        p.load_from_storage(&StorageValue::Bytes(b"$2b$".to_vec()));
        p.load_from_storage(&None::<String>);
        p.load_from_storage(&json!(false));
        assert_eq!(p, before);
    }

    #[test]
    fn test_to_storage_value_always_text() {
        assert_eq!(HashedPassword::new().to_storage_value(), StorageValue::Text(String::new()));
        let p = hashed("foobar");
        assert_eq!(p.to_storage_value(), StorageValue::Text(p.to_string()));
    }

    #[tokio::test]
    async fn test_verify_blocking() {
        let p = hashed("foobar");
        assert!(p.verify_blocking("foobar").await);
        assert!(!p.verify_blocking("nope").await);
        assert!(!HashedPassword::new().verify_blocking("").await);
    }
}
