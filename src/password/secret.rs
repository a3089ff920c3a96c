//! Password with a transient plaintext

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use tracing::error;

use super::HashedPassword;
use crate::error::{PasswordError, PasswordResult};
use crate::storage::{StorageValue, TryReadString};

/// A [`HashedPassword`] plus the plaintext it was last updated with.
///
/// The plaintext only lives in memory between an update (or an inbound JSON
/// decode) and the next storage load. JSON output is the plaintext and never
/// the hash; the column value is the hash and never the plaintext.
#[derive(Clone, Default)]
pub struct Password {
    hashed: HashedPassword,
    plaintext: String,
}

impl Password {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hashed(&self) -> &HashedPassword {
        &self.hashed
    }

    /// Plaintext from the last update, empty after a storage load.
    pub fn plaintext(&self) -> &str {
        &self.plaintext
    }

    pub fn is_set(&self) -> bool {
        self.hashed.is_set()
    }

    /// Hash `password` and remember it as the current plaintext.
    ///
    /// On error neither the hash nor the plaintext changes.
    pub fn update(&mut self, password: &str, cost: Option<u32>) -> PasswordResult<()> {
        self.hashed.update(password, cost)?;
        self.plaintext = password.to_owned();
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

    /// [`update`](Self::update) on the blocking thread pool.
    pub async fn update_blocking(mut self, password: String, cost: Option<u32>) -> PasswordResult<Self> {
        tokio::task::spawn_blocking(move || self.update(&password, cost).map(|()| self))
            .await
            .map_err(|e| {
                error!("Password hashing task failed: {}", e);
                PasswordError::Worker(e.to_string())
            })?
    }

    /// Decode a bare JSON string and update with it, at the default cost.
    ///
    /// Keeps the two failure modes apart: a payload that is not a JSON string
    /// is [`PasswordError::Decode`], a plaintext bcrypt rejects is
    /// [`PasswordError::Hashing`]. An empty string clears the password.
    pub fn update_from_json(&mut self, payload: &[u8]) -> PasswordResult<()> {
        let password: String = serde_json::from_slice(payload)?;
        self.update(&password, None)
    }

    pub fn verify(&self, candidate: &str) -> bool {
        self.hashed.verify(candidate)
    }

    pub async fn verify_blocking(&self, candidate: &str) -> bool {
        self.hashed.verify_blocking(candidate).await
    }

    /// Load a stored hash. The plaintext is always cleared first, even when
    /// the stored value turns out to be absent or not text.
    pub fn load_from_storage<R: TryReadString + ?Sized>(&mut self, raw: &R) {
        self.plaintext.clear();
        self.hashed.load_from_storage(raw);
    }

    pub fn to_storage_value(&self) -> StorageValue {
        self.hashed.to_storage_value()
    }
}

impl From<HashedPassword> for Password {
    fn from(hashed: HashedPassword) -> Self {
        Self {
            hashed,
            plaintext: String::new(),
        }
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plaintext = if self.plaintext.is_empty() { "" } else { "[REDACTED]" };
        f.debug_struct("Password")
            .field("hashed", &self.hashed)
            .field("plaintext", &plaintext)
            .finish()
    }
}

/// Renders the hash, like [`HashedPassword`].
impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.hashed, f)
    }
}

impl Serialize for Password {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.plaintext)
    }
}

impl<'de> Deserialize<'de> for Password {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let plaintext = String::deserialize(deserializer)?;
        let mut password = Password::new();
        password.update(&plaintext, None).map_err(de::Error::custom)?;
        Ok(password)
    }
}
