//! Hashing configuration module
//!
//! Loads the default bcrypt work factor from the environment.

use once_cell::sync::Lazy;
use thiserror::Error;
use tracing::warn;

/// Lowest work factor bcrypt accepts.
pub const MIN_COST: u32 = 4;
/// Highest work factor bcrypt accepts.
pub const MAX_COST: u32 = 31;
/// bcrypt only consumes the first 72 bytes of its input.
pub const MAX_PASSWORD_BYTES: usize = 72;
/// Shortest plaintext accepted by [`crate::validate_plaintext`].
pub const MIN_PASSWORD_LEN: usize = 6;
/// Length of a `$2b$` modular-crypt hash string.
pub const HASH_LEN: usize = 60;

/// Environment variable holding the default work factor.
pub const COST_VAR: &str = "BCRYPT_COST";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),
}

/// Hashing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingConfig {
    pub cost: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl HashingConfig {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore errors if file not found)
        let _ = dotenvy::dotenv();

        match std::env::var(COST_VAR) {
            Ok(raw) => Self::from_value(Some(&raw)),
            Err(std::env::VarError::NotPresent) => Self::from_value(None),
            Err(std::env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidValue(format!(
                "{} is not valid unicode",
                COST_VAR
            ))),
        }
    }

    /// Build a config from the raw value of `BCRYPT_COST`, if any.
    pub fn from_value(raw: Option<&str>) -> Result<Self, ConfigError> {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(Self::default());
        };

        let cost: u32 = raw
            .parse()
            .map_err(|_| ConfigError::ParseError(format!("{}={} is not an integer", COST_VAR, raw)))?;

        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(ConfigError::InvalidValue(format!(
                "{} must be between {} and {}, got {}",
                COST_VAR, MIN_COST, MAX_COST, cost
            )));
        }

        Ok(Self { cost })
    }
}

static DEFAULT_COST: Lazy<u32> = Lazy::new(|| match HashingConfig::load() {
    Ok(config) => config.cost,
    Err(e) => {
        warn!("{}, falling back to cost {}", e, bcrypt::DEFAULT_COST);
        bcrypt::DEFAULT_COST
    }
});

/// Work factor used when a caller does not pass one. Resolved once per process.
pub fn default_cost() -> u32 {
    *DEFAULT_COST
}
