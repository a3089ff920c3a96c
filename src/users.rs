//! User management module
//!
//! A record type carrying [`Password`] fields and an in-memory store that
//! persists only the hash, the way a database-backed store would.

use crate::error::PasswordError;
use crate::password::{validate_plaintext, validate_plaintext_len, Password};
use crate::storage::{StorageValue, TryReadString};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Sign-up payload. Passwords are hashed while the body is deserialized.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(custom(function = "validate_plaintext"))]
    pub password: Password,
    #[serde(default)]
    #[validate(custom(function = "validate_plaintext"))]
    pub recovery_password: Option<Password>,
}

/// User model
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password: Password,
    pub recovery_password: Option<Password>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User response (without password material)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub has_password: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        UserResponse {
            id: user.id,
            email: user.email.clone(),
            has_password: user.password.is_set(),
            created_at: user.created_at,
        }
    }
}

/// A user as it sits in storage: password columns hold raw values only.
#[derive(Debug, Clone)]
struct UserRow {
    id: Uuid,
    email: String,
    password: StorageValue,
    recovery_password: StorageValue,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn from_user(user: &User) -> Self {
        UserRow {
            id: user.id,
            email: user.email.clone(),
            password: user.password.to_storage_value(),
            recovery_password: user
                .recovery_password
                .as_ref()
                .map_or(StorageValue::Null, Password::to_storage_value),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }

    fn to_user(&self) -> User {
        let mut password = Password::new();
        password.load_from_storage(&self.password);

        let recovery_password = (!self.recovery_password.is_absent()).then(|| {
            let mut recovery = Password::new();
            recovery.load_from_storage(&self.recovery_password);
            recovery
        });

        User {
            id: self.id,
            email: self.email.clone(),
            password,
            recovery_password,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// In-memory user store
pub struct UserStore {
    users: Arc<RwLock<HashMap<Uuid, UserRow>>>,
    email_index: Arc<RwLock<HashMap<String, Uuid>>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            email_index: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a new user
    ///
    /// The returned record still carries the submitted plaintext so it can be
    /// echoed back once. Records read back from the store never do.
    pub async fn create(&self, new_user: NewUser) -> Result<User, UserError> {
        new_user.validate()?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email,
            password: new_user.password,
            recovery_password: new_user.recovery_password,
            created_at: now,
            updated_at: now,
        };

        self.insert(&user).await?;
        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    async fn insert(&self, user: &User) -> Result<(), UserError> {
        let mut users = self.users.write().await;
        let mut email_index = self.email_index.write().await;

        // Check if email already exists
        if email_index.contains_key(&user.email) {
            return Err(UserError::Conflict("Email already registered".to_string()));
        }

        email_index.insert(user.email.clone(), user.id);
        users.insert(user.id, UserRow::from_user(user));

        Ok(())
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        // Release the index guard before locking `users`; `insert` locks `users` first.
        let id = *self.email_index.read().await.get(email)?;
        self.find_by_id(id).await
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: Uuid) -> Option<User> {
        let users = self.users.read().await;
        users.get(&id).map(UserRow::to_user)
    }

    /// List all users
    pub async fn list(&self) -> Vec<UserResponse> {
        let users = self.users.read().await;
        users
            .values()
            .map(|row| UserResponse::from(&row.to_user()))
            .collect()
    }

    /// Check credentials. Unknown users and wrong passwords look the same.
    pub async fn authenticate(&self, email: &str, candidate: &str) -> Option<User> {
        let user = self.find_by_email(email).await?;
        if user.password.verify_blocking(candidate).await {
            Some(user)
        } else {
            None
        }
    }

    /// Replace a user's password. An empty `password` removes it, after
    /// which the user can no longer authenticate.
    pub async fn change_password(&self, id: Uuid, password: &str) -> Result<User, UserError> {
        let user = self
            .find_by_id(id)
            .await
            .ok_or_else(|| UserError::NotFound("User not found".to_string()))?;

        validate_plaintext_len(password).map_err(|e| {
            let mut errors = validator::ValidationErrors::new();
            errors.add("password", e);
            UserError::Validation(errors)
        })?;

        let updated = user
            .password
            .update_blocking(password.to_owned(), None)
            .await?;

        let mut users = self.users.write().await;
        let row = users
            .get_mut(&id)
            .ok_or_else(|| UserError::NotFound("User not found".to_string()))?;

        row.password = updated.to_storage_value();
        row.updated_at = Utc::now();
        info!(user_id = %id, cleared = !updated.is_set(), "Password changed");

        Ok(row.to_user())
    }

    /// Insert a user at startup with a known password.
    ///
    /// Panics if the password cannot be hashed; only call with fixed seed data.
    pub async fn seed(&self, email: &str, password: &str) -> Result<User, UserError> {
        let mut seeded = Password::new();
        seeded.update_or_abort(password, None);

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password: seeded,
            recovery_password: None,
            created_at: now,
            updated_at: now,
        };

        self.insert(&user).await?;
        Ok(user)
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
