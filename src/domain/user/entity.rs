//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-generated numeric user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user record that has not been stored yet
#[derive(Debug, Clone)]
pub struct NewUser {
    pub given_name: String,
    pub family_name: String,
    pub nickname: String,
    pub email: String,
    pub city: Option<String>,
    pub state: Option<String>,
    /// Argon2 PHC string, never plaintext
    pub password_hash: String,
}

/// Stored user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    given_name: String,
    family_name: String,
    nickname: String,
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<String>,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing, default)]
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl User {
    /// Build the stored form of a new user once the store has assigned an id
    pub fn from_new(id: UserId, user: NewUser, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            given_name: user.given_name,
            family_name: user.family_name,
            nickname: user.nickname,
            email: user.email,
            city: user.city,
            state: user.state,
            password_hash: user.password_hash,
            created_at,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn given_name(&self) -> &str {
        &self.given_name
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
