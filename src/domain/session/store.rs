//! Session store trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use super::entity::SessionUser;
use super::token::SessionToken;
use crate::domain::DomainError;

/// A persisted session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub user: SessionUser,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(user: SessionUser, expires_at: DateTime<Utc>) -> Self {
        Self { user, expires_at }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Server-side storage for sessions keyed by cookie token
#[async_trait]
pub trait SessionStore: Send + Sync + Debug {
    /// Load a session; expired records are reported as absent
    async fn load(&self, token: &SessionToken) -> Result<Option<SessionRecord>, DomainError>;

    /// Insert or replace the session for a token
    async fn save(&self, token: &SessionToken, record: SessionRecord) -> Result<(), DomainError>;

    /// Remove the session for a token, if any
    async fn destroy(&self, token: &SessionToken) -> Result<(), DomainError>;

    /// Remove every expired session, returning how many were dropped
    async fn purge_expired(&self) -> Result<u64, DomainError>;
}
