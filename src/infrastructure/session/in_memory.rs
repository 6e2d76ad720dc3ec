//! In-memory session store

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::session::{SessionRecord, SessionStore, SessionToken};
use crate::domain::DomainError;

/// Sessions held in process memory, keyed by token digest
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, expired ones included
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, token: &SessionToken) -> Result<Option<SessionRecord>, DomainError> {
        let sessions = self.sessions.read().await;
        let now = Utc::now();

        Ok(sessions
            .get(&token.storage_key())
            .filter(|record| !record.is_expired(now))
            .cloned())
    }

    async fn save(&self, token: &SessionToken, record: SessionRecord) -> Result<(), DomainError> {
        self.sessions
            .write()
            .await
            .insert(token.storage_key(), record);
        Ok(())
    }

    async fn destroy(&self, token: &SessionToken) -> Result<(), DomainError> {
        self.sessions.write().await.remove(&token.storage_key());
        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, DomainError> {
        let mut sessions = self.sessions.write().await;
        let now = Utc::now();
        let before = sessions.len();

        sessions.retain(|_, record| !record.is_expired(now));

        Ok((before - sessions.len()) as u64)
    }
}
