//! In-memory user repository implementation

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::user::{NewUser, User, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<i64, User>,
    /// email -> user id
    email_index: HashMap<String, i64>,
    next_id: i64,
}

/// In-memory implementation of UserRepository
///
/// Both maps sit behind one lock so the uniqueness check and the insert
/// happen atomically.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    tables: RwLock<Tables>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;

        Ok(tables
            .email_index
            .get(email)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut tables = self.tables.write().await;

        if tables.email_index.contains_key(&user.email) {
            return Err(DomainError::conflict(format!(
                "Email '{}' already exists",
                user.email
            )));
        }

        tables.next_id += 1;
        let id = tables.next_id;

        let user = User::from_new(UserId::new(id), user, Utc::now());
        tables.email_index.insert(user.email().to_string(), id);
        tables.users.insert(id, user.clone());

        Ok(user)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.tables.read().await.users.len())
    }
}
