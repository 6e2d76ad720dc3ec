//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{NewUser, User};
use crate::domain::DomainError;

/// Repository trait for user storage
///
/// Implementations must guarantee email uniqueness at insert time and report
/// a violation as [`DomainError::Conflict`]. The account workflow relies on
/// that guarantee when two registrations for the same email race.
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by their email address (for login)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Insert a new user, returning it with its generated ID
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Count stored users
    async fn count(&self) -> Result<usize, DomainError>;

    /// Check if an email is already registered
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}
