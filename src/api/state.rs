//! Application state for shared services

use std::sync::Arc;

use crate::config::SessionConfig;
use crate::domain::account::{AccountOutcome, LoginForm, RegistrationForm};
use crate::domain::session::{Session, SessionStore};
use crate::domain::user::UserRepository;
use crate::domain::DomainError;
use crate::infrastructure::session::SessionTokenGenerator;
use crate::infrastructure::user::{AccountService, PasswordHasher};

use super::views::ViewRenderer;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<dyn AccountServiceTrait>,
    pub session_store: Arc<dyn SessionStore>,
    pub token_generator: SessionTokenGenerator,
    pub views: Arc<dyn ViewRenderer>,
    pub session_config: Arc<SessionConfig>,
}

/// Trait for account workflow operations
#[async_trait::async_trait]
pub trait AccountServiceTrait: Send + Sync {
    async fn register(
        &self,
        form: RegistrationForm,
        session: Session,
    ) -> Result<AccountOutcome, DomainError>;
    async fn authenticate(
        &self,
        form: LoginForm,
        session: Session,
    ) -> Result<AccountOutcome, DomainError>;
    fn logout(&self, session: Session) -> AccountOutcome;
    async fn user_count(&self) -> Result<usize, DomainError>;
}

#[async_trait::async_trait]
impl<R, H> AccountServiceTrait for AccountService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn register(
        &self,
        form: RegistrationForm,
        session: Session,
    ) -> Result<AccountOutcome, DomainError> {
        AccountService::register(self, form, session).await
    }

    async fn authenticate(
        &self,
        form: LoginForm,
        session: Session,
    ) -> Result<AccountOutcome, DomainError> {
        AccountService::authenticate(self, form, session).await
    }

    fn logout(&self, session: Session) -> AccountOutcome {
        AccountService::logout(self, session)
    }

    async fn user_count(&self) -> Result<usize, DomainError> {
        AccountService::user_count(self).await
    }
}
