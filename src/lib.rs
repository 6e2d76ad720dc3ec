//! Account Portal
//!
//! Server-rendered account pages:
//! - Registration with field-level validation and Argon2 password hashing
//! - Email/password login backed by server-side sessions
//! - Logout that destroys the session and expires its cookie
//! - In-memory or PostgreSQL storage

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;

use std::sync::Arc;

use api::state::{AccountServiceTrait, AppState};
use api::views::HtmlViewRenderer;
use crate::config::{SessionConfig, StorageBackend};
use domain::session::SessionStore;
use infrastructure::session::{InMemorySessionStore, PostgresSessionStore, SessionTokenGenerator};
use infrastructure::storage::{connect_pool, run_storage_migrations};
use infrastructure::user::{
    AccountService, Argon2Hasher, InMemoryUserRepository, PostgresUserRepository,
};
use tracing::info;

/// Create the application state for the configured storage backend
///
/// The PostgreSQL backend connects and applies pending migrations first.
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    info!(backend = ?config.storage.backend, "Creating application state");

    match config.storage.backend {
        StorageBackend::Memory => Ok(create_in_memory_app_state(config.session.clone())),
        StorageBackend::Postgres => {
            let pool = connect_pool(&config.database).await?;
            let applied = run_storage_migrations(&pool).await?;
            info!(applied, "Storage migrations complete");

            let account_service = AccountService::new(
                Arc::new(PostgresUserRepository::new(pool.clone())),
                Arc::new(Argon2Hasher::new()),
            );

            Ok(build_state(
                Arc::new(account_service),
                Arc::new(PostgresSessionStore::new(pool)),
                config.session.clone(),
            ))
        }
    }
}

/// Application state backed entirely by process memory
pub fn create_in_memory_app_state(session_config: SessionConfig) -> AppState {
    let account_service = AccountService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(Argon2Hasher::new()),
    );

    build_state(
        Arc::new(account_service),
        Arc::new(InMemorySessionStore::new()),
        session_config,
    )
}

/// Session store for the configured backend, without building the rest of
/// the state
pub async fn create_session_store(config: &AppConfig) -> anyhow::Result<Arc<dyn SessionStore>> {
    match config.storage.backend {
        StorageBackend::Memory => Ok(Arc::new(InMemorySessionStore::new())),
        StorageBackend::Postgres => {
            let pool = connect_pool(&config.database).await?;
            Ok(Arc::new(PostgresSessionStore::new(pool)))
        }
    }
}

fn build_state(
    account_service: Arc<dyn AccountServiceTrait>,
    session_store: Arc<dyn SessionStore>,
    session_config: SessionConfig,
) -> AppState {
    AppState {
        account_service,
        session_store,
        token_generator: SessionTokenGenerator::new(),
        views: Arc::new(HtmlViewRenderer::new()),
        session_config: Arc::new(session_config),
    }
}
