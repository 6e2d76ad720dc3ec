//! Database migrations infrastructure

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use tracing::info;

use crate::domain::DomainError;

/// Trait for running database migrations
#[async_trait]
pub trait Migrator: Send + Sync {
    /// Runs all pending migrations, returning how many were applied
    async fn run(&self) -> Result<usize, DomainError>;

    /// Reverts the last applied migration, returning its version
    async fn revert(&self) -> Result<Option<i64>, DomainError>;

    /// Returns the current migration version
    async fn version(&self) -> Result<Option<i64>, DomainError>;
}

/// PostgreSQL migrator with a `_migrations` bookkeeping table
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
    migrations: Vec<Migration>,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self::with_migrations(pool, storage_migrations())
    }

    pub fn with_migrations(pool: PgPool, migrations: Vec<Migration>) -> Self {
        Self { pool, migrations }
    }

    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

        Ok(())
    }

    /// Returns all applied migration versions
    pub async fn applied_versions(&self) -> Result<Vec<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        sqlx::query_scalar("SELECT version FROM _migrations ORDER BY version")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get applied migrations: {}", e)))
    }

    /// Applies one migration and records it in the same transaction
    async fn apply(&self, migration: &Migration) -> Result<(), DomainError> {
        let failed = |e: sqlx::Error| {
            DomainError::storage(format!(
                "Failed to run migration {}: {}",
                migration.version, e
            ))
        };

        let mut tx = self.pool.begin().await.map_err(failed)?;

        sqlx::Executor::execute(&mut *tx, sqlx::raw_sql(&migration.up))
            .await
            .map_err(failed)?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(&migration.description)
            .execute(&mut *tx)
            .await
            .map_err(failed)?;

        tx.commit().await.map_err(failed)
    }

    async fn unapply(&self, migration: &Migration) -> Result<(), DomainError> {
        let failed = |e: sqlx::Error| {
            DomainError::storage(format!(
                "Failed to revert migration {}: {}",
                migration.version, e
            ))
        };

        let mut tx = self.pool.begin().await.map_err(failed)?;

        sqlx::Executor::execute(&mut *tx, sqlx::raw_sql(&migration.down))
            .await
            .map_err(failed)?;

        sqlx::query("DELETE FROM _migrations WHERE version = $1")
            .bind(migration.version)
            .execute(&mut *tx)
            .await
            .map_err(failed)?;

        tx.commit().await.map_err(failed)
    }
}

#[async_trait]
impl Migrator for PostgresMigrator {
    async fn run(&self) -> Result<usize, DomainError> {
        let applied = self.applied_versions().await?;
        let mut count = 0;

        for migration in pending(&self.migrations, &applied) {
            self.apply(migration).await?;
            info!(
                version = migration.version,
                description = %migration.description,
                "Applied migration"
            );
            count += 1;
        }

        Ok(count)
    }

    async fn revert(&self) -> Result<Option<i64>, DomainError> {
        let Some(version) = self.version().await? else {
            return Ok(None);
        };

        let migration = self
            .migrations
            .iter()
            .find(|m| m.version == version)
            .ok_or_else(|| {
                DomainError::storage(format!("Unknown applied migration version {}", version))
            })?;

        self.unapply(migration).await?;
        info!(version, "Reverted migration");

        Ok(Some(version))
    }

    async fn version(&self) -> Result<Option<i64>, DomainError> {
        Ok(self.applied_versions().await?.last().copied())
    }
}

/// Represents a database migration
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub description: String,
    /// SQL to run when applying the migration
    pub up: String,
    /// SQL to run when reverting the migration
    pub down: String,
}

impl Migration {
    pub fn new(
        version: i64,
        description: impl Into<String>,
        up: impl Into<String>,
        down: impl Into<String>,
    ) -> Self {
        Self {
            version,
            description: description.into(),
            up: up.into(),
            down: down.into(),
        }
    }
}

fn pending<'a>(migrations: &'a [Migration], applied: &'a [i64]) -> impl Iterator<Item = &'a Migration> {
    migrations
        .iter()
        .filter(move |migration| !applied.contains(&migration.version))
}

/// Schema for users and sessions
pub fn storage_migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "Create users table",
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id BIGSERIAL PRIMARY KEY,
                given_name TEXT NOT NULL,
                family_name TEXT NOT NULL,
                nickname TEXT NOT NULL,
                email TEXT NOT NULL,
                city TEXT,
                state TEXT,
                password_hash TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT users_email_key UNIQUE (email)
            );
            "#,
            r#"
            DROP TABLE IF EXISTS users;
            "#,
        ),
        Migration::new(
            2,
            "Create sessions table",
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                token_hash CHAR(64) PRIMARY KEY,
                data JSONB NOT NULL,
                expires_at TIMESTAMPTZ NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions(expires_at);
            "#,
            r#"
            DROP TABLE IF EXISTS sessions;
            "#,
        ),
    ]
}

/// Runs all pending storage migrations
pub async fn run_storage_migrations(pool: &PgPool) -> Result<usize, DomainError> {
    PostgresMigrator::new(pool.clone()).run().await
}
