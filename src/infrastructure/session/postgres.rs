//! PostgreSQL session store

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::domain::session::{SessionRecord, SessionStore, SessionToken, SessionUser};
use crate::domain::DomainError;

/// Sessions in the `sessions` table, keyed by token digest with a JSONB payload
#[derive(Debug, Clone)]
pub struct PostgresSessionStore {
    pool: PgPool,
}

impl PostgresSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PostgresSessionStore {
    async fn load(&self, token: &SessionToken) -> Result<Option<SessionRecord>, DomainError> {
        let row: Option<(Json<SessionUser>, chrono::DateTime<chrono::Utc>)> = sqlx::query_as(
            r#"
            SELECT data, expires_at
            FROM sessions
            WHERE token_hash = $1 AND expires_at > NOW()
            "#,
        )
        .bind(token.storage_key())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to load session: {}", e)))?;

        Ok(row.map(|(Json(user), expires_at)| SessionRecord::new(user, expires_at)))
    }

    async fn save(&self, token: &SessionToken, record: SessionRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (token_hash, data, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (token_hash)
            DO UPDATE SET data = EXCLUDED.data, expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(token.storage_key())
        .bind(Json(&record.user))
        .bind(record.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to save session: {}", e)))?;

        Ok(())
    }

    async fn destroy(&self, token: &SessionToken) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token.storage_key())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to destroy session: {}", e)))?;

        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to purge sessions: {}", e)))?;

        Ok(result.rows_affected())
    }
}
