//! PostgreSQL user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::domain::user::{NewUser, User, UserId, UserRepository};
use crate::domain::DomainError;

const USER_COLUMNS: &str =
    "id, given_name, family_name, nickname, email, city, state, password_hash, created_at";

/// PostgreSQL implementation of UserRepository
///
/// Email uniqueness is enforced by the `users_email_key` constraint.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user by email: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (given_name, family_name, nickname, email, city, state, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, created_at
            "#,
        )
        .bind(&user.given_name)
        .bind(&user.family_name)
        .bind(&user.nickname)
        .bind(&user.email)
        .bind(user.city.as_deref())
        .bind(user.state.as_deref())
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| insert_error(e, &user.email))?;

        let id: i64 = column(&row, "id")?;
        let created_at: DateTime<Utc> = column(&row, "created_at")?;

        Ok(User::from_new(UserId::new(id), user, created_at))
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count as usize)
    }
}

fn insert_error(error: sqlx::Error, email: &str) -> DomainError {
    let duplicate = error
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());

    if duplicate {
        DomainError::conflict(format!("Email '{}' already exists", email))
    } else {
        DomainError::storage(format!("Failed to create user: {}", error))
    }
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| DomainError::storage(format!("Invalid '{}' column in users: {}", name, e)))
}

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    let user = NewUser {
        given_name: column(row, "given_name")?,
        family_name: column(row, "family_name")?,
        nickname: column(row, "nickname")?,
        email: column(row, "email")?,
        city: column(row, "city")?,
        state: column(row, "state")?,
        password_hash: column(row, "password_hash")?,
    };

    Ok(User::from_new(
        UserId::new(column(row, "id")?),
        user,
        column(row, "created_at")?,
    ))
}
