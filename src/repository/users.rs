//! Users repository

use chrono::{DateTime, Utc};
use sqlx::postgres::PgExecutor;
use uuid::Uuid;

use crate::domain::{DomainError, User, UserId};
use crate::error::AppResult;

type UserRow = (Uuid, String, String, DateTime<Utc>, DateTime<Utc>);

fn user_from_row((id, email, password_hash, created_at, updated_at): UserRow) -> User {
    User::new(
        UserId::from_uuid(id),
        email,
        password_hash,
        created_at,
        updated_at,
    )
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UsersRepository;

impl UsersRepository {
    pub async fn get_by_email<'e>(&self, db: impl PgExecutor<'e>, email: &str) -> AppResult<User> {
        const QUERY: &str = r#"
            SELECT id, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
        "#;

        let row: Option<UserRow> = sqlx::query_as(QUERY).bind(email).fetch_optional(db).await?;

        row.map(user_from_row)
            .ok_or_else(|| DomainError::UserNotFound(email.to_string()).into())
    }

    pub async fn get_by_id<'e>(&self, db: impl PgExecutor<'e>, user_id: UserId) -> AppResult<User> {
        const QUERY: &str = r#"
            SELECT id, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
        "#;

        let row: Option<UserRow> = sqlx::query_as(QUERY)
            .bind(user_id)
            .fetch_optional(db)
            .await?;

        row.map(user_from_row)
            .ok_or_else(|| DomainError::UserNotFound(user_id.to_string()).into())
    }

    /// Upsert by id.
    pub async fn save<'e>(&self, db: impl PgExecutor<'e>, user: &User) -> AppResult<()> {
        const QUERY: &str = r#"
            INSERT INTO users (id, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET
                email = EXCLUDED.email,
                password_hash = EXCLUDED.password_hash,
                updated_at = EXCLUDED.updated_at
        "#;

        sqlx::query(QUERY)
            .bind(user.id())
            .bind(user.email())
            .bind(user.password_hash())
            .bind(user.created_at())
            .bind(user.updated_at())
            .execute(db)
            .await?;

        Ok(())
    }

    pub async fn exists_by_email<'e>(
        &self,
        db: impl PgExecutor<'e>,
        email: &str,
    ) -> AppResult<bool> {
        const QUERY: &str = "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)";

        let exists: bool = sqlx::query_scalar(QUERY).bind(email).fetch_one(db).await?;

        Ok(exists)
    }
}
