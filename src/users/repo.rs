use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::error::{Result, UserError};
use crate::users::repo_types::{UserRow, UserWrite};

/// Raw persistence for user rows. Implementations own email uniqueness.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new row; the store stamps both timestamps.
    async fn insert(&self, id: Uuid, write: &UserWrite) -> Result<UserRow>;
    /// Overwrite an existing row and refresh `updated_at`.
    async fn update(&self, id: Uuid, write: &UserWrite) -> Result<UserRow>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRow>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRow>>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn map_write_error(e: sqlx::Error, email: &str) -> UserError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            warn!(email = %email, constraint = ?db_err.constraint(), "unique violation");
            return UserError::DuplicateKey {
                email: email.to_string(),
            };
        }
    }
    UserError::Database(e)
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, id: Uuid, write: &UserWrite) -> Result<UserRow> {
        sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, name, email, password_hash, is_admin)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, is_admin, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&write.name)
        .bind(&write.email)
        .bind(&write.password_hash)
        .bind(write.is_admin)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_write_error(e, &write.email))
    }

    async fn update(&self, id: Uuid, write: &UserWrite) -> Result<UserRow> {
        sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
               SET name = $2, email = $3, password_hash = $4, is_admin = $5, updated_at = now()
             WHERE id = $1
            RETURNING id, name, email, password_hash, is_admin, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&write.name)
        .bind(&write.email)
        .bind(&write.password_hash)
        .bind(write.is_admin)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| map_write_error(e, &write.email))?
        .ok_or(UserError::NotFound(id))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRow>> {
        let user = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, is_admin, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        let user = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, is_admin, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }
}
