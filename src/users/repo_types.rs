use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User row as stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // never exposed in JSON
    pub is_admin: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// What the store is asked to write. The password is already hashed by the time
/// one of these exists.
#[derive(Debug, Clone)]
pub struct UserWrite {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}
