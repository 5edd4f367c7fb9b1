use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("duplicate key: a user with email {email} already exists")]
    DuplicateKey { email: String },

    #[error("user {0} not found")]
    NotFound(Uuid),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl UserError {
    pub fn validation(msg: impl Into<String>) -> Self {
        UserError::Validation(msg.into())
    }
}

pub type Result<T, E = UserError> = std::result::Result<T, E>;
