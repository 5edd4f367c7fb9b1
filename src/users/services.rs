use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::error::{Result, UserError};
use crate::users::dto::NewUser;
use crate::users::password::CredentialHasher;
use crate::users::record::{normalize_email, Password, UserRecord};
use crate::users::repo::UserStore;
use crate::users::repo_types::UserWrite;

/// Write path for user records: every create or save hashes a modified password
/// before the store sees it.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    hasher: Arc<dyn CredentialHasher>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { store, hasher }
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: NewUser) -> Result<UserRecord> {
        let mut record =
            UserRecord::new(input).inspect_err(|e| warn!(error = %e, "invalid new user"))?;
        self.persist(&mut record).await?;
        Ok(record)
    }

    pub async fn save(&self, record: &mut UserRecord) -> Result<()> {
        self.persist(record).await
    }

    /// Validates, normalizes the password, then writes. On success `record` mirrors the stored row.
    /// On failure `record` is left untouched, so a pending plaintext stays pending.
    #[instrument(skip(self, record), fields(user_id = ?record.id()))]
    pub async fn persist(&self, record: &mut UserRecord) -> Result<()> {
        let email = record
            .validate()
            .inspect_err(|e| warn!(error = %e, "user failed validation"))?;
        let password_hash = self.normalize_password(record.password()).await?;

        let write = UserWrite {
            name: record.name.clone(),
            email,
            password_hash,
            is_admin: record.is_admin,
        };

        let row = match record.id() {
            None => self.store.insert(Uuid::new_v4(), &write).await,
            Some(id) => self.store.update(id, &write).await,
        }
        .inspect_err(|e| match e {
            UserError::DuplicateKey { email } => warn!(email = %email, "email already registered"),
            other => error!(error = %other, "user write failed"),
        })?;

        info!(user_id = %row.id, email = %row.email, "user persisted");
        *record = UserRecord::from_row(row);
        Ok(())
    }

    /// Returns the hash to store: the existing one when unmodified, a fresh salted hash otherwise.
    async fn normalize_password(&self, password: &Password) -> Result<String> {
        let plain = match password {
            Password::Hashed(hash) => {
                debug!("password unchanged, skipping hash");
                return Ok(hash.clone());
            }
            Password::Plain(plain) => plain.clone(),
        };

        let hasher = Arc::clone(&self.hasher);
        let hash = tokio::task::spawn_blocking(move || hasher.hash_password(&plain))
            .await
            .map_err(|e| {
                error!(error = %e, "hash task failed");
                UserError::Internal(format!("hash task failed: {e}"))
            })?
            .map_err(|e| {
                error!(error = %e, "hash_password failed");
                UserError::Internal(format!("password hashing failed: {e}"))
            })?;
        debug!("password hashed");
        Ok(hash)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>> {
        Ok(self.store.find_by_id(id).await?.map(UserRecord::from_row))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let email = normalize_email(email);
        Ok(self.store.find_by_email(&email).await?.map(UserRecord::from_row))
    }
}
