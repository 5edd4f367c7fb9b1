use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Result, UserError};
use crate::users::repo::UserStore;
use crate::users::repo_types::{UserRow, UserWrite};

/// In-process store. Uniqueness is checked and the row written under one write lock.
#[derive(Default)]
pub struct MemoryUserStore {
    rows: RwLock<HashMap<Uuid, UserRow>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

fn email_taken(rows: &HashMap<Uuid, UserRow>, email: &str, except: Option<Uuid>) -> bool {
    rows.values()
        .any(|r| r.email == email && Some(r.id) != except)
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, id: Uuid, write: &UserWrite) -> Result<UserRow> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&id) {
            return Err(UserError::Internal(format!("user id {id} already present")));
        }
        if email_taken(&rows, &write.email, None) {
            return Err(UserError::DuplicateKey {
                email: write.email.clone(),
            });
        }
        let now = OffsetDateTime::now_utc();
        let row = UserRow {
            id,
            name: write.name.clone(),
            email: write.email.clone(),
            password_hash: write.password_hash.clone(),
            is_admin: write.is_admin,
            created_at: now,
            updated_at: now,
        };
        rows.insert(id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: Uuid, write: &UserWrite) -> Result<UserRow> {
        let mut rows = self.rows.write().await;
        if !rows.contains_key(&id) {
            return Err(UserError::NotFound(id));
        }
        if email_taken(&rows, &write.email, Some(id)) {
            return Err(UserError::DuplicateKey {
                email: write.email.clone(),
            });
        }
        let row = rows.get_mut(&id).ok_or(UserError::NotFound(id))?;
        row.name = write.name.clone();
        row.email = write.email.clone();
        row.password_hash = write.password_hash.clone();
        row.is_admin = write.is_admin;
        row.updated_at = OffsetDateTime::now_utc();
        Ok(row.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRow>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .find(|r| r.email == email)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(email: &str) -> UserWrite {
        UserWrite {
            name: "Ada".into(),
            email: email.into(),
            password_hash: "$argon2id$stub".into(),
            is_admin: false,
        }
    }

    #[tokio::test]
    async fn insert_then_find() {
        let store = MemoryUserStore::new();
        let id = Uuid::new_v4();
        let row = store.insert(id, &write("a@b.co")).await.unwrap();
        assert_eq!(row.created_at, row.updated_at);
        assert_eq!(store.find_by_id(id).await.unwrap().unwrap().email, "a@b.co");
        assert_eq!(store.find_by_email("a@b.co").await.unwrap().unwrap().id, id);
        assert!(store.find_by_email("x@y.zz").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_on_insert_and_update() {
        let store = MemoryUserStore::new();
        store.insert(Uuid::new_v4(), &write("a@b.co")).await.unwrap();
        let second = Uuid::new_v4();
        store.insert(second, &write("c@d.co")).await.unwrap();

        let err = store.insert(Uuid::new_v4(), &write("a@b.co")).await.unwrap_err();
        assert!(matches!(err, UserError::DuplicateKey { .. }));

        let err = store.update(second, &write("a@b.co")).await.unwrap_err();
        assert!(matches!(err, UserError::DuplicateKey { .. }));
        assert_eq!(store.find_by_id(second).await.unwrap().unwrap().email, "c@d.co");
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn update_keeps_own_email_and_bumps_updated_at() {
        let store = MemoryUserStore::new();
        let id = Uuid::new_v4();
        let before = store.insert(id, &write("a@b.co")).await.unwrap();
        let after = store.update(id, &write("a@b.co")).await.unwrap();
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at >= before.updated_at);
    }

    #[tokio::test]
    async fn update_missing_row_is_not_found() {
        let store = MemoryUserStore::new();
        let id = Uuid::new_v4();
        let err = store.update(id, &write("a@b.co")).await.unwrap_err();
        assert!(matches!(err, UserError::NotFound(missing) if missing == id));
    }
}
