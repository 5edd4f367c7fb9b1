use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{Result, UserError};
use crate::users::dto::{NewUser, UserView};
use crate::users::repo_types::UserRow;

/// Password field of a record.
///
/// `Plain` means the value was set since the last successful write and still has to be hashed.
/// `Hashed` is exactly what the store holds.
#[derive(Clone, PartialEq, Eq)]
pub enum Password {
    Plain(String),
    Hashed(String),
}

impl Password {
    pub fn is_modified(&self) -> bool {
        matches!(self, Password::Plain(_))
    }

    pub fn hash(&self) -> Option<&str> {
        match self {
            Password::Hashed(h) => Some(h),
            Password::Plain(_) => None,
        }
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Password::Plain(_) => f.write_str("Plain(<redacted>)"),
            Password::Hashed(h) => f.debug_tuple("Hashed").field(h).finish(),
        }
    }
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn required(field: &'static str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(UserError::validation(format!("{field} is required"))),
    }
}

#[derive(Debug, Clone)]
pub struct UserRecord {
    id: Option<Uuid>,
    pub name: String,
    pub email: String,
    password: Password,
    pub is_admin: bool,
    created_at: Option<OffsetDateTime>,
    updated_at: Option<OffsetDateTime>,
}

impl UserRecord {
    /// Builds an unsaved record. The password starts out modified.
    pub fn new(input: NewUser) -> Result<Self> {
        let name = required("name", input.name)?;
        let email = required("email", input.email)?;
        let password = required("password", input.password)?;
        Ok(Self {
            id: None,
            name,
            email,
            password: Password::Plain(password),
            is_admin: input.is_admin.unwrap_or(false),
            created_at: None,
            updated_at: None,
        })
    }

    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    pub fn password(&self) -> &Password {
        &self.password
    }

    /// Stored hash; `None` while a new plaintext is pending.
    pub fn password_hash(&self) -> Option<&str> {
        self.password.hash()
    }

    pub fn is_password_modified(&self) -> bool {
        self.password.is_modified()
    }

    /// Replaces the password. The next save hashes it.
    pub fn set_password(&mut self, plain: impl Into<String>) {
        self.password = Password::Plain(plain.into());
    }

    pub fn created_at(&self) -> Option<OffsetDateTime> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<OffsetDateTime> {
        self.updated_at
    }

    /// Checks required fields and returns the normalized email to write.
    pub(crate) fn validate(&self) -> Result<String> {
        if self.name.trim().is_empty() {
            return Err(UserError::validation("name is required"));
        }
        let email = normalize_email(&self.email);
        if email.is_empty() {
            return Err(UserError::validation("email is required"));
        }
        if !is_valid_email(&email) {
            return Err(UserError::validation(format!("invalid email: {email}")));
        }
        let blank = match &self.password {
            Password::Plain(p) => p.trim().is_empty(),
            Password::Hashed(h) => h.is_empty(),
        };
        if blank {
            return Err(UserError::validation("password is required"));
        }
        Ok(email)
    }

    pub fn view(&self) -> Option<UserView> {
        Some(UserView {
            id: self.id?,
            name: self.name.clone(),
            email: self.email.clone(),
            is_admin: self.is_admin,
            created_at: self.created_at?,
            updated_at: self.updated_at?,
        })
    }
}

impl UserRecord {
    /// Wraps a row read back from the store. Crate-only: the hash must have come from the store.
    pub(crate) fn from_row(row: UserRow) -> Self {
        Self {
            id: Some(row.id),
            name: row.name,
            email: row.email,
            password: Password::Hashed(row.password_hash),
            is_admin: row.is_admin,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> UserRow {
        let now = OffsetDateTime::now_utc();
        UserRow {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: "$argon2id$v=19$stub".into(),
            is_admin: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn new_record_is_unsaved_with_pending_password() {
        let record = UserRecord::new(NewUser::new("Ada", "ada@example.com", "s3cret!!")).unwrap();
        assert!(record.is_new());
        assert!(record.is_password_modified());
        assert!(record.password_hash().is_none());
        assert!(!record.is_admin);
        assert!(record.view().is_none());
    }

    #[test]
    fn missing_fields_are_rejected() {
        for input in [
            NewUser { email: None, ..NewUser::new("Ada", "a@b.co", "pw") },
            NewUser { name: Some("   ".into()), ..NewUser::new("Ada", "a@b.co", "pw") },
            NewUser { password: None, ..NewUser::new("Ada", "a@b.co", "pw") },
        ] {
            let err = UserRecord::new(input).unwrap_err();
            assert!(matches!(err, UserError::Validation(_)), "got {err:?}");
        }
    }

    #[test]
    fn loaded_record_is_unmodified() {
        let row = row();
        let hash = row.password_hash.clone();
        let mut record = UserRecord::from_row(row);
        assert!(!record.is_password_modified());
        assert_eq!(record.password_hash(), Some(hash.as_str()));
        assert!(record.view().is_some());

        record.set_password("another one");
        assert!(record.is_password_modified());
        assert!(record.password_hash().is_none());
    }

    #[test]
    fn validate_normalizes_and_checks_email() {
        let mut record = UserRecord::new(NewUser::new("Ada", "  Ada@Example.COM ", "pw")).unwrap();
        assert_eq!(record.validate().unwrap(), "ada@example.com");

        record.email = "not-an-email".into();
        assert!(matches!(record.validate(), Err(UserError::Validation(_))));

        record.email = "ada@example.com".into();
        record.name = String::new();
        assert!(matches!(record.validate(), Err(UserError::Validation(_))));

        record.name = "Ada".into();
        record.set_password(" \t ");
        assert!(matches!(record.validate(), Err(UserError::Validation(_))));
    }

    #[test]
    fn debug_output_redacts_plaintext() {
        let record = UserRecord::new(NewUser::new("Ada", "ada@example.com", "topsecret")).unwrap();
        let dbg = format!("{record:?}");
        assert!(!dbg.contains("topsecret"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn email_regex() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.de"));
    }
}
