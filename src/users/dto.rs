use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Input for creating a user. Absent fields are reported as validation errors, not defaulted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
}

impl NewUser {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            password: Some(password.into()),
            is_admin: None,
        }
    }
}

/// Public part of the user handed back to callers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_deserializes_with_missing_fields() {
        let input: NewUser =
            serde_json::from_str(r#"{"name":"Ada","password":"hunter22"}"#).unwrap();
        assert_eq!(input.name.as_deref(), Some("Ada"));
        assert!(input.email.is_none());
        assert!(input.is_admin.is_none());
    }

    #[test]
    fn new_user_accepts_camel_case_admin_flag() {
        let input: NewUser = serde_json::from_str(
            r#"{"name":"Ada","email":"ada@example.com","password":"x","isAdmin":true}"#,
        )
        .unwrap();
        assert_eq!(input.is_admin, Some(true));
    }

    #[test]
    fn view_serializes_in_camel_case() {
        let now = OffsetDateTime::now_utc();
        let view = UserView {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            is_admin: false,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("\"isAdmin\":false"));
        assert!(json.contains("createdAt"));
        assert!(json.contains("ada@example.com"));
    }
}
