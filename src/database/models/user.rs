use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Reporting-structure role. REGULAR users are leaves, BOSS users have at
/// least one direct subordinate, ADMIN users are roots with no parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Boss,
    Regular,
}

/// Full user row as stored. `password_hash` never leaves the database
/// layer except for credential verification; everything returned to a
/// caller goes through [`PublicUser`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub surname: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Credential-stripped projection applied at every store-to-caller
/// boundary. Does not carry the hash at all, so no serializer can leak it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub surname: Option<String>,
    pub email: String,
    pub role: Role,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            surname: user.surname,
            email: user.email,
            role: user.role,
            parent_id: user.parent_id,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Insert shape for a new user. The hash is produced by the credential
/// service before the draft reaches the store.
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub name: String,
    pub surname: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub parent_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_projection_drops_credential() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            surname: None,
            email: "ada@example.com".to_string(),
            password_hash: "$2b$04$secret".to_string(),
            role: Role::Regular,
            parent_id: Some(Uuid::new_v4()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let public = PublicUser::from(user.clone());
        let json = serde_json::to_value(&public).unwrap();

        assert_eq!(json["email"], "ada@example.com");
        assert_eq!(json["role"], "REGULAR");
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(public.parent_id, user.parent_id);
    }

    #[test]
    fn role_serializes_screaming_case() {
        assert_eq!(serde_json::to_value(Role::Admin).unwrap(), "ADMIN");
        assert_eq!(serde_json::to_value(Role::Boss).unwrap(), "BOSS");
        assert_eq!(serde_json::to_value(Role::Regular).unwrap(), "REGULAR");
    }
}
