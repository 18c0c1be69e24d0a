use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Role, User, UserDraft};
use crate::database::store::UserStore;

/// In-memory [`UserStore`] so engine behavior is testable without a
/// running database. Mirrors the Postgres semantics the engine relies on,
/// including the email uniqueness constraint.
pub struct MemoryStore {
    users: Mutex<HashMap<Uuid, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let users = self.users.lock().unwrap();
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, DatabaseError> {
        let users = self.users.lock().unwrap();
        Ok(users.values().cloned().collect())
    }

    async fn find_children(&self, parent_id: Uuid) -> Result<Vec<User>, DatabaseError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .values()
            .filter(|u| u.parent_id == Some(parent_id))
            .cloned()
            .collect())
    }

    async fn insert(&self, draft: UserDraft) -> Result<User, DatabaseError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == draft.email) {
            return Err(DatabaseError::UniqueViolation("users.email"));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: draft.name,
            surname: draft.surname,
            email: draft.email,
            password_hash: draft.password_hash,
            role: draft.role,
            parent_id: draft.parent_id,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn set_parent(&self, id: Uuid, new_parent: Uuid) -> Result<User, DatabaseError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(&id)
            .ok_or(DatabaseError::Sqlx(sqlx::Error::RowNotFound))?;
        user.parent_id = Some(new_parent);
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn promote_if_regular(&self, id: Uuid) -> Result<(), DatabaseError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.get_mut(&id) {
            if user.role == Role::Regular {
                user.role = Role::Boss;
                user.updated_at = Utc::now();
            }
        }
        Ok(())
    }
}
