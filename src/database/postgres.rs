use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{User, UserDraft};
use crate::database::store::UserStore;

const USER_COLUMNS: &str =
    "id, name, surname, email, password_hash, role, parent_id, created_at, updated_at";

/// sqlx-backed implementation of [`UserStore`] over the `users` table.
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_all(&self) -> Result<Vec<User>, DatabaseError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn find_children(&self, parent_id: Uuid) -> Result<Vec<User>, DatabaseError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE parent_id = $1 ORDER BY created_at"
        ))
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn insert(&self, draft: UserDraft) -> Result<User, DatabaseError> {
        let result = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, name, surname, email, password_hash, role, parent_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&draft.name)
        .bind(&draft.surname)
        .bind(&draft.email)
        .bind(&draft.password_hash)
        .bind(draft.role)
        .bind(draft.parent_id)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            // The email uniqueness constraint is the backstop for
            // concurrent registrations with the same address
            Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some("23505") => {
                Err(DatabaseError::UniqueViolation("users.email"))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn set_parent(&self, id: Uuid, new_parent: Uuid) -> Result<User, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET parent_id = $2, updated_at = now() WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(new_parent)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn promote_if_regular(&self, id: Uuid) -> Result<(), DatabaseError> {
        sqlx::query(
            "UPDATE users SET role = 'BOSS', updated_at = now() \
             WHERE id = $1 AND role = 'REGULAR'",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
