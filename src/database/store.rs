use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{User, UserDraft};

/// Persistence seam for the hierarchy engine. All lookups are exact-match;
/// `find_children` returns direct children only (one hop).
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn find_all(&self) -> Result<Vec<User>, DatabaseError>;

    async fn find_children(&self, parent_id: Uuid) -> Result<Vec<User>, DatabaseError>;

    async fn insert(&self, draft: UserDraft) -> Result<User, DatabaseError>;

    async fn set_parent(&self, id: Uuid, new_parent: Uuid) -> Result<User, DatabaseError>;

    /// Promote the user to BOSS if (and only if) they are currently
    /// REGULAR. The single implicit role mutation in the system; a no-op
    /// for ADMIN and BOSS users.
    async fn promote_if_regular(&self, id: Uuid) -> Result<(), DatabaseError>;
}
