use std::collections::{HashSet, VecDeque};

use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{PublicUser, Role, UserDraft};
use crate::database::store::UserStore;
use crate::services::credentials::{self, CredentialError};

#[derive(Debug, Error)]
pub enum HierarchyError {
    #[error("invalid hierarchy: {0}")]
    InvalidHierarchy(&'static str),

    #[error("unknown parent: {0}")]
    UnknownParent(Uuid),

    #[error("unknown user: {0}")]
    UnknownUser(Uuid),

    #[error("unknown caller: {0}")]
    UnknownCaller(Uuid),

    #[error("no account for email")]
    UnknownEmail,

    #[error("an account with this email already exists")]
    DuplicateEmail,

    #[error("only the direct boss may reassign a subordinate")]
    NotOwner,

    #[error("wrong password")]
    BadCredential,

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Store(#[from] DatabaseError),
}

/// Candidate account, as accepted from registration.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub surname: Option<String>,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub parent_id: Option<Uuid>,
}

/// The hierarchy-aware access control engine. Owns the rules that shape
/// the reporting tree: role/parent admissibility on creation, the implicit
/// REGULAR to BOSS promotion, role-scoped subtree visibility, and boss
/// reassignment with ownership checks.
pub struct HierarchyService<S> {
    store: S,
}

impl<S: UserStore> HierarchyService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Register a new account.
    ///
    /// ADMIN accounts must have no parent; every other role must have one,
    /// and the parent must exist. A REGULAR parent gains its first
    /// subordinate here and is promoted to BOSS just before the insert.
    pub async fn create_user(&self, new_user: NewUser) -> Result<PublicUser, HierarchyError> {
        let parent = match (new_user.role, new_user.parent_id) {
            (Role::Admin, Some(_)) => {
                return Err(HierarchyError::InvalidHierarchy(
                    "an administrator cannot have a parent",
                ));
            }
            (Role::Admin, None) => None,
            (_, None) => {
                return Err(HierarchyError::InvalidHierarchy(
                    "a parent is required for non-administrator accounts",
                ));
            }
            (_, Some(parent_id)) => Some(
                self.store
                    .find_by_id(parent_id)
                    .await?
                    .ok_or(HierarchyError::UnknownParent(parent_id))?,
            ),
        };

        if self.store.find_by_email(&new_user.email).await?.is_some() {
            return Err(HierarchyError::DuplicateEmail);
        }

        // Promotion must be committed before the insert so a boss never
        // shows as REGULAR while already having a child.
        if let Some(parent) = parent.as_ref().filter(|p| p.role == Role::Regular) {
            self.store.promote_if_regular(parent.id).await?;
            debug!(parent = %parent.id, "promoted parent to BOSS");
        }

        let password_hash = credentials::hash_password(&new_user.password).await?;
        let draft = UserDraft {
            name: new_user.name,
            surname: new_user.surname,
            email: new_user.email,
            password_hash,
            role: new_user.role,
            parent_id: new_user.parent_id,
        };

        match self.store.insert(draft).await {
            Ok(user) => Ok(user.into()),
            // Lost a race on the email uniqueness constraint
            Err(DatabaseError::UniqueViolation(_)) => Err(HierarchyError::DuplicateEmail),
            Err(e) => {
                if let Some(parent) = parent {
                    // The promotion above has already been committed;
                    // compensating rollback is out of scope
                    error!(parent = %parent.id, error = %e, "insert failed after parent promotion");
                }
                Err(e.into())
            }
        }
    }

    /// The set of users the caller is authorized to view.
    ///
    /// REGULAR callers see themselves, ADMIN callers see everyone, BOSS
    /// callers see themselves plus their full descendant closure.
    pub async fn visible_users(&self, caller_id: Uuid) -> Result<Vec<PublicUser>, HierarchyError> {
        let caller = self
            .store
            .find_by_id(caller_id)
            .await?
            .ok_or(HierarchyError::UnknownCaller(caller_id))?;

        match caller.role {
            Role::Regular => Ok(vec![caller.into()]),
            Role::Admin => {
                let users = self.store.find_all().await?;
                Ok(users.into_iter().map(PublicUser::from).collect())
            }
            Role::Boss => {
                // Worklist traversal with a visited set: no recursion, no
                // repeat visits, terminates even if the data ever holds a
                // cycle.
                let mut visited = HashSet::new();
                let mut frontier = VecDeque::new();
                let mut result = Vec::new();

                visited.insert(caller.id);
                frontier.push_back(caller);

                while let Some(user) = frontier.pop_front() {
                    let children = self.store.find_children(user.id).await?;
                    result.push(PublicUser::from(user));
                    for child in children {
                        if visited.insert(child.id) {
                            frontier.push_back(child);
                        }
                    }
                }

                Ok(result)
            }
        }
    }

    /// Move a direct subordinate of `boss_id` under `new_boss_id`.
    ///
    /// Ownership is checked against the child's current parent: if it is
    /// not `boss_id` the call fails with `NotOwner`, whether or not an
    /// account for `boss_id` exists.
    pub async fn reassign_boss(
        &self,
        boss_id: Uuid,
        child_id: Uuid,
        new_boss_id: Uuid,
    ) -> Result<PublicUser, HierarchyError> {
        let child = self
            .store
            .find_by_id(child_id)
            .await?
            .ok_or(HierarchyError::UnknownUser(child_id))?;

        if child.parent_id != Some(boss_id) {
            return Err(HierarchyError::NotOwner);
        }

        self.store
            .find_by_id(new_boss_id)
            .await?
            .ok_or(HierarchyError::UnknownUser(new_boss_id))?;

        let updated = self.store.set_parent(child_id, new_boss_id).await?;
        debug!(child = %child_id, from = %boss_id, to = %new_boss_id, "reassigned boss");
        Ok(updated.into())
    }

    /// Resolve an account by email and verify the secret against the
    /// stored hash. Returns the credential-stripped record for token
    /// issuance.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<PublicUser, HierarchyError> {
        let user = self
            .store
            .find_by_email(email)
            .await?
            .ok_or(HierarchyError::UnknownEmail)?;

        if !credentials::verify_password(password, &user.password_hash).await? {
            return Err(HierarchyError::BadCredential);
        }

        Ok(user.into())
    }
}
