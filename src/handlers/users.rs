use axum::{extract::Path, Extension, Json};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::database::models::PublicUser;
use crate::handlers::auth::hierarchy_service;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBossRequest {
    pub child_id: Uuid,
    pub new_boss_id: Uuid,
}

/// GET /user/:id - everything the user identified by the path id is
/// authorized to see: themselves, their whole subtree, or all users,
/// depending on role.
pub async fn list_visible(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<PublicUser>> {
    debug!(caller = %auth.user_id, subject = %id, "subtree visibility query");

    let service = hierarchy_service().await?;
    let users = service.visible_users(id).await?;

    Ok(ApiResponse::success(users))
}

/// PUT /user/:id - move a direct subordinate of the path-id boss under a
/// new boss.
pub async fn update_boss(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateBossRequest>,
) -> ApiResult<PublicUser> {
    debug!(caller = %auth.user_id, boss = %id, child = %body.child_id, "boss reassignment");

    let service = hierarchy_service().await?;
    let updated = service
        .reassign_boss(id, body.child_id, body.new_boss_id)
        .await?;

    Ok(ApiResponse::success(updated))
}
