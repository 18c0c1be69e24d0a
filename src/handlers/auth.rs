use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{self, Claims};
use crate::database::models::{PublicUser, Role};
use crate::database::{DatabaseManager, PgUserStore};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{HierarchyService, NewUser};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    #[serde(default)]
    pub surname: Option<String>,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub data: PublicUser,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub data: PublicUser,
    pub expires_in: u64,
    pub authorization: String,
}

/// POST /auth/register - create an account inside the reporting tree
pub async fn register(Json(body): Json<RegisterRequest>) -> ApiResult<RegisterResponse> {
    validate_registration(&body)?;

    let service = hierarchy_service().await?;
    let user = service
        .create_user(NewUser {
            name: body.name,
            surname: body.surname,
            email: body.email,
            password: body.password,
            role: body.role,
            parent_id: body.parent_id,
        })
        .await?;

    Ok(ApiResponse::created(RegisterResponse {
        message: "ACCOUNT_CREATE_SUCCESS",
        data: user,
    }))
}

/// POST /auth/login - authenticate and receive a signed session token
pub async fn login(Json(body): Json<LoginRequest>) -> ApiResult<LoginResponse> {
    if body.email.is_empty() || body.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let service = hierarchy_service().await?;
    let user = service.authenticate(&body.email, &body.password).await?;

    let authorization = auth::generate_jwt(Claims::new(&user))?;

    Ok(ApiResponse::success(LoginResponse {
        data: user,
        expires_in: auth::token_expiry_secs(),
        authorization,
    }))
}

fn validate_registration(body: &RegisterRequest) -> Result<(), ApiError> {
    if body.name.trim().len() < 3 {
        return Err(ApiError::bad_request("Name is too short"));
    }
    if body.email.is_empty() || !body.email.contains('@') {
        return Err(ApiError::bad_request("A valid email is required"));
    }
    if body.password.is_empty() {
        return Err(ApiError::bad_request("Password is required"));
    }
    Ok(())
}

pub(crate) async fn hierarchy_service() -> Result<HierarchyService<PgUserStore>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(HierarchyService::new(PgUserStore::new(pool)))
}
