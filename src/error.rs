// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::JwtError;
use crate::database::manager::DatabaseError;
use crate::services::hierarchy::HierarchyError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Conflict(msg)
            | ApiError::InternalServerError(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "error": true,
            "message": self.message(),
            "code": self.error_code()
        })
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

/// Every engine failure maps to a distinct, stable error kind; none is
/// ever converted to a success.
impl From<HierarchyError> for ApiError {
    fn from(err: HierarchyError) -> Self {
        match err {
            HierarchyError::InvalidHierarchy(_)
            | HierarchyError::UnknownParent(_)
            | HierarchyError::UnknownUser(_)
            | HierarchyError::NotOwner => ApiError::bad_request(err.to_string()),
            HierarchyError::UnknownCaller(_) => {
                ApiError::unauthorized("invalid_credentials")
            }
            HierarchyError::UnknownEmail => ApiError::unauthorized("Wrong email"),
            HierarchyError::BadCredential => ApiError::unauthorized("Wrong password"),
            HierarchyError::DuplicateEmail => ApiError::conflict(err.to_string()),
            HierarchyError::Credential(e) => {
                tracing::error!("Credential service error: {}", e);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            HierarchyError::Store(e) => e.into(),
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::ConfigMissing(_) | DatabaseError::InvalidDatabaseUrl => {
                tracing::error!("Database configuration error: {}", err);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            DatabaseError::UniqueViolation(constraint) => {
                ApiError::conflict(format!("Already exists: {}", constraint))
            }
            DatabaseError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error("Database error occurred")
            }
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        tracing::error!("JWT error: {}", err);
        ApiError::internal_server_error("Failed to issue token")
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn hierarchy_failures_map_to_stable_codes() {
        let cases: Vec<(HierarchyError, StatusCode)> = vec![
            (HierarchyError::InvalidHierarchy("x"), StatusCode::BAD_REQUEST),
            (HierarchyError::UnknownParent(Uuid::new_v4()), StatusCode::BAD_REQUEST),
            (HierarchyError::UnknownUser(Uuid::new_v4()), StatusCode::BAD_REQUEST),
            (HierarchyError::NotOwner, StatusCode::BAD_REQUEST),
            (HierarchyError::UnknownCaller(Uuid::new_v4()), StatusCode::UNAUTHORIZED),
            (HierarchyError::UnknownEmail, StatusCode::UNAUTHORIZED),
            (HierarchyError::BadCredential, StatusCode::UNAUTHORIZED),
            (HierarchyError::DuplicateEmail, StatusCode::CONFLICT),
        ];

        for (err, expected) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.status_code(), expected);
        }
    }

    #[test]
    fn store_failure_stays_generic() {
        let api: ApiError = HierarchyError::Store(DatabaseError::Sqlx(sqlx::Error::PoolClosed)).into();
        assert_eq!(api.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.error_code(), "INTERNAL_SERVER_ERROR");
    }
}
