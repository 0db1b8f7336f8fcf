// ==========================================
// API error surface
// ==========================================
// Converts auth and repository failures into HTTP outcomes with the
// response bodies the catalogue frontend expects: a plain string under
// "detail" for terminal errors, a list of {loc, msg} objects under
// "detail" for request validation failures.
// ==========================================

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::repository::RepositoryError;

/// One field-level validation failure, serialized inside "detail"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    pub loc: String,
    pub msg: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    // ==========================================
    // Authentication and authorization
    // ==========================================
    /// Bearer token absent from the request
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Token does not decode, or its user no longer exists
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Token decoded but its expiry has passed
    #[error("Credentials expired")]
    CredentialsExpired,

    /// Login form carried a wrong username or password
    #[error("Incorrect username or password")]
    BadLogin,

    /// Token is valid but lacks the scope the route requires
    #[error("Not enough permissions")]
    NotEnoughPermissions,

    // ==========================================
    // Request validation
    // ==========================================
    #[error("Request validation failed")]
    Validation(Vec<FieldError>),

    // ==========================================
    // Resources
    // ==========================================
    #[error("{0}")]
    NotFound(String),

    // ==========================================
    // Internal
    // ==========================================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// Single-field validation failure
    pub fn field(loc: &str, msg: &str) -> Self {
        ApiError::Validation(vec![FieldError {
            loc: loc.to_string(),
            msg: msg.to_string(),
        }])
    }
}

// ==========================================
// Conversion from RepositoryError
// ==========================================
// Handlers that want a specific 404 message map NotFound themselves
// before this fallback runs. Everything else from the storage layer is
// an internal fault the client has no use for.
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} {} not found", entity, id))
            }
            RepositoryError::Other(e) => ApiError::Other(e),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::BadLogin => ApiError::BadLogin,
            AuthError::NotAuthenticated => ApiError::NotAuthenticated,
            AuthError::InvalidToken => ApiError::InvalidCredentials,
            AuthError::Expired => ApiError::CredentialsExpired,
            AuthError::Forbidden => ApiError::NotEnoughPermissions,
            AuthError::Repository(e) => e.into(),
            internal @ (AuthError::TokenIssue(_) | AuthError::Hash(_)) => {
                ApiError::Internal(internal.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, challenge, detail) = match self {
            ApiError::NotAuthenticated => {
                (StatusCode::UNAUTHORIZED, true, json!("Not authenticated"))
            }
            ApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, true, json!("Invalid credentials"))
            }
            ApiError::CredentialsExpired => {
                (StatusCode::UNAUTHORIZED, true, json!("Credentials expired"))
            }
            ApiError::BadLogin => (
                StatusCode::BAD_REQUEST,
                false,
                json!("Incorrect username or password"),
            ),
            ApiError::NotEnoughPermissions => (
                StatusCode::FORBIDDEN,
                false,
                json!("Not enough permissions"),
            ),
            ApiError::Validation(errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, false, json!(errors))
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, false, json!(msg)),
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    false,
                    json!("Internal server error"),
                )
            }
            ApiError::Other(e) => {
                tracing::error!("internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    false,
                    json!("Internal server error"),
                )
            }
        };

        let mut response = (status, Json(json!({ "detail": detail }))).into_response();
        if challenge {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

/// Result type alias for handlers
pub type ApiResult<T> = Result<T, ApiError>;
