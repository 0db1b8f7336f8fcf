// ==========================================
// Route guards
// ==========================================
// Bearer-token middleware for the authenticated route groups. Each
// guard resolves the token into an `AuthUser`, checks the scope its
// route group requires, and stashes the user in request extensions
// for handlers that want the caller identity.
// ==========================================

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::Response,
};

use crate::api::error::ApiError;
use crate::app::AppState;
use crate::domain::{SCOPE_CATALOGUE, SCOPE_USER_MANAGER};

/// Guard for the catalogue read routes
pub async fn require_catalogue(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    authorize(&state, SCOPE_CATALOGUE, request, next).await
}

/// Guard for the user management routes
pub async fn require_user_manager(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    authorize(&state, SCOPE_USER_MANAGER, request, next).await
}

async fn authorize(
    state: &AppState,
    required_scope: &str,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&request).ok_or(ApiError::NotAuthenticated)?;
    let user = state.auth.current_user(&token).await?;
    if !user.has_scope(required_scope) {
        tracing::debug!(
            username = %user.username,
            required_scope,
            "request rejected: missing scope"
        );
        return Err(ApiError::NotEnoughPermissions);
    }
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Pull the token out of `Authorization: Bearer <token>`
///
/// The scheme is matched case-insensitively; a header with any other
/// scheme counts as no credentials at all.
fn bearer_token(request: &Request<Body>) -> Option<String> {
    let header = request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?;
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}
