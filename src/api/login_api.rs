// ==========================================
// Login endpoint
// ==========================================
// Exchanges form credentials for a bearer token. This is the only
// route outside the authenticated surface.
// ==========================================

use axum::{extract::State, Form, Json};
use tracing::info;

use crate::api::dto::{LoginForm, TokenDto};
use crate::api::error::ApiResult;
use crate::app::AppState;

/// POST /login/
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> ApiResult<Json<TokenDto>> {
    let token = state.auth.login(&form.username, &form.password).await?;
    info!(username = %form.username, "login succeeded");
    Ok(Json(TokenDto::bearer(token)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ApiError;
    use crate::app::test_support::memory_state;

    #[tokio::test]
    async fn test_login_returns_bearer_token() {
        let (state, _dir) = memory_state("olena", "correct-horse", &["catalogue"]).await;
        let form = LoginForm {
            username: "olena".to_string(),
            password: "correct-horse".to_string(),
        };
        let Json(token) = login(State(state), Form(form)).await.unwrap();
        assert_eq!(token.token_type, "bearer");
        assert!(!token.access_token.is_empty());
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let (state, _dir) = memory_state("olena", "correct-horse", &["catalogue"]).await;
        let form = LoginForm {
            username: "olena".to_string(),
            password: "battery-staple".to_string(),
        };
        let err = login(State(state), Form(form)).await.unwrap_err();
        assert!(matches!(err, ApiError::BadLogin));
    }
}
