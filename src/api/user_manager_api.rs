// ==========================================
// User management endpoints
// ==========================================
// CRUD over API accounts, reserved for the user_manager scope. Every
// mutation answers with the resulting user list so the admin frontend
// can refresh its table from one response. Superusers are invisible
// here: never listed, never deletable.
// ==========================================

use axum::extract::{Path, State};
use axum::Json;
use tracing::info;

use crate::api::dto::{NewUserRequest, UserDto};
use crate::api::error::{ApiError, ApiResult};
use crate::api::validator;
use crate::app::AppState;
use crate::auth::password;
use crate::domain::UserRecord;
use crate::repository::RepositoryError;

fn user_list(usernames: Vec<String>) -> Vec<UserDto> {
    usernames
        .into_iter()
        .map(|username| UserDto { username })
        .collect()
}

/// GET /users/
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserDto>>> {
    Ok(Json(user_list(state.users.list_users().await?)))
}

/// POST /users/
pub async fn add_user(
    State(state): State<AppState>,
    Json(request): Json<NewUserRequest>,
) -> ApiResult<Json<Vec<UserDto>>> {
    let username = validator::username(&request.username)?;
    validator::password(&request.password)?;

    let record = UserRecord {
        username: username.clone(),
        password_hash: password::hash_password(&request.password)?,
        scopes: request.scopes,
        su: false,
    };
    state.users.add_user(record).await.map_err(|e| match e {
        RepositoryError::UniqueConstraintViolation(_) => {
            ApiError::field("username", "This username is already used.")
        }
        other => ApiError::from(other),
    })?;
    info!(username = %username, "user added");

    Ok(Json(user_list(state.users.list_users().await?)))
}

/// DELETE /users/{username}
///
/// Deleting an unknown or superuser account is a silent no-op, the
/// caller still gets the current list back.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(raw_username): Path<String>,
) -> ApiResult<Json<Vec<UserDto>>> {
    let username = validator::username(&raw_username)?;
    state.users.delete_user(&username).await?;
    info!(username = %username, "user deleted");

    Ok(Json(user_list(state.users.list_users().await?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::memory_state;

    fn new_user(username: &str, password: &str) -> NewUserRequest {
        NewUserRequest {
            username: username.to_string(),
            password: password.to_string(),
            scopes: vec!["catalogue".to_string()],
        }
    }

    #[tokio::test]
    async fn test_add_user_returns_updated_list() {
        let (state, _dir) = memory_state("admin", "admin-pass", &["user_manager"]).await;

        let Json(users) = add_user(State(state), Json(new_user("petro", "longenough")))
            .await
            .unwrap();
        let names: Vec<&str> = users.iter().map(|u| u.username.as_str()).collect();
        assert!(names.contains(&"petro"));
        assert!(names.contains(&"admin"));
    }

    #[tokio::test]
    async fn test_duplicate_username_is_a_field_error() {
        let (state, _dir) = memory_state("admin", "admin-pass", &["user_manager"]).await;

        add_user(State(state.clone()), Json(new_user("petro", "longenough")))
            .await
            .unwrap();
        let err = add_user(State(state), Json(new_user("petro", "otherpass1")))
            .await
            .unwrap_err();
        match err {
            ApiError::Validation(errors) => {
                assert_eq!(errors[0].loc, "username");
                assert_eq!(errors[0].msg, "This username is already used.");
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_add_user_validates_username_and_password() {
        let (state, _dir) = memory_state("admin", "admin-pass", &["user_manager"]).await;

        let err = add_user(State(state.clone()), Json(new_user("ab", "longenough")))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let err = add_user(State(state), Json(new_user("petro", "short")))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_user_is_silent_for_unknown_names() {
        let (state, _dir) = memory_state("admin", "admin-pass", &["user_manager"]).await;

        add_user(State(state.clone()), Json(new_user("petro", "longenough")))
            .await
            .unwrap();
        let Json(after_delete) = delete_user(State(state.clone()), Path("petro".to_string()))
            .await
            .unwrap();
        assert!(!after_delete.iter().any(|u| u.username == "petro"));

        // same call again: no error, same list
        let Json(after_repeat) = delete_user(State(state), Path("petro".to_string()))
            .await
            .unwrap();
        assert_eq!(after_repeat.len(), after_delete.len());
    }

    #[tokio::test]
    async fn test_delete_user_validates_username() {
        let (state, _dir) = memory_state("admin", "admin-pass", &["user_manager"]).await;
        let err = delete_user(State(state), Path("bad name!".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
