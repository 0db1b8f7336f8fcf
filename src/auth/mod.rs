// ==========================================
// Authentication layer
// ==========================================
// Password verification against the user store plus issue and
// validation of bearer tokens. Handlers never see hashes or raw
// claims, only `AuthUser` and the error variants below.
// ==========================================

pub mod password;
pub mod token;

pub use token::{Claims, TokenService};

use crate::domain::AuthUser;
use crate::repository::{RepositoryError, UserStore};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum AuthError {
    // ===== Login =====
    #[error("Incorrect username or password")]
    BadLogin,

    // ===== Token validation =====
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Invalid credentials")]
    InvalidToken,
    #[error("Credentials expired")]
    Expired,
    #[error("Not enough permissions")]
    Forbidden,

    // ===== Internal =====
    #[error("Token issue failed: {0}")]
    TokenIssue(String),
    #[error("Password hash failure: {0}")]
    Hash(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub struct AuthService {
    store: Arc<dyn UserStore>,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, tokens: TokenService) -> Self {
        AuthService { store, tokens }
    }

    /// Exchange a username and password for a bearer token
    ///
    /// Unknown username and wrong password collapse into the same
    /// `BadLogin` so a caller cannot probe which usernames exist.
    pub async fn login(&self, username: &str, plain_password: &str) -> Result<String, AuthError> {
        let user = match self.store.lookup(username).await? {
            Some(user) => user,
            None => {
                debug!(username, "login rejected: unknown user");
                return Err(AuthError::BadLogin);
            }
        };
        if !password::verify_password(plain_password, &user.password_hash)? {
            debug!(username, "login rejected: password mismatch");
            return Err(AuthError::BadLogin);
        }
        self.tokens.issue(&user.username, &user.scopes)
    }

    /// Resolve a bearer token into the user it was issued to
    ///
    /// The store is consulted again so a token issued to a since
    /// deleted user stops working immediately. Scopes come from the
    /// token itself, they were fixed at issue time.
    pub async fn current_user(&self, token: &str) -> Result<AuthUser, AuthError> {
        let claims = self.tokens.verify(token)?;
        match self.store.lookup(&claims.sub).await? {
            Some(user) => Ok(AuthUser {
                username: user.username,
                scopes: claims.scopes,
            }),
            None => {
                debug!(username = %claims.sub, "token rejected: user no longer exists");
                Err(AuthError::InvalidToken)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{default_scopes, UserRecord};
    use crate::repository::InMemoryUserStore;

    async fn service_with_user(username: &str, plain: &str) -> AuthService {
        let store = InMemoryUserStore::new();
        store
            .add_user(UserRecord {
                username: username.to_string(),
                password_hash: password::hash_password(plain).unwrap(),
                scopes: default_scopes(),
                su: false,
            })
            .await
            .unwrap();
        AuthService::new(Arc::new(store), TokenService::new("test-secret", 6))
    }

    #[tokio::test]
    async fn test_login_and_current_user() {
        let auth = service_with_user("olena", "correct-horse").await;
        let token = auth.login("olena", "correct-horse").await.unwrap();
        let user = auth.current_user(&token).await.unwrap();
        assert_eq!(user.username, "olena");
        assert_eq!(user.scopes, vec!["catalogue"]);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_look_alike() {
        let auth = service_with_user("olena", "correct-horse").await;
        let wrong = auth.login("olena", "battery-staple").await.unwrap_err();
        let unknown = auth.login("nobody", "battery-staple").await.unwrap_err();
        assert!(matches!(wrong, AuthError::BadLogin));
        assert!(matches!(unknown, AuthError::BadLogin));
    }

    #[tokio::test]
    async fn test_token_of_deleted_user_is_rejected() {
        let store = Arc::new(InMemoryUserStore::new());
        store
            .add_user(UserRecord {
                username: "short_lived".to_string(),
                password_hash: password::hash_password("whatever1").unwrap(),
                scopes: default_scopes(),
                su: false,
            })
            .await
            .unwrap();
        let auth = AuthService::new(store.clone(), TokenService::new("test-secret", 6));

        let token = auth.login("short_lived", "whatever1").await.unwrap();
        store.delete_user("short_lived").await.unwrap();

        assert!(matches!(
            auth.current_user(&token).await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_expired_token_keeps_its_own_error() {
        let store = Arc::new(InMemoryUserStore::new());
        store
            .add_user(UserRecord {
                username: "olena".to_string(),
                password_hash: password::hash_password("correct-horse").unwrap(),
                scopes: default_scopes(),
                su: false,
            })
            .await
            .unwrap();
        let auth = AuthService::new(store, TokenService::new("test-secret", -1));

        let token = auth.login("olena", "correct-horse").await.unwrap();
        assert!(matches!(
            auth.current_user(&token).await,
            Err(AuthError::Expired)
        ));
    }
}
