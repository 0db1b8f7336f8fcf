// ==========================================
// Application state
// ==========================================
// Wires settings into the shared state handed to every handler: the
// catalogue repository, the user store backend, and the auth service
// on top of both. Cloning is cheap, everything heavy sits behind an
// Arc.
// ==========================================

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::auth::{password, AuthService, TokenService};
use crate::config::settings::{ApiSettings, UserStoreBackend};
use crate::repository::{CatalogueRepository, InMemoryUserStore, SqliteUserStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    /// Route prefix every endpoint is nested under
    pub route_prefix: String,

    /// Origins the CORS layer admits
    pub cors_allowed_origins: Vec<String>,

    /// Read access to the imported catalogue
    pub catalogue: Arc<CatalogueRepository>,

    /// Account storage, backend chosen at startup
    pub users: Arc<dyn UserStore>,

    /// Login and token validation on top of the user store
    pub auth: Arc<AuthService>,
}

impl AppState {
    /// Build the state from settings
    ///
    /// Selecting the store backend happens here and nowhere else;
    /// everything downstream only sees the `UserStore` trait. When
    /// bootstrap credentials are configured the superuser is created
    /// on first start and left untouched afterwards.
    pub async fn new(settings: &ApiSettings) -> anyhow::Result<Self> {
        info!(
            catalogue_db = %settings.catalogue_db_path,
            backend = ?settings.user_store_backend,
            "initializing application state"
        );

        let users: Arc<dyn UserStore> = match settings.user_store_backend {
            UserStoreBackend::Sqlite => Arc::new(
                SqliteUserStore::new(&settings.users_db_path)
                    .context("user store setup failed")?,
            ),
            UserStoreBackend::Memory => Arc::new(InMemoryUserStore::new()),
        };

        if let (Some(username), Some(plain)) = (
            settings.bootstrap_su_username.as_deref(),
            settings.bootstrap_su_password.as_deref(),
        ) {
            let hash = password::hash_password(plain)
                .map_err(|e| anyhow::anyhow!("superuser bootstrap failed: {}", e))?;
            users.ensure_superuser(username, &hash).await?;
            info!(username, "superuser bootstrap checked");
        }

        let tokens = TokenService::new(&settings.auth_key, settings.token_expire_hours);
        let auth = Arc::new(AuthService::new(users.clone(), tokens));
        let catalogue = Arc::new(CatalogueRepository::new(&settings.catalogue_db_path));

        Ok(AppState {
            route_prefix: settings.route_prefix.clone(),
            cors_allowed_origins: settings.cors_allowed_origins.clone(),
            catalogue,
            users,
            auth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::ApiSettings;
    use tempfile::TempDir;

    fn settings_for(dir: &TempDir, backend: UserStoreBackend) -> ApiSettings {
        ApiSettings {
            route_prefix: "/api/v1".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            cors_allowed_origins: vec!["http://localhost:5173".to_string()],
            catalogue_db_path: dir
                .path()
                .join("catalogue.sqlite")
                .to_string_lossy()
                .into_owned(),
            users_db_path: dir.path().join("users.sqlite").to_string_lossy().into_owned(),
            auth_key: "state-test-secret".to_string(),
            token_expire_hours: 6,
            user_store_backend: backend,
            bootstrap_su_username: Some("root".to_string()),
            bootstrap_su_password: Some("root-password".to_string()),
        }
    }

    #[tokio::test]
    async fn test_state_bootstraps_superuser() {
        let dir = TempDir::new().unwrap();
        let state = AppState::new(&settings_for(&dir, UserStoreBackend::Sqlite))
            .await
            .unwrap();

        let root = state.users.lookup("root").await.unwrap().unwrap();
        assert!(root.su);
        // superusers stay out of the managed list
        assert!(state.users.list_users().await.unwrap().is_empty());

        // login works against the bootstrapped account
        let token = state.auth.login("root", "root-password").await.unwrap();
        assert!(!token.is_empty());
    }

    #[tokio::test]
    async fn test_state_with_memory_backend() {
        let dir = TempDir::new().unwrap();
        let state = AppState::new(&settings_for(&dir, UserStoreBackend::Memory))
            .await
            .unwrap();
        assert!(state.users.lookup("root").await.unwrap().is_some());
    }
}
