// ==========================================
// User domain model
// ==========================================

use serde::{Deserialize, Serialize};

/// Scope granting access to the catalogue read endpoints
pub const SCOPE_CATALOGUE: &str = "catalogue";

/// Scope granting access to user administration
pub const SCOPE_USER_MANAGER: &str = "user_manager";

/// Scopes assigned to a new user when none are given
pub fn default_scopes() -> Vec<String> {
    vec![SCOPE_CATALOGUE.to_string()]
}

// ==========================================
// UserRecord - stored account
// ==========================================
// password_hash is an Argon2 PHC string, never a plain password.
// su marks the superuser: bootstrapped at setup, never listed or deleted
// through the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub password_hash: String,
    pub scopes: Vec<String>,
    pub su: bool,
}

impl UserRecord {
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }
}

/// Verified caller identity attached to a request after token checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub username: String,
    pub scopes: Vec<String>,
}

impl AuthUser {
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }
}
