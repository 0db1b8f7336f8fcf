// ==========================================
// Settings
// ==========================================
// Explicit configuration values, constructed once and passed in where
// needed. No module reads the environment on its own: the binaries call
// from_env() and hand the result down.
// ==========================================

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ==========================================
// Compiled-in defaults
// ==========================================

/// Part number: exactly 10 uppercase alphanumeric characters
pub const DEFAULT_PART_NO_PATTERN: &str = r"^[0-9A-Z]{10}$";

/// Ukrainian title: Cyrillic/Latin letters, digits, allow-listed punctuation
pub const DEFAULT_TITLE_UA_PATTERN: &str = r"^[0-9A-Za-zА-Яа-яЇїІіЄєҐґ /&+=,.()\[\]\-\\]+$";

/// English title: Latin letters, digits, allow-listed punctuation
pub const DEFAULT_TITLE_EN_PATTERN: &str = r"^[0-9A-Za-z /&+=,.()\[\]\-\\]+$";

/// Section label: "<n>. <text>"
pub const DEFAULT_SECTION_PATTERN: &str = r"^\d\. [0-9A-Za-z /&+=,.()\[\]\-\\]+$";

/// Subsection label: "<n>.<n>. <text>"
pub const DEFAULT_SUBSECTION_PATTERN: &str = r"^\d\.\d\. [0-9A-Za-z /&+=,.()\[\]\-\\]+$";

/// Group label: "<n>.<n>.<n>. <text>"
pub const DEFAULT_GROUP_PATTERN: &str = r"^\d\.\d\.\d\. [0-9A-Za-z /&+=,.()\[\]\-\\]+$";

/// Decimal cell text: digits with one optional dot/comma separator
pub const DEFAULT_DECIMAL_PATTERN: &str = r"^\d+([.,]\d+)?$";

/// Default API bind address
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

/// Default route prefix for the HTTP API
pub const DEFAULT_ROUTE_PREFIX: &str = "/api/v1";

/// Default CORS allowed origin (local frontend dev server)
pub const DEFAULT_CORS_ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// Default token lifetime in hours
pub const DEFAULT_TOKEN_EXPIRE_HOURS: i64 = 6;

// ==========================================
// ImportSettings
// ==========================================

/// Validator patterns and import policy
///
/// The Field Validators compile these patterns at construction; override a
/// pattern via environment only to track a price list format change without
/// a rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSettings {
    pub part_no_pattern: String,
    pub title_ua_pattern: String,
    pub title_en_pattern: String,
    pub section_pattern: String,
    pub subsection_pattern: String,
    pub group_pattern: String,
    pub decimal_pattern: String,

    /// Abort on the first invalid row (default). When false, invalid rows
    /// are skipped and collected into the import report.
    pub fail_fast: bool,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            part_no_pattern: DEFAULT_PART_NO_PATTERN.to_string(),
            title_ua_pattern: DEFAULT_TITLE_UA_PATTERN.to_string(),
            title_en_pattern: DEFAULT_TITLE_EN_PATTERN.to_string(),
            section_pattern: DEFAULT_SECTION_PATTERN.to_string(),
            subsection_pattern: DEFAULT_SUBSECTION_PATTERN.to_string(),
            group_pattern: DEFAULT_GROUP_PATTERN.to_string(),
            decimal_pattern: DEFAULT_DECIMAL_PATTERN.to_string(),
            fail_fast: true,
        }
    }
}

impl ImportSettings {
    /// Build settings from the environment, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            part_no_pattern: env_string("BP_PART_NO_PATTERN", &defaults.part_no_pattern),
            title_ua_pattern: env_string("BP_TITLE_UA_PATTERN", &defaults.title_ua_pattern),
            title_en_pattern: env_string("BP_TITLE_EN_PATTERN", &defaults.title_en_pattern),
            section_pattern: env_string("BP_SECTION_PATTERN", &defaults.section_pattern),
            subsection_pattern: env_string("BP_SUBSECTION_PATTERN", &defaults.subsection_pattern),
            group_pattern: env_string("BP_GROUP_PATTERN", &defaults.group_pattern),
            decimal_pattern: env_string("BP_DECIMAL_PATTERN", &defaults.decimal_pattern),
            fail_fast: env_bool("BP_IMPORT_FAIL_FAST", defaults.fail_fast),
        }
    }
}

// ==========================================
// ApiSettings
// ==========================================

/// User store backend, selected at configuration time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStoreBackend {
    Sqlite,
    Memory,
}

/// HTTP API configuration
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub route_prefix: String,
    pub bind_addr: String,
    pub cors_allowed_origins: Vec<String>,

    /// Catalogue database (written by bp-import, read by the API)
    pub catalogue_db_path: String,

    /// User store database (only used with the Sqlite backend)
    pub users_db_path: String,

    /// JWT signing key. Required, no default.
    pub auth_key: String,
    pub token_expire_hours: i64,

    pub user_store_backend: UserStoreBackend,

    /// Superuser ensured at startup when both values are present
    pub bootstrap_su_username: Option<String>,
    pub bootstrap_su_password: Option<String>,
}

impl ApiSettings {
    /// Build settings from the environment
    ///
    /// Fails when BP_AUTH_KEY is absent: issuing tokens with an accidental
    /// default key must be impossible.
    pub fn from_env() -> Result<Self> {
        let auth_key = std::env::var("BP_AUTH_KEY")
            .context("BP_AUTH_KEY must be set (JWT signing key)")?;

        let user_store_backend = match env_string("BP_USER_STORE", "sqlite").to_lowercase().as_str()
        {
            "memory" => UserStoreBackend::Memory,
            _ => UserStoreBackend::Sqlite,
        };

        Ok(Self {
            route_prefix: env_string("BP_ROUTE_PREFIX", DEFAULT_ROUTE_PREFIX),
            bind_addr: env_string("BP_BIND_ADDR", DEFAULT_BIND_ADDR),
            cors_allowed_origins: env_list("BP_CORS_ALLOWED_ORIGINS", DEFAULT_CORS_ALLOWED_ORIGIN),
            catalogue_db_path: env_string("BP_DB_PATH", &default_catalogue_db_path()),
            users_db_path: env_string("BP_USERS_DB_PATH", &default_users_db_path()),
            auth_key,
            token_expire_hours: env_i64("BP_TOKEN_EXPIRE_HOURS", DEFAULT_TOKEN_EXPIRE_HOURS),
            user_store_backend,
            bootstrap_su_username: std::env::var("BP_SU_USERNAME").ok().filter(|s| !s.is_empty()),
            bootstrap_su_password: std::env::var("BP_SU_PASSWORD").ok().filter(|s| !s.is_empty()),
        })
    }
}

// ==========================================
// Default database locations
// ==========================================

/// Default catalogue database path
///
/// BP_DB_PATH overrides; otherwise the user data directory is used so the
/// file survives working-directory changes, with ./bp.sqlite as fallback.
pub fn default_catalogue_db_path() -> String {
    default_db_path("bp.sqlite")
}

/// Default user store database path
pub fn default_users_db_path() -> String {
    default_db_path("users.sqlite")
}

fn default_db_path(file_name: &str) -> String {
    let mut path = PathBuf::from(".").join(file_name);

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        let app_dir = data_dir.join("bosch-price-dev");

        #[cfg(not(debug_assertions))]
        let app_dir = data_dir.join("bosch-price");

        std::fs::create_dir_all(&app_dir).ok();
        path = app_dir.join(file_name);
    }

    path.to_string_lossy().to_string()
}

// ==========================================
// Environment helpers
// ==========================================

fn env_string(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(v) => matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

fn env_i64(key: &str, default: i64) -> i64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_list(key: &str, default: &str) -> Vec<String> {
    let raw = env_string(key, default);
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
