// ==========================================
// Configuration layer
// ==========================================
// Role: explicit settings values, built from the environment once and
// passed into the components that need them
// ==========================================

pub mod settings;

pub use settings::{
    default_catalogue_db_path, default_users_db_path, ApiSettings, ImportSettings,
    UserStoreBackend,
};
