// ==========================================
// Repository layer
// ==========================================
// Data access only, no business rules. Every query is parameterized.
// Two databases: the catalogue (replaced wholesale by imports) and the
// user store.
// ==========================================

pub mod catalogue_repo;
pub mod error;
pub mod user_repo;

// Re-export core repositories
pub use catalogue_repo::CatalogueRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use user_repo::{InMemoryUserStore, SqliteUserStore, UserStore};
