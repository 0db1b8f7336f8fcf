// ==========================================
// Bosch price catalogue - core library
// ==========================================
// Stack: axum + rusqlite + calamine
// Two binaries share this crate: bp-api serves the catalogue over
// HTTP, bp-import populates it from a price list workbook.
// ==========================================

// ==========================================
// Module declarations
// ==========================================

// Domain layer - records and catalogue types
pub mod domain;

// Repository layer - data access
pub mod repository;

// Importer - workbook parsing and validation
pub mod importer;

// Configuration
pub mod config;

// Database infrastructure (connection setup, schema)
pub mod db;

// Logging
pub mod logging;

// Authentication - passwords and bearer tokens
pub mod auth;

// API layer - request validation, DTOs, handlers
pub mod api;

// Application layer - state, guards, router
pub mod app;

// ==========================================
// Re-exports
// ==========================================

pub use domain::{
    CatalogueSnapshot, CatalogueTree, DiscontinuedRecord, MasterDataRecord, NewReleaseRecord,
    PartDetail, PriceListRecord, ReferenceRecord, UserRecord,
};

pub use importer::price_importer::PriceImporter;
pub use importer::report::{ImportPolicy, ImportReport};

pub use repository::{CatalogueRepository, UserStore};

pub use app::{build_router, AppState};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "bosch-price";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
