// ==========================================
// Shared test fixtures
// ==========================================
// State builders used by handler and router tests: an in-memory user
// store with one account, and optionally a seeded catalogue database
// living in the returned TempDir.
// ==========================================

use std::sync::Arc;

use rust_decimal::Decimal;
use tempfile::TempDir;

use crate::app::state::AppState;
use crate::auth::{password, AuthService, TokenService};
use crate::domain::{PriceListRecord, UserRecord};
use crate::importer::build_catalogue;
use crate::repository::{CatalogueRepository, InMemoryUserStore, UserStore};

pub const TEST_AUTH_KEY: &str = "test-suite-secret";

/// State over an in-memory user store holding one account. The
/// catalogue database path points into the returned TempDir and does
/// not exist until seeded.
pub async fn memory_state(username: &str, plain: &str, scopes: &[&str]) -> (AppState, TempDir) {
    let dir = TempDir::new().unwrap();
    let catalogue_db = dir.path().join("catalogue.sqlite");

    let users = Arc::new(InMemoryUserStore::new());
    users
        .add_user(UserRecord {
            username: username.to_string(),
            password_hash: password::hash_password(plain).unwrap(),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
            su: false,
        })
        .await
        .unwrap();

    let users: Arc<dyn UserStore> = users;
    let tokens = TokenService::new(TEST_AUTH_KEY, 6);
    let auth = Arc::new(AuthService::new(users.clone(), tokens));
    let catalogue = Arc::new(CatalogueRepository::new(&catalogue_db.to_string_lossy()));

    let state = AppState {
        route_prefix: "/api/v1".to_string(),
        cors_allowed_origins: vec!["http://localhost:5173".to_string()],
        catalogue,
        users,
        auth,
    };
    (state, dir)
}

pub fn price_row(part_no: &str, group: &str, subsection: &str, section: &str) -> PriceListRecord {
    PriceListRecord {
        part_no: part_no.to_string(),
        title_ua: "Свічка запалювання".to_string(),
        title_en: "Spark plug".to_string(),
        section: section.to_string(),
        subsection: subsection.to_string(),
        group: group.to_string(),
        uktzed: 8511100000,
        min_order: 1,
        quantity: 10,
        price: Decimal::new(1099, 2),
        truck: false,
    }
}

/// `memory_state` with a catalogue-scoped account plus two spark plug
/// parts persisted in group 1
pub async fn seeded_state() -> (AppState, TempDir) {
    let (state, dir) = memory_state("viewer", "viewer-pass", &["catalogue"]).await;

    let outcome = build_catalogue(
        vec![
            price_row(
                "F00HN37002",
                "1.1.1. Iridium",
                "1.1. Spark Plugs",
                "1. Gasoline Systems",
            ),
            price_row(
                "F00HN37011",
                "1.1.1. Iridium",
                "1.1. Spark Plugs",
                "1. Gasoline Systems",
            ),
        ],
        vec![],
        vec![],
        vec![],
        vec![],
    );
    state.catalogue.replace_catalogue(&outcome.snapshot).unwrap();
    (state, dir)
}
