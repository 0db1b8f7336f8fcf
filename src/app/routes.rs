// ==========================================
// Router assembly
// ==========================================
// Mounts the API under the configured prefix. Login stays outside the
// guards; catalogue and user-management route groups each carry their
// own scope guard. Trailing slashes follow the original frontend
// contract and are not redirected.
// ==========================================

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{AllowHeaders, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::api::{catalogue_api, login_api, user_manager_api};
use crate::app::guard;
use crate::app::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let catalogue_routes = Router::new()
        .route("/sections/", get(catalogue_api::sections))
        .route("/sections/:group_id/", get(catalogue_api::products_by_group))
        .route("/products/:part_number/", get(catalogue_api::product))
        .route("/products/search/", post(catalogue_api::search))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard::require_catalogue,
        ));

    let user_routes = Router::new()
        .route(
            "/users/",
            get(user_manager_api::list_users).post(user_manager_api::add_user),
        )
        .route("/users/:username", delete(user_manager_api::delete_user))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard::require_user_manager,
        ));

    let api = Router::new()
        .route("/login/", post(login_api::login))
        .merge(catalogue_routes)
        .merge(user_routes);

    let cors = cors_layer(&state.cors_allowed_origins);

    Router::new()
        .nest(&state.route_prefix, api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS for the configured frontend origins
///
/// Credentials stay enabled, so headers are mirrored instead of
/// wildcarded and origins must be an explicit list.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "skipping unparsable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
