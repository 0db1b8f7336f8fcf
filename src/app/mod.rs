// ==========================================
// Application layer
// ==========================================
// Composition root: shared state, route guards and router assembly.
// ==========================================

pub mod guard;
pub mod routes;
pub mod state;

#[cfg(test)]
pub mod test_support;

pub use routes::build_router;
pub use state::AppState;
