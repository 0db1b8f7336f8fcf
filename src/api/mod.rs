// ==========================================
// API layer
// ==========================================
// Request validation, response shaping and the HTTP handlers served
// by the router in app.
// ==========================================

pub mod catalogue_api;
pub mod dto;
pub mod error;
pub mod login_api;
pub mod user_manager_api;
pub mod validator;

pub use error::{ApiError, ApiResult, FieldError};
