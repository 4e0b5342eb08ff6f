//! Middleware and request extractors for the admin API.

pub mod auth;
pub mod session;

pub use auth::{RequireAdmin, RequireAuth, clear_current_account, set_current_account};
pub use session::create_session_layer;
