//! HTTP route handlers for the public viewer.
//!
//! # Route Structure
//!
//! ```text
//! GET /menu?level=<L>&category=<C>  - Cached listing, ordered by
//!                                     (level, category, name)
//! GET /menu/events                  - SSE change stream
//! ```

pub mod menu;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Build the viewer router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/menu", get(menu::list))
        .route("/menu/events", get(menu::events))
}
