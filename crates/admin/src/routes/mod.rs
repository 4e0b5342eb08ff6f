//! HTTP route handlers for the admin API.
//!
//! # Route Structure
//!
//! ```text
//! # Auth
//! POST /auth/sign-up           - Register (lowest-privilege role by default)
//! POST /auth/sign-in           - Sign in, sets session cookie
//! POST /auth/sign-out          - Sign out
//! GET  /auth/me                - Current session identity
//! POST /auth/password          - Change password (re-authenticates)
//!
//! # Menu (admin or content manager)
//! GET    /menu?level=<L>       - List items ordered by (level, category, name)
//! POST   /menu                 - Create item (201)
//! PUT    /menu                 - Update item by id in body
//! DELETE /menu?id=<id>         - Delete item
//! GET    /menu/events          - SSE change stream
//!
//! # Accounts (admin only)
//! GET    /accounts             - List accounts
//! POST   /accounts             - Create account with explicit role (201)
//! PUT    /accounts/{id}/role   - Change an account's role
//! DELETE /accounts/{id}        - Delete an account
//! ```

pub mod accounts;
pub mod auth;
pub mod menu;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Build the admin API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/auth/sign-up", post(auth::sign_up))
        .route("/auth/sign-in", post(auth::sign_in))
        .route("/auth/sign-out", post(auth::sign_out))
        .route("/auth/me", get(auth::me))
        .route("/auth/password", post(auth::change_password))
        // Menu
        .route(
            "/menu",
            get(menu::list)
                .post(menu::create)
                .put(menu::update)
                .delete(menu::remove),
        )
        .route("/menu/events", get(menu::events))
        // Accounts
        .route("/accounts", get(accounts::list).post(accounts::create))
        .route("/accounts/{id}/role", put(accounts::update_role))
        .route("/accounts/{id}", delete(accounts::remove))
}
