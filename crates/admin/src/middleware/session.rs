//! Session middleware configuration for the admin API.
//!
//! Sets up `SQLite`-backed sessions using tower-sessions with strict
//! security settings (SameSite=Strict, 24hr expiry).

use sqlx::SqlitePool;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::AdminConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "mensa_admin_session";

/// Session expiry time in seconds (24 hours).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session layer with `SQLite` store.
///
/// # Arguments
///
/// * `pool` - `SQLite` connection pool
/// * `config` - Admin configuration (for determining HTTPS mode)
///
/// # Panics
///
/// Panics if the table name is invalid (should never happen with the
/// hardcoded "session" value).
#[must_use]
pub fn create_session_layer(
    pool: &SqlitePool,
    config: &AdminConfig,
) -> SessionManagerLayer<SqliteStore> {
    // Note: The session table is created via migration, not by the store.
    let store = SqliteStore::new(pool.clone())
        .with_table_name("session")
        .expect("valid table name");

    // Determine if we're in production (HTTPS)
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
