//! Read-only database access for the viewer.
//!
//! The viewer opens the same `SQLite` database the admin service writes, but
//! only ever reads from it. Schema and migrations live in the admin crate.

pub mod menu_items;

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use menu_items::MenuItemRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a read-only `SQLite` connection pool.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    // The admin service owns the file and has already put it in WAL mode;
    // a read-only connection must not issue mode-changing pragmas.
    let options =
        SqliteConnectOptions::from_str(database_url.expose_secret())?.read_only(true);

    SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}
