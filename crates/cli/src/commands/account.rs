//! Account management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create the first admin
//! mensa-cli account create -e head@canteen.edu -p 'S3cret-Pass' -r admin
//!
//! # Create an account whose role is resolved at first sign-in
//! mensa-cli account create -e chef@canteen.edu -p 'S3cret-Pass'
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` - `SQLite` connection string (falls back to
//!   `DATABASE_URL`)

use secrecy::SecretString;
use thiserror::Error;

use mensa_admin::db::accounts::AccountRepository;
use mensa_admin::db::RepositoryError;
use mensa_admin::services::auth::hash_password;
use mensa_core::{Email, Role, validate_password};

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository error.
    #[error("Repository error: {0}")]
    Repository(RepositoryError),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: admin, content_manager")]
    InvalidRole(String),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Password fails the sign-up policy.
    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    /// Account already exists.
    #[error("Account already exists with email: {0}")]
    AccountExists(String),

    /// Password hashing failed.
    #[error("Password hashing failed")]
    PasswordHash,
}

/// Create a new account.
///
/// # Arguments
///
/// * `email` - Account email address
/// * `password` - Password (checked against the sign-up policy)
/// * `role` - Optional role (`admin` or `content_manager`); when omitted the
///   role is resolved at the account's first sign-in
///
/// # Errors
///
/// Returns `AccountError` on invalid input, a duplicate email, or a database
/// failure.
pub async fn create(email: &str, password: &str, role: Option<&str>) -> Result<(), AccountError> {
    dotenvy::dotenv().ok();

    let email = Email::parse(email).map_err(|e| AccountError::InvalidEmail(e.to_string()))?;
    let role = role
        .map(|r| {
            r.parse::<Role>()
                .map_err(|_| AccountError::InvalidRole(r.to_owned()))
        })
        .transpose()?;
    validate_password(password).map_err(|e| AccountError::InvalidPassword(e.message))?;

    let database_url = std::env::var("ADMIN_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| AccountError::MissingEnvVar("ADMIN_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = mensa_admin::db::create_pool(&database_url).await?;

    let password_hash = hash_password(password).map_err(|_| AccountError::PasswordHash)?;

    let account = AccountRepository::new(&pool)
        .create(&email, &password_hash, role, None)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AccountError::AccountExists(email.to_string()),
            other => AccountError::Repository(other),
        })?;

    match account.role {
        Some(role) => {
            tracing::info!("Account created: {} ({})", account.email, role);
        }
        None => {
            tracing::info!(
                "Account created: {} (role will be resolved at first sign-in)",
                account.email
            );
        }
    }

    Ok(())
}
