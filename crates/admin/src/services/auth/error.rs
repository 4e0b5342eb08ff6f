//! Authentication error types.

use thiserror::Error;

use mensa_core::ValidationError;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format (sign-up only; sign-in collapses this into
    /// `InvalidCredentials`).
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] mensa_core::EmailError),

    /// Invalid credentials (wrong password or unknown account). Deliberately
    /// does not say which.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Account already exists.
    #[error("account already exists")]
    AccountAlreadyExists,

    /// Password or confirmation failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
