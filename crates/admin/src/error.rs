//! Unified error handling for the admin API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use mensa_core::ValidationError;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::catalog::CatalogError;

/// Application-level error type for the admin API.
#[derive(Debug, Error)]
pub enum AppError {
    /// A submitted record failed validation (field-scoped, recoverable).
    #[error("{0}")]
    Validation(ValidationError),

    /// Sign-in failed. Deliberately generic.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// No authenticated session.
    #[error("authentication required")]
    Unauthorized,

    /// Authenticated but lacking the required role.
    #[error("{0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("not found")]
    NotFound,

    /// Conflicting resource (e.g., duplicate email).
    #[error("{0}")]
    Conflict(String),

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(RepositoryError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            other => Self::Database(other),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::Validation(v) => Self::Validation(v),
            CatalogError::NotFound => Self::NotFound,
            CatalogError::Repository(r) => r.into(),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidEmail(err) => {
                Self::Validation(ValidationError::new("email", err.to_string()))
            }
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::AccountAlreadyExists => Self::Conflict("account already exists".to_owned()),
            AuthError::Validation(v) => Self::Validation(v),
            AuthError::Repository(r) => r.into(),
            AuthError::PasswordHash => Self::Internal("password hashing failed".to_owned()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors; details stay out of the response body.
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            tracing::error!(error = %self, "admin request error");
        }

        let status = match &self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidCredentials | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "internal server error".to_string(),
            _ => self.to_string(),
        };

        let body = match &self {
            Self::Validation(v) => serde_json::json!({
                "error": message,
                "field": v.field,
            }),
            _ => serde_json::json!({ "error": message }),
        };

        (status, Json(body)).into_response()
    }
}
