//! Authentication extractors for the admin API.
//!
//! Requests are rejected here, before any handler or service runs: 401 when
//! no session identity exists, 403 when the role is insufficient.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use mensa_core::Role;

use crate::error::AppError;
use crate::models::{CurrentAccount, session_keys};

/// Extractor that requires an authenticated account.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(account): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", account.email)
/// }
/// ```
pub struct RequireAuth(pub CurrentAccount);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AppError::Unauthorized)?;

        let account: CurrentAccount = session
            .get(session_keys::CURRENT_ACCOUNT)
            .await
            .ok()
            .flatten()
            .ok_or(AppError::Unauthorized)?;

        Ok(Self(account))
    }
}

/// Extractor that requires an authenticated account with the admin role.
///
/// Rejects with 401 when unauthenticated and 403 when the account is a
/// content manager, so the client can distinguish "sign in" from "not
/// allowed".
pub struct RequireAdmin(pub CurrentAccount);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAuth(account) = RequireAuth::from_request_parts(parts, state).await?;

        if account.role != Role::Admin {
            return Err(AppError::Forbidden(
                "administrator role required for account management".to_owned(),
            ));
        }

        Ok(Self(account))
    }
}

/// Helper to set the current account in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_account(
    session: &Session,
    account: &CurrentAccount,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::CURRENT_ACCOUNT, account)
        .await
}

/// Helper to clear the current account from the session (sign-out).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_account(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentAccount>(session_keys::CURRENT_ACCOUNT)
        .await?;
    Ok(())
}
