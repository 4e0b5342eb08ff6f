//! Authentication route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::AppError;
use crate::middleware::{RequireAuth, clear_current_account, set_current_account};
use crate::models::CurrentAccount;
use crate::services::auth::AuthService;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Sign-up request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Sign-in request body.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Password change request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new account and sign it in.
///
/// Self-registration stores no role; the immediate first-login bootstrap
/// assigns the lowest-privilege role unless the configured bootstrap claim
/// applies.
#[instrument(skip_all, fields(email = %request.email))]
pub async fn sign_up(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<CurrentAccount>), AppError> {
    let service = AuthService::new(state.pool(), state.config().bootstrap_admin.as_ref());

    let (account, role) = service
        .sign_up(&request.email, &request.password, &request.confirm_password)
        .await?;

    let current = CurrentAccount {
        id: account.id,
        email: account.email,
        role,
    };
    set_current_account(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("failed to set session: {e}")))?;

    tracing::info!(account_id = %current.id, "account registered");
    Ok((StatusCode::CREATED, Json(current)))
}

/// Sign in with email and password.
///
/// Failures return a generic message that does not say whether the email or
/// the password was wrong.
#[instrument(skip_all)]
pub async fn sign_in(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<SignInRequest>,
) -> Result<Json<CurrentAccount>, AppError> {
    let service = AuthService::new(state.pool(), state.config().bootstrap_admin.as_ref());

    let (account, role) = service.sign_in(&request.email, &request.password).await?;

    let current = CurrentAccount {
        id: account.id,
        email: account.email,
        role,
    };
    set_current_account(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("failed to set session: {e}")))?;

    tracing::info!(account_id = %current.id, "signed in");
    Ok(Json(current))
}

/// Sign out the current session.
pub async fn sign_out(session: Session) -> Result<StatusCode, AppError> {
    clear_current_account(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Return the current session identity.
pub async fn me(RequireAuth(account): RequireAuth) -> Json<CurrentAccount> {
    Json(account)
}

/// Change the current account's password, re-authenticating with the current
/// password.
#[instrument(skip_all, fields(account_id = %account.id))]
pub async fn change_password(
    RequireAuth(account): RequireAuth,
    State(state): State<AppState>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<StatusCode, AppError> {
    let service = AuthService::new(state.pool(), state.config().bootstrap_admin.as_ref());

    service
        .change_password(
            account.id,
            &request.current_password,
            &request.new_password,
            &request.confirm_password,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
