//! Account management route handlers (admin only).
//!
//! Two invariants are enforced here before any repository call: an admin may
//! not delete their own account, and may not delete or demote another admin.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use mensa_core::{AccountId, Role, ValidationError};

use crate::db::accounts::AccountRepository;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::Account;
use crate::services::auth::AuthService;
use crate::state::AppState;

// =============================================================================
// Wire Types
// =============================================================================

/// Account as returned by the API. Never includes the password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: AccountId,
    pub email: String,
    pub role: Option<Role>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<AccountId>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email.into_inner(),
            role: account.role,
            created_at: account.created_at,
            created_by: account.created_by,
        }
    }
}

/// Admin-issued account creation request.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Role change request.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

fn parse_id(id: &str) -> Result<AccountId, AppError> {
    AccountId::parse(id)
        .map_err(|_| AppError::Validation(ValidationError::new("id", "invalid account id")))
}

// =============================================================================
// Handlers
// =============================================================================

/// List all accounts, oldest first.
#[instrument(skip_all)]
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountResponse>>, AppError> {
    let repo = AccountRepository::new(state.pool());

    let accounts = repo.list_all().await?;
    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

/// Create an account with an explicit role, recording the issuing admin.
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let service = AuthService::new(state.pool(), state.config().bootstrap_admin.as_ref());

    let account = service
        .create_account(&request.email, &request.password, request.role, admin.id)
        .await?;

    tracing::info!(account_id = %account.id, role = %request.role, "account issued");
    Ok((StatusCode::CREATED, Json(account.into())))
}

/// Change an account's role.
///
/// Another admin may not be demoted; changing one's own role is allowed.
#[instrument(skip_all, fields(admin_id = %admin.id, target = %id))]
pub async fn update_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    let id = parse_id(&id)?;
    let repo = AccountRepository::new(state.pool());

    let target = repo.get_by_id(id).await?.ok_or(AppError::NotFound)?;

    if target.role == Some(Role::Admin) && target.id != admin.id && request.role != Role::Admin {
        return Err(AppError::Forbidden(
            "cannot demote another administrator".to_owned(),
        ));
    }

    let updated = repo.update_role(id, request.role).await?;
    tracing::info!(role = %request.role, "account role changed");
    Ok(Json(updated.into()))
}

/// Delete an account.
///
/// Self-deletion and deleting another admin are both rejected.
#[instrument(skip_all, fields(admin_id = %admin.id, target = %id))]
pub async fn remove(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    let repo = AccountRepository::new(state.pool());

    if id == admin.id {
        return Err(AppError::Forbidden(
            "cannot delete your own account".to_owned(),
        ));
    }

    let target = repo.get_by_id(id).await?.ok_or(AppError::NotFound)?;
    if target.role == Some(Role::Admin) {
        return Err(AppError::Forbidden(
            "cannot delete another administrator".to_owned(),
        ));
    }

    repo.delete(id).await?;
    tracing::info!("account deleted");
    Ok(StatusCode::NO_CONTENT)
}
