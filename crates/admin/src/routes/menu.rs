//! Menu CRUD and change-stream route handlers.

use std::convert::Infallible;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::Sse,
    response::sse::{Event, KeepAlive},
};
use serde::Deserialize;
use tracing::instrument;

use mensa_core::{CanteenLevel, MenuItem, MenuItemDraft, MenuItemId, ValidationError};

use crate::error::AppError;
use crate::events::Notification;
use crate::middleware::RequireAuth;
use crate::services::catalog::CatalogService;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Query parameters for listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub level: Option<String>,
}

/// Update request: the target id plus a full draft of the mutable fields.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub id: String,
    #[serde(flatten)]
    pub draft: MenuItemDraft,
}

/// Query parameters for deletion.
#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub id: String,
}

fn parse_level(level: Option<String>) -> Result<Option<CanteenLevel>, AppError> {
    level
        .map(|s| {
            s.parse::<CanteenLevel>()
                .map_err(|e| AppError::Validation(ValidationError::new("level", e)))
        })
        .transpose()
}

fn parse_id(id: &str) -> Result<MenuItemId, AppError> {
    MenuItemId::parse(id)
        .map_err(|_| AppError::Validation(ValidationError::new("id", "invalid menu item id")))
}

// =============================================================================
// Handlers
// =============================================================================

/// List menu items, ordered by (level, category, name), optionally filtered
/// by canteen level.
#[instrument(skip(state, _account))]
pub async fn list(
    RequireAuth(_account): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<MenuItem>>, AppError> {
    let level = parse_level(query.level)?;
    let service = CatalogService::new(state.pool(), state.events(), state.config().delete_policy);

    let items = service.list(level).await?;
    Ok(Json(items))
}

/// Create a menu item.
#[instrument(skip_all, fields(account_id = %account.id))]
pub async fn create(
    RequireAuth(account): RequireAuth,
    State(state): State<AppState>,
    Json(draft): Json<MenuItemDraft>,
) -> Result<(StatusCode, Json<MenuItem>), AppError> {
    let service = CatalogService::new(state.pool(), state.events(), state.config().delete_policy);

    let item = service.create(&draft).await?;
    tracing::info!(item_id = %item.id, "menu item created");
    Ok((StatusCode::CREATED, Json(item)))
}

/// Replace all mutable fields of a menu item.
#[instrument(skip_all, fields(account_id = %account.id))]
pub async fn update(
    RequireAuth(account): RequireAuth,
    State(state): State<AppState>,
    Json(request): Json<UpdateRequest>,
) -> Result<Json<MenuItem>, AppError> {
    let id = parse_id(&request.id)?;
    let service = CatalogService::new(state.pool(), state.events(), state.config().delete_policy);

    let item = service.update(id, &request.draft).await?;
    tracing::info!(item_id = %item.id, "menu item updated");
    Ok(Json(item))
}

/// Delete a menu item by id.
#[instrument(skip_all, fields(account_id = %account.id))]
pub async fn remove(
    RequireAuth(account): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<DeleteQuery>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&query.id)?;
    let service = CatalogService::new(state.pool(), state.events(), state.config().delete_policy);

    service.delete(id).await?;
    tracing::info!(item_id = %id, "menu item deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Stream catalog changes as server-sent events.
///
/// A subscriber that lags receives a `resync` event and should re-fetch the
/// listing; dropping the connection cancels the subscription.
pub async fn events(
    RequireAuth(_account): RequireAuth,
    State(state): State<AppState>,
) -> Sse<impl futures::Stream<Item = Result<Event, Infallible>>> {
    let mut subscription = state.events().subscribe();

    let stream = async_stream::stream! {
        while let Some(notification) = subscription.next().await {
            let event = match notification {
                Notification::Event(catalog_event) => {
                    let json = serde_json::to_string(&catalog_event).unwrap_or_else(|_| {
                        r#"{"type":"error","message":"failed to serialize event"}"#.to_string()
                    });
                    Event::default().event(catalog_event.kind()).data(json)
                }
                Notification::Lagged(missed) => Event::default()
                    .event("resync")
                    .data(format!(r#"{{"missed":{missed}}}"#)),
            };
            yield Ok::<_, Infallible>(event);
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
