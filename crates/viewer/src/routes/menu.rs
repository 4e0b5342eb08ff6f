//! Public menu listing and change-stream handlers.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::Sse,
    response::sse::{Event, KeepAlive},
};
use serde::Deserialize;
use tracing::instrument;

use mensa_core::{CanteenLevel, Category, MenuItem, ValidationError};

use crate::db::menu_items::MenuItemRepository;
use crate::error::AppError;
use crate::state::{AppState, ListingKey};

/// Query parameters for the public listing.
#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    pub level: Option<String>,
    pub category: Option<String>,
}

/// Serve the menu listing, through the cache.
///
/// Anonymous; filters are optional. An empty result is a normal `200 []`,
/// never an error.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> Result<Json<Vec<MenuItem>>, AppError> {
    let level = query
        .level
        .map(|s| {
            s.parse::<CanteenLevel>()
                .map_err(|e| ValidationError::new("level", e))
        })
        .transpose()?;
    let category = query
        .category
        .map(|s| {
            s.parse::<Category>()
                .map_err(|e| ValidationError::new("category", e))
        })
        .transpose()?;

    let key = ListingKey { level, category };
    let pool = state.pool().clone();

    let items = state
        .listing_cache()
        .try_get_with(key, async move {
            MenuItemRepository::new(&pool)
                .list(level, category)
                .await
                .map(Arc::new)
        })
        .await
        .map_err(|e: Arc<crate::db::RepositoryError>| AppError::Internal(e.to_string()))?;

    Ok(Json(items.as_ref().clone()))
}

/// Stream catalog change notifications as server-sent events.
///
/// Each event carries the new catalog revision; clients re-fetch the listing
/// on receipt. Dropping the connection cancels the subscription.
pub async fn events(
    State(state): State<AppState>,
) -> Sse<impl futures::Stream<Item = Result<Event, Infallible>>> {
    let mut subscription = state.watcher().subscribe();

    let stream = async_stream::stream! {
        while let Some(revision) = subscription.changed().await {
            yield Ok::<_, Infallible>(Event::default()
                .event("changed")
                .data(format!(r#"{{"revision":{revision}}}"#)));
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
