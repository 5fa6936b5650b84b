//! Catalog write handlers.
//!
//! Payloads are checked locally before they reach the store; store-side
//! validation failures come back as 400 with the store's message.

use amotos_core::{Item, ItemDraft, ItemId};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::state::AppState;

/// Create an item.
#[instrument(skip(state, draft), fields(codigo = %draft.product_code))]
pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<ItemDraft>,
) -> Result<(StatusCode, Json<Item>)> {
    draft.validate()?;
    let item = state.store().create_item(&draft).await?;

    add_breadcrumb("catalog", "Created item", Some(&[("id", item.id.as_str())]));
    tracing::info!(id = %item.id, "Item created");

    Ok((StatusCode::CREATED, Json(item)))
}

/// Replace the editable fields of an item.
#[instrument(skip(state, draft))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<ItemDraft>,
) -> Result<Json<Item>> {
    draft.validate()?;
    let id = ItemId::new(id);
    let item = state.store().update_item(&id, &draft).await?;

    add_breadcrumb("catalog", "Updated item", Some(&[("id", id.as_str())]));

    Ok(Json(item))
}

/// Delete an item.
#[instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    let id = ItemId::new(id);
    state.store().delete_item(&id).await?;

    add_breadcrumb("catalog", "Deleted item", Some(&[("id", id.as_str())]));
    tracing::info!(%id, "Item deleted");

    Ok(StatusCode::NO_CONTENT)
}
