//! Product page route handlers.

use amotos_core::ItemId;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use crate::error::Result;
use crate::loaders::{
    EditPage, ListingPage, ListingQuery, NewPage, ProductPage, load_detail, load_edit,
    load_listing, load_new,
};
use crate::state::AppState;

/// Product listing page.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Json<ListingPage> {
    Json(load_listing(state.store(), &query).await)
}

/// Product detail page. Unknown ids are a 404.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<ProductPage>> {
    let page = load_detail(state.store(), &ItemId::new(id)).await?;
    Ok(Json(page))
}

/// Edit form data for an existing product.
#[instrument(skip(state))]
pub async fn edit(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<EditPage>> {
    let page = load_edit(state.store(), &ItemId::new(id)).await?;
    Ok(Json(page))
}

/// Form data for a new product.
#[instrument(skip(state))]
pub async fn new_product(State(state): State<AppState>) -> Json<NewPage> {
    Json(load_new(state.store()).await)
}
