//! Shop route handler.

use axum::{
    Json,
    extract::{Query, State},
};
use tracing::instrument;

use crate::loaders::{ShopPage, ShopQuery, load_shop};
use crate::state::AppState;

/// Faceted shop page.
///
/// Never fails: store problems show up as an empty page with `error` set.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>, Query(query): Query<ShopQuery>) -> Json<ShopPage> {
    Json(load_shop(state.store(), &query).await)
}
