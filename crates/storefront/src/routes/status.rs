//! Record store status indicator.

use amotos_core::StoreStatus;
use axum::{Json, extract::State};
use serde::Serialize;

use crate::state::AppState;

/// Latest liveness result and the store host it refers to.
#[derive(Debug, Clone, Serialize)]
pub struct StoreStatusView {
    pub status: StoreStatus,
    pub host: String,
}

/// Report the last known store status without probing.
pub async fn store(State(state): State<AppState>) -> Json<StoreStatusView> {
    Json(StoreStatusView {
        status: state.liveness().status(),
        host: state.store().display_host(),
    })
}
