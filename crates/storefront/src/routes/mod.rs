//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                  - Process health check
//! GET    /status/store            - Record store reachability
//!
//! # Pages (JSON page models)
//! GET    /tienda                  - Faceted shop
//! GET    /productos               - Product listing
//! GET    /productos/nuevo         - New product form data
//! GET    /productos/{id}          - Product detail
//! GET    /productos/{id}/editar   - Edit product form data
//!
//! # Catalog writes
//! POST   /api/repuestos           - Create item
//! PATCH  /api/repuestos/{id}      - Update item
//! DELETE /api/repuestos/{id}      - Delete item
//!
//! # Cart (session backed)
//! GET    /cart                    - Current cart
//! POST   /cart/add                - Add an item
//! POST   /cart/update             - Set a line quantity
//! POST   /cart/remove             - Remove a line
//! POST   /cart/clear              - Empty the cart
//! ```

pub mod cart;
pub mod catalog;
pub mod products;
pub mod shop;
pub mod status;

use axum::{
    Router,
    body::Body,
    http::Request,
    routing::{get, patch, post},
};
use tower_http::trace::TraceLayer;

use crate::middleware::{create_session_layer, make_request_span, request_id_middleware};
use crate::state::AppState;

/// Create the product page routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/nuevo", get(products::new_product))
        .route("/{id}", get(products::show))
        .route("/{id}/editar", get(products::edit))
}

/// Create the catalog write routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(catalog::create))
        .route("/{id}", patch(catalog::update).delete(catalog::delete))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tienda", get(shop::index))
        .nest("/productos", product_routes())
        .nest("/api/repuestos", catalog_routes())
        .nest("/cart", cart_routes())
        .route("/status/store", get(status::store))
}

/// Build the full application: routes, request tracing, sessions and Sentry.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes())
        // Runs inside the trace span so it can record the request id
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<Body>| make_request_span(req.method(), req.uri())),
        )
        .layer(session_layer)
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the record store;
/// see `/status/store` for that.
async fn health() -> &'static str {
    "ok"
}
