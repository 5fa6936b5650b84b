//! Cart route handlers.
//!
//! The cart lives in the visitor's session as a JSON snapshot. Each request
//! restores it, applies one mutation and writes it back.

use amotos_core::{Cart, CartEntry, ItemId, Price};
use axum::{Form, Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::catalog::CatalogStore;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::{CartState, SessionCartStorage};
use crate::state::AppState;

/// Cart as returned to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartEntry>,
    pub total_quantity: u64,
    pub subtotal: Price,
    pub subtotal_label: String,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let subtotal = cart.subtotal();
        Self {
            items: cart.entries().to_vec(),
            total_quantity: cart.total_quantity(),
            subtotal,
            subtotal_label: subtotal.to_string(),
        }
    }
}

/// Form data for adding to cart.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub id: String,
    pub quantity: Option<String>,
}

/// Parse an add quantity; anything missing, blank or non-numeric adds one.
fn parse_quantity(raw: Option<&str>) -> u32 {
    raw.and_then(|q| q.trim().parse::<u32>().ok()).unwrap_or(1)
}

/// Form data for updating a line quantity.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub id: String,
    pub quantity: i64,
}

/// Form data for removing a line.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: String,
}

fn item_id(raw: &str) -> Result<ItemId> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::BadRequest(
            "Falta el identificador del repuesto".to_string(),
        ));
    }
    Ok(ItemId::new(raw))
}

async fn session_cart(session: Session) -> CartState<SessionCartStorage> {
    CartState::restore(SessionCartStorage::new(session)).await
}

/// Current cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Json<CartView> {
    let cart = session_cart(session).await;
    Json(CartView::from(&cart.snapshot()))
}

/// Add an item to the cart. The item is looked up in the store first so the
/// cart holds its current name and price.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Json<CartView>> {
    let id = item_id(&form.id)?;
    let item = state.store().get_item(&id, false).await?;

    let cart = session_cart(session).await;
    let updated = cart.add(item, parse_quantity(form.quantity.as_deref())).await?;

    add_breadcrumb("cart", "Added to cart", Some(&[("id", id.as_str())]));

    Ok(Json(CartView::from(&updated)))
}

/// Set a line's quantity. Values below one are raised to one.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Result<Json<CartView>> {
    let id = item_id(&form.id)?;
    let cart = session_cart(session).await;
    let updated = cart.update_quantity(&id, form.quantity).await?;
    Ok(Json(CartView::from(&updated)))
}

/// Remove a line from the cart.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Json<CartView>> {
    let id = item_id(&form.id)?;
    let cart = session_cart(session).await;
    let updated = cart.remove(&id).await?;

    add_breadcrumb("cart", "Removed from cart", Some(&[("id", id.as_str())]));

    Ok(Json(CartView::from(&updated)))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<CartView>> {
    let cart = session_cart(session).await;
    let updated = cart.clear().await?;
    Ok(Json(CartView::from(&updated)))
}

#[cfg(test)]
mod tests {
    use amotos_core::Item;

    use super::*;

    #[test]
    fn test_cart_view_totals() {
        let mut cart = Cart::new();
        cart.add(
            Item {
                id: "r1".into(),
                price: Price::new(17_500),
                ..Item::default()
            },
            2,
        );

        let view = CartView::from(&cart);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.total_quantity, 2);
        assert_eq!(view.subtotal, Price::new(35_000));
        assert_eq!(view.subtotal_label, "$35.000");
    }

    #[test]
    fn test_blank_id_is_bad_request() {
        assert!(matches!(item_id("  "), Err(AppError::BadRequest(_))));
        assert_eq!(item_id(" r1 ").ok(), Some(ItemId::new("r1")));
    }

    #[test]
    fn test_add_quantity_defaults_to_one() {
        assert_eq!(parse_quantity(None), 1);
        assert_eq!(parse_quantity(Some("")), 1);
        assert_eq!(parse_quantity(Some(" 3 ")), 3);
        assert_eq!(parse_quantity(Some("dos")), 1);
        assert_eq!(parse_quantity(Some("-2")), 1);
    }
}
