//! Cart flow end to end, kept in the session cookie.

use amotos_integration_tests::{TestContext, sample_store};
use reqwest::StatusCode;
use serde_json::Value;

fn quantity_of(cart: &Value, id: &str) -> Option<u64> {
    cart["items"].as_array()?.iter().find_map(|entry| {
        (entry["repuesto"]["id"] == id)
            .then(|| entry["cantidad"].as_u64())
            .flatten()
    })
}

#[tokio::test]
async fn test_cart_flow_persists_across_requests() {
    let ctx = TestContext::new(sample_store()).await;

    let (status, cart) = ctx.get_json("/cart").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["totalQuantity"], 0);

    let (status, cart) = ctx.post_form("/cart/add", &[("id", "r1"), ("quantity", "2")]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quantity_of(&cart, "r1"), Some(2));
    assert_eq!(cart["subtotal"], 36_000);
    assert_eq!(cart["subtotalLabel"], "$36.000");

    // Adding again merges into the existing line
    let (_, cart) = ctx.post_form("/cart/add", &[("id", "r1")]).await;
    assert_eq!(quantity_of(&cart, "r1"), Some(3));

    let (_, cart) = ctx.post_form("/cart/add", &[("id", "r3")]).await;
    assert_eq!(cart["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(cart["totalQuantity"], 4);

    let (_, cart) = ctx.post_form("/cart/update", &[("id", "r1"), ("quantity", "0")]).await;
    assert_eq!(quantity_of(&cart, "r1"), Some(1));

    let (_, cart) = ctx.post_form("/cart/remove", &[("id", "r3")]).await;
    assert_eq!(quantity_of(&cart, "r3"), None);

    let (_, cart) = ctx.get_json("/cart").await;
    assert_eq!(quantity_of(&cart, "r1"), Some(1));
    assert_eq!(cart["totalQuantity"], 1);

    let (_, cart) = ctx.post_form("/cart/clear", &[]).await;
    assert_eq!(cart["items"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_cart_is_per_session() {
    let ctx = TestContext::new(sample_store()).await;
    ctx.post_form("/cart/add", &[("id", "r2")]).await;

    let other = reqwest::Client::new();
    let cart: Value = other
        .get(ctx.url("/cart"))
        .send()
        .await
        .expect("cart request")
        .json()
        .await
        .unwrap_or(Value::Null);
    assert_eq!(cart["totalQuantity"], 0);
}

#[tokio::test]
async fn test_adding_unknown_item_is_404() {
    let ctx = TestContext::new(sample_store()).await;

    let (status, body) = ctx.post_form("/cart/add", &[("id", "nope")]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Producto no encontrado");

    let (_, cart) = ctx.get_json("/cart").await;
    assert_eq!(cart["totalQuantity"], 0);
}

#[tokio::test]
async fn test_blank_id_is_bad_request() {
    let ctx = TestContext::new(sample_store()).await;
    let (status, _) = ctx.post_form("/cart/remove", &[("id", " ")]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_blank_quantity_adds_one() {
    let ctx = TestContext::new(sample_store()).await;

    let (status, cart) = ctx.post_form("/cart/add", &[("id", "r2"), ("quantity", "")]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quantity_of(&cart, "r2"), Some(1));
}
