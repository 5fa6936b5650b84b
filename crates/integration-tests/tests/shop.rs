//! Shop page end to end: query parameters in, facets and results out.

use amotos_integration_tests::{FakeStore, TestContext, sample_store};
use serde_json::{Value, json};

fn count_of(facets: &Value, key: &str, value: &str) -> Option<u64> {
    facets.as_array()?.iter().find_map(|f| {
        (f.get(key).and_then(Value::as_str) == Some(value))
            .then(|| f.get("count").and_then(Value::as_u64))
            .flatten()
    })
}

#[tokio::test]
async fn test_shop_facets_cover_the_catalog() {
    let ctx = TestContext::new(sample_store()).await;

    let (status, page) = ctx.get_json("/tienda").await;
    assert!(status.is_success());
    assert_eq!(page["repuestos"]["totalItems"], 3);
    assert_eq!(page["repuestos"]["items"].as_array().map(Vec::len), Some(3));
    assert_eq!(page["categorias"].as_array().map(Vec::len), Some(2));
    assert!(page["error"].is_null());

    assert_eq!(count_of(&page["categoryFacets"], "label", "Frenos"), Some(2));
    assert_eq!(count_of(&page["categoryFacets"], "label", "Motor"), Some(1));
    assert_eq!(count_of(&page["brandFacets"], "label", "Honda"), Some(2));
    assert_eq!(count_of(&page["brandFacets"], "label", "Yamaha"), Some(1));
    assert_eq!(count_of(&page["priceFacets"], "id", "low"), Some(1));
    assert_eq!(count_of(&page["priceFacets"], "id", "mid"), Some(1));
    assert_eq!(count_of(&page["priceFacets"], "id", "high"), Some(1));
}

#[tokio::test]
async fn test_shop_query_reaches_the_store_as_a_filter() {
    let ctx = TestContext::new(sample_store()).await;

    let (status, page) = ctx
        .get_json("/tienda?search=freno&marca=Honda&disponibles=true&precioMin=10000")
        .await;
    assert!(status.is_success());
    assert_eq!(page["search"], "freno");
    assert_eq!(page["marca"], "Honda");
    assert_eq!(page["disponibles"], true);
    assert_eq!(page["precioMin"], "10000");

    let filters = ctx.store.filters();
    assert!(filters.iter().any(|f| {
        f.contains("nombre ~ \"freno\"")
            && f.contains("marca = \"Honda\"")
            && f.contains("disponible = true")
            && f.contains("precio >= 10000")
    }));
    // The facet pool is always fetched unfiltered
    assert!(filters.iter().any(String::is_empty));
}

#[tokio::test]
async fn test_shop_category_name_resolves_to_id() {
    let ctx = TestContext::new(sample_store()).await;

    let (_, page) = ctx.get_json("/tienda?categoriaNombre=frenos").await;
    assert_eq!(page["categoria"], "c1");
    assert!(
        ctx.store
            .filters()
            .iter()
            .any(|f| f == "categoria = \"c1\"")
    );
}

#[tokio::test]
async fn test_shop_store_down_shows_message() {
    let store = sample_store();
    store.set_down(true);
    let ctx = TestContext::new(store).await;

    let (status, page) = ctx.get_json("/tienda").await;
    assert!(status.is_success());
    assert_eq!(page["error"], "No se pudieron cargar los repuestos.");
    assert_eq!(page["repuestos"]["totalItems"], 0);
    assert_eq!(page["repuestos"]["items"].as_array().map(Vec::len), Some(0));
    assert_eq!(page["categoryFacets"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_empty_store_is_not_an_error() {
    let ctx = TestContext::new(FakeStore::new()).await;

    let (status, page) = ctx.get_json("/tienda").await;
    assert!(status.is_success());
    assert!(page["error"].is_null());
    assert_eq!(page["repuestos"]["totalPages"], 1);
}

#[tokio::test]
async fn test_odd_stock_record_does_not_break_the_page() {
    let store = sample_store()
        .with_raw_item(json!({
            "id": "r4",
            "nombre": "Cadena",
            "precio": 30_000,
            "categoria": "c2",
            "marca": "KTM",
            "stock": -1,
            "disponible": false,
        }))
        .with_raw_item(json!({
            "id": "r5",
            "nombre": "Piñón",
            "precio": 25_000,
            "categoria": "c2",
            "marca": "KTM",
            "stock": 2.5,
            "disponible": true,
        }));
    let ctx = TestContext::new(store).await;

    let (status, page) = ctx.get_json("/tienda").await;
    assert!(status.is_success());
    assert!(page["error"].is_null());
    assert_eq!(page["repuestos"]["totalItems"], 5);
    assert_eq!(count_of(&page["brandFacets"], "label", "KTM"), Some(2));
    assert_eq!(count_of(&page["categoryFacets"], "label", "Motor"), Some(3));

    let items = page["repuestos"]["items"].as_array().cloned().unwrap_or_default();
    let stock_of = |id: &str| {
        items
            .iter()
            .find(|i| i["id"] == id)
            .and_then(|i| i["stock"].as_u64())
    };
    assert_eq!(stock_of("r4"), Some(0));
    assert_eq!(stock_of("r5"), Some(2));
}
