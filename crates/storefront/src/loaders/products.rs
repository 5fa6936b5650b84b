//! Product pages: listing, detail, edit and new.

use amotos_core::{Category, Item, ItemId};
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use super::fallback::{guarded, guarded_or};
use super::query::ListingQuery;
use super::total_pages;
use crate::catalog::CatalogStore;
use crate::pocketbase::ListResult;

/// Items per listing page.
pub const LISTING_PAGE_SIZE: u32 = 24;

/// Shown when the listing could not be loaded.
pub const LISTING_LOAD_ERROR: &str = "No se pudieron cargar los productos.";

/// Shown when a single product could not be loaded for a reason other than
/// not existing.
pub const PRODUCT_LOAD_ERROR: &str = "No se pudo cargar el producto.";

/// The requested product does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Producto no encontrado")]
pub struct ProductNotFound(pub ItemId);

/// `/productos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    pub items: Vec<Item>,
    pub total_items: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u64,
    pub categorias: Vec<Category>,
    pub error: Option<String>,
}

/// `/productos/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductPage {
    pub producto: Option<Item>,
    pub error: Option<String>,
}

/// `/productos/{id}/editar`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditPage {
    pub producto: Option<Item>,
    pub categorias: Vec<Category>,
    pub error: Option<String>,
}

/// `/productos/nuevo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPage {
    pub categorias: Vec<Category>,
}

/// Load one page of the product listing, newest first by store default.
#[instrument(skip(store))]
pub async fn load_listing<S: CatalogStore>(store: &S, query: &ListingQuery) -> ListingPage {
    let page = query.page();
    let all = amotos_core::SearchFilters::default();

    let (items, categories) = tokio::join!(
        store.search_items(&all, page, LISTING_PAGE_SIZE),
        store.list_categories(),
    );
    let items = guarded_or("listing", items, || ListResult::empty(page, LISTING_PAGE_SIZE));
    let categories = guarded("categories", categories);

    ListingPage {
        total_pages: total_pages(items.value.total_items, LISTING_PAGE_SIZE),
        error: (!items.is_ok()).then(|| LISTING_LOAD_ERROR.to_string()),
        items: items.value.items,
        total_items: items.value.total_items,
        page,
        per_page: LISTING_PAGE_SIZE,
        categorias: categories.value,
    }
}

/// Load a product with its category expanded.
///
/// # Errors
///
/// Returns `ProductNotFound` if the store has no such item. Other failures
/// yield a page without a product and with an error message.
#[instrument(skip(store))]
pub async fn load_detail<S: CatalogStore>(
    store: &S,
    id: &ItemId,
) -> Result<ProductPage, ProductNotFound> {
    let product = guarded_or("product", store.get_item(id, true).await.map(Some), || None);
    if product.is_not_found() {
        return Err(ProductNotFound(id.clone()));
    }

    Ok(ProductPage {
        error: (!product.is_ok()).then(|| PRODUCT_LOAD_ERROR.to_string()),
        producto: product.value,
    })
}

/// Load a product and the category choices for editing it.
///
/// # Errors
///
/// Returns `ProductNotFound` if the store has no such item.
#[instrument(skip(store))]
pub async fn load_edit<S: CatalogStore>(store: &S, id: &ItemId) -> Result<EditPage, ProductNotFound> {
    let (product, categories) = tokio::join!(store.get_item(id, false), store.list_categories());
    let product = guarded_or("product", product.map(Some), || None);
    if product.is_not_found() {
        return Err(ProductNotFound(id.clone()));
    }
    let categories = guarded("categories", categories);

    Ok(EditPage {
        error: (!product.is_ok()).then(|| PRODUCT_LOAD_ERROR.to_string()),
        producto: product.value,
        categorias: categories.value,
    })
}

/// Load the category choices for a new product.
#[instrument(skip(store))]
pub async fn load_new<S: CatalogStore>(store: &S) -> NewPage {
    NewPage {
        categorias: guarded("categories", store.list_categories().await).value,
    }
}

#[cfg(test)]
mod tests {
    use amotos_core::Price;

    use super::*;
    use crate::loaders::testing::FakeCatalog;

    fn catalog(count: usize) -> FakeCatalog {
        let items = (0..count)
            .map(|i| Item {
                id: format!("r{i}").into(),
                name: format!("Repuesto {i}"),
                category: "c1".into(),
                price: Price::new(45_000),
                ..Item::default()
            })
            .collect();
        let categories = vec![Category {
            id: "c1".into(),
            name: "Frenos".to_string(),
            ..Category::default()
        }];
        FakeCatalog::new(items, categories)
    }

    #[tokio::test]
    async fn test_listing_pages_by_24() {
        let store = catalog(30);
        let page = load_listing(&store, &ListingQuery::default()).await;
        assert_eq!(page.items.len(), 24);
        assert_eq!(page.total_items, 30);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.categorias.len(), 1);
        assert!(page.error.is_none());

        let second = load_listing(
            &store,
            &ListingQuery {
                page: Some("2".to_string()),
            },
        )
        .await;
        assert_eq!(second.items.len(), 6);
    }

    #[tokio::test]
    async fn test_listing_failure_shape() {
        let page = load_listing(&FakeCatalog::failing(), &ListingQuery::default()).await;
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 0);
        assert!(page.categorias.is_empty());
        assert_eq!(page.error.as_deref(), Some(LISTING_LOAD_ERROR));
    }

    #[tokio::test]
    async fn test_detail_expands_category() {
        let page = load_detail(&catalog(1), &"r0".into()).await.ok();
        let product = page.and_then(|p| p.producto);
        assert_eq!(
            product
                .as_ref()
                .and_then(Item::expanded_category)
                .map(|c| c.name.as_str()),
            Some("Frenos")
        );
    }

    #[tokio::test]
    async fn test_detail_unknown_id_is_not_found() {
        let result = load_detail(&catalog(1), &"nope".into()).await;
        assert_eq!(result, Err(ProductNotFound("nope".into())));
    }

    #[tokio::test]
    async fn test_detail_outage_is_not_not_found() {
        let page = load_detail(&FakeCatalog::failing(), &"r0".into()).await;
        let page = page.ok();
        assert_eq!(page.as_ref().and_then(|p| p.producto.as_ref()), None);
        assert_eq!(
            page.and_then(|p| p.error).as_deref(),
            Some(PRODUCT_LOAD_ERROR)
        );
    }

    #[tokio::test]
    async fn test_edit_and_new() {
        let store = catalog(2);
        let edit = load_edit(&store, &"r1".into()).await.ok();
        assert_eq!(edit.as_ref().map(|e| e.categorias.len()), Some(1));
        assert!(edit.and_then(|e| e.producto).is_some());

        assert!(load_edit(&store, &"zz".into()).await.is_err());

        assert_eq!(load_new(&store).await.categorias.len(), 1);
        assert!(load_new(&FakeCatalog::failing()).await.categorias.is_empty());
    }
}
