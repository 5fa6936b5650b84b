//! Shop page (`/tienda`): filtered search with facets.

use amotos_core::{
    BrandFacet, Category, CategoryFacet, CategoryId, FacetBasis, Facets, Item, PriceBucket,
    PriceFacet, SearchFilters, text,
};
use serde::Serialize;
use tracing::instrument;

use super::fallback::{Guarded, guarded, guarded_or};
use super::query::ShopQuery;
use super::total_pages;
use crate::catalog::CatalogStore;
use crate::pocketbase::ListResult;

/// Results per shop page.
pub const SHOP_PAGE_SIZE: u32 = 10;

/// Records fetched as the facet pool.
pub const FACET_POOL_SIZE: u32 = 200;

/// Shown when the search itself could not be loaded.
pub const SHOP_LOAD_ERROR: &str = "No se pudieron cargar los repuestos.";

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsPage {
    pub items: Vec<Item>,
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

impl ResultsPage {
    fn from_list(list: ListResult<Item>, page: u32, per_page: u32) -> Self {
        Self {
            total_pages: total_pages(list.total_items, per_page),
            total_items: list.total_items,
            items: list.items,
            page,
            per_page,
        }
    }
}

/// Everything the shop page renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopPage {
    pub repuestos: ResultsPage,
    pub categorias: Vec<Category>,
    pub search: String,
    /// Category id in effect, including one resolved from `categoriaNombre`.
    pub categoria: String,
    pub categoria_nombre: String,
    pub marca: String,
    pub disponibles: bool,
    pub precio_min: String,
    pub precio_max: String,
    pub page: u32,
    pub per_page: u32,
    pub orden: String,
    pub category_facets: Vec<CategoryFacet>,
    pub brand_facets: Vec<BrandFacet>,
    pub price_facets: Vec<PriceFacet>,
    pub facet_basis: FacetBasis,
    pub error: Option<String>,
}

/// Resolve a category name to an id by accent- and case-insensitive equality.
#[must_use]
pub fn resolve_category<'a>(categories: &'a [Category], name: &str) -> Option<&'a CategoryId> {
    let wanted = text::fold(name);
    categories
        .iter()
        .find(|c| text::fold(&c.name) == wanted)
        .map(|c| &c.id)
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Load the shop page.
///
/// Categories, the filtered search and the facet pool are fetched
/// concurrently. When the category is given only by name, categories are
/// fetched first so the name can be resolved; a name that matches no
/// category filters through the relation's name instead.
#[instrument(skip(store))]
pub async fn load_shop<S: CatalogStore>(store: &S, query: &ShopQuery) -> ShopPage {
    let page = query.page();
    let category = query.category();
    let category_name = query.category_name();

    let mut filters = SearchFilters {
        name: non_empty(query.search()),
        category: non_empty(category).map(CategoryId::from),
        category_name: None,
        brand: non_empty(query.brand()),
        price_min: query.price_min(),
        price_max: query.price_max(),
        available: query.available_only().then_some(true),
        sort: query.sort(),
    };
    let pool_filters = SearchFilters::default();

    let (categories, results, pool) = if filters.category.is_none() && !category_name.is_empty() {
        let categories = guarded("categories", store.list_categories().await);
        match resolve_category(&categories.value, &category_name) {
            Some(id) => filters.category = Some(id.clone()),
            None => filters.category_name = Some(category_name.clone()),
        }
        let (results, pool) = tokio::join!(
            store.search_items(&filters, page, SHOP_PAGE_SIZE),
            store.search_items(&pool_filters, 1, FACET_POOL_SIZE),
        );
        (categories, results, pool)
    } else {
        let (categories, results, pool) = tokio::join!(
            store.list_categories(),
            store.search_items(&filters, page, SHOP_PAGE_SIZE),
            store.search_items(&pool_filters, 1, FACET_POOL_SIZE),
        );
        (guarded("categories", categories), results, pool)
    };

    let results = guarded_or("search", results, || ListResult::empty(page, SHOP_PAGE_SIZE));
    let pool: Guarded<ListResult<Item>> = guarded("facet pool", pool);

    let facets = Facets::aggregate(
        &pool.value.items,
        &categories.value,
        &PriceBucket::storefront_defaults(),
        usize::try_from(pool.value.total_items).unwrap_or(usize::MAX),
    );

    let error = (!results.is_ok()).then(|| SHOP_LOAD_ERROR.to_string());

    ShopPage {
        repuestos: ResultsPage::from_list(results.value, page, SHOP_PAGE_SIZE),
        categorias: categories.value,
        search: query.search(),
        categoria: filters
            .category
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        categoria_nombre: category_name,
        marca: query.brand(),
        disponibles: query.available_only(),
        precio_min: query.price_min_raw(),
        precio_max: query.price_max_raw(),
        page,
        per_page: SHOP_PAGE_SIZE,
        orden: filters.sort.as_str().to_string(),
        category_facets: facets.categories,
        brand_facets: facets.brands,
        price_facets: facets.prices,
        facet_basis: facets.basis,
        error,
    }
}
