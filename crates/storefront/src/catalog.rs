//! Read access to the catalog.
//!
//! Page loaders depend on [`CatalogStore`] rather than on the HTTP client so
//! they can run against an in-memory catalog in tests.

use std::future::Future;

use amotos_core::{Category, Item, ItemId, SearchFilters};

use crate::pocketbase::{ListQuery, ListResult, PocketBaseClient, StoreError, collections};

/// Relation expanded on item detail reads.
pub const CATEGORY_RELATION: &str = "categoria";

/// Catalog reads used by the page loaders.
pub trait CatalogStore: Send + Sync {
    /// One page of items matching `filters`, ordered by `filters.sort`.
    fn search_items(
        &self,
        filters: &SearchFilters,
        page: u32,
        per_page: u32,
    ) -> impl Future<Output = Result<ListResult<Item>, StoreError>> + Send;

    /// One item, with its category expanded when `expand_category` is set.
    fn get_item(
        &self,
        id: &ItemId,
        expand_category: bool,
    ) -> impl Future<Output = Result<Item, StoreError>> + Send;

    /// Every category.
    fn list_categories(&self) -> impl Future<Output = Result<Vec<Category>, StoreError>> + Send;
}

impl CatalogStore for PocketBaseClient {
    async fn search_items(
        &self,
        filters: &SearchFilters,
        page: u32,
        per_page: u32,
    ) -> Result<ListResult<Item>, StoreError> {
        let mut query = ListQuery::page(page, per_page).filter(filters.to_filter_expr().to_string());
        if let Some(sort) = filters.sort.directive() {
            query = query.sort(sort);
        }
        self.list(collections::ITEMS, &query).await
    }

    async fn get_item(&self, id: &ItemId, expand_category: bool) -> Result<Item, StoreError> {
        let expand = expand_category.then_some(CATEGORY_RELATION);
        self.get_one(collections::ITEMS, id.as_str(), expand).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        self.all_categories().await
    }
}
